use crate::types::Version;
use serde::{Deserialize, Serialize};

/// Session events — the append-only record of one traversal.
///
/// The session pushes one entry per navigation action; nothing is
/// ever removed, a rewind is recorded rather than erasing the
/// entries it discards from the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        tree: String,
        version: Version,
        root: String,
    },
    ChoiceSelected {
        choice: String,
        from: String,
        to: String,
    },
    FinalReached {
        label: String,
    },
    Rewound {
        target: String,
        /// How many history entries the rewind discarded.
        discarded: usize,
    },
    Reset,
}
