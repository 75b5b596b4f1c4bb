use crate::error::SessionError;
use crate::events::SessionEvent;
use crate::types::{Node, NodeId, SessionState, TreeDefinition};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A live traversal over one [`TreeDefinition`].
///
/// Holds the current node, the ordered history of visited nodes
/// (root included, insertion order = navigation order) and the
/// answer labels taken so far. A session belongs to exactly one
/// logical user flow; it is not shared across threads.
///
/// Every failing operation leaves the session exactly as it was.
#[derive(Clone, Debug)]
pub struct Session {
    session_id: Uuid,
    definition: Arc<TreeDefinition>,
    current: NodeId,
    /// Visited nodes in navigation order; `history[0]` is the root.
    history: Vec<NodeId>,
    /// Labels of the choices taken; always `history.len() - 1` long.
    taken: Vec<String>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Open a session at the definition's root.
    ///
    /// A tree whose root is terminal starts out [`SessionState::Final`].
    pub fn start(definition: Arc<TreeDefinition>) -> Self {
        let root = definition.root_id();
        let mut events = vec![SessionEvent::Started {
            tree: definition.name().to_string(),
            version: definition.version(),
            root: definition.root().label.clone(),
        }];
        if definition.root().is_terminal() {
            events.push(SessionEvent::FinalReached {
                label: definition.root().label.clone(),
            });
        }
        debug!(tree = definition.name(), version = definition.version(), "session started");
        Self {
            session_id: Uuid::now_v7(),
            definition,
            current: root,
            history: vec![root],
            taken: Vec::new(),
            events,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn definition(&self) -> &Arc<TreeDefinition> {
        &self.definition
    }

    pub fn current(&self) -> &Node {
        self.definition.node(self.current)
    }

    pub fn current_label(&self) -> &str {
        &self.current().label
    }

    pub fn state(&self) -> SessionState {
        if self.current().is_terminal() {
            SessionState::Final
        } else {
            SessionState::Navigating
        }
    }

    /// True iff the current node is terminal. Pure — repeated calls
    /// without a mutating call in between always agree.
    pub fn is_final(&self) -> bool {
        self.state() == SessionState::Final
    }

    /// Labels offered at the current node, in definition order.
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.current().choices.iter().map(|c| c.label.as_str())
    }

    /// Labels of the visited nodes, navigation order, root first.
    pub fn history_labels(&self) -> Vec<&str> {
        self.history
            .iter()
            .map(|&id| self.definition.node(id).label.as_str())
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Slash-joined labels of the answers taken so far.
    pub fn path(&self) -> String {
        self.taken.join("/")
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Take the choice with this exact label at the current node.
    ///
    /// Fails with [`SessionError::InvalidChoice`] if the current node
    /// is terminal or offers no such label; the session is unchanged
    /// in that case.
    pub fn select(&mut self, label: &str) -> Result<&Node, SessionError> {
        let target = self
            .current()
            .choice(label)
            .map(|c| c.target)
            .ok_or_else(|| SessionError::InvalidChoice {
                node: self.current_label().to_string(),
                label: label.to_string(),
            })?;

        let from = self.current_label().to_string();
        self.current = target;
        self.history.push(target);
        self.taken.push(label.to_string());

        let to = self.current_label().to_string();
        debug!(choice = label, from = %from, to = %to, "choice selected");
        self.events.push(SessionEvent::ChoiceSelected {
            choice: label.to_string(),
            from,
            to,
        });
        if self.current().is_terminal() {
            self.events.push(SessionEvent::FinalReached {
                label: self.current_label().to_string(),
            });
        }
        Ok(self.current())
    }

    /// Jump back to a previously visited node.
    ///
    /// Scans the history for the **most recent** entry with this
    /// label (last match — the history renders most-recent-last, so a
    /// repeated label means its nearest occurrence). Truncates the
    /// history inclusive of the match; everything after it is
    /// discarded, so a subsequent `select` starts a fresh branch.
    pub fn rewind_to(&mut self, label: &str) -> Result<&Node, SessionError> {
        let pos = self
            .history
            .iter()
            .rposition(|&id| self.definition.node(id).label == label)
            .ok_or_else(|| SessionError::InvalidHistoryTarget {
                label: label.to_string(),
            })?;

        let discarded = self.history.len() - (pos + 1);
        self.history.truncate(pos + 1);
        self.taken.truncate(pos);
        self.current = self.history[pos];

        debug!(step = label, discarded, "session rewound");
        self.events.push(SessionEvent::Rewound {
            target: label.to_string(),
            discarded,
        });
        Ok(self.current())
    }

    /// Back to the root, as if the session had just been started.
    /// The event record is kept (append-only), the history is not.
    pub fn reset(&mut self) {
        self.current = self.definition.root_id();
        self.history.clear();
        self.history.push(self.current);
        self.taken.clear();
        self.events.push(SessionEvent::Reset);
        debug!(tree = self.definition.name(), "session reset");
    }
}
