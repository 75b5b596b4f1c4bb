use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ─── Scalar aliases ───────────────────────────────────────────

/// Index into a [`TreeDefinition`]'s node arena.
pub type NodeId = u32;

/// Catalog version (monotonic, bumped on every replace).
pub type Version = u32;

/// Epoch milliseconds (UTC).
pub type Timestamp = i64;

// ─── Choice / Node ────────────────────────────────────────────

/// A labeled edge from a node to one of its children.
///
/// The target is an arena index, never an owned subtree — shared
/// children (DAG shape) are represented by two choices pointing at
/// the same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub target: NodeId,
}

/// A point in the decision tree: a display label plus its outgoing
/// choices. A node with no choices is terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub choices: Vec<Choice>,
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Find the outgoing choice with this exact label.
    ///
    /// Labels are unique among siblings (enforced at build time), so
    /// first match is the only match.
    pub fn choice(&self, label: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.label == label)
    }
}

// ─── TreeDefinition ───────────────────────────────────────────

/// An immutable, versioned decision tree.
///
/// Owns its full node graph as an arena rooted at `root`. Instances
/// are only produced by the validating build in `authoring` — every
/// `NodeId` held by a node is guaranteed in-bounds and the graph is
/// guaranteed acyclic. "Updating" a stored definition means building
/// a new one at the next version, never mutating in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    name: String,
    version: Version,
    root: NodeId,
    nodes: Vec<Node>,
}

impl TreeDefinition {
    pub(crate) fn new(name: String, version: Version, root: NodeId, nodes: Vec<Node>) -> Self {
        debug_assert!((root as usize) < nodes.len());
        Self {
            name,
            version,
            root,
            nodes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &Node {
        self.node(self.root)
    }

    /// Resolve an arena index. Ids are produced by the build and are
    /// always in-bounds for the definition that issued them.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// ─── Session state ────────────────────────────────────────────

/// Where a session stands: still offering choices, or parked on a
/// terminal node. A tree whose root is terminal starts out `Final`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Navigating,
    Final,
}

// ─── Catalog entry ────────────────────────────────────────────

/// One named slot in the catalog: the latest definition plus the
/// identity of the source it was built from. Superseded versions are
/// discarded on replace.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    pub version: Version,
    pub definition: Arc<TreeDefinition>,
    /// SHA-256 of the source document the definition was built from.
    pub source_digest: [u8; 32],
    pub created_at: Timestamp,
}

// ─── Resource kind ────────────────────────────────────────────

/// The two backend resource kinds with identical CRUD shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Quiz,
    Tree,
}

impl ResourceKind {
    /// Path segment under `/api/`.
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Quiz => "quiz",
            ResourceKind::Tree => "tree",
        }
    }

    /// Key of the array in the list payload (`{"quizzes": [...]}`).
    pub fn list_key(&self) -> &'static str {
        match self {
            ResourceKind::Quiz => "quizzes",
            ResourceKind::Tree => "trees",
        }
    }
}

// ─── Feedback ─────────────────────────────────────────────────

/// User feedback on a finished traversal, posted to the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feedback {
    pub rate: i32,
    pub comment: String,
    #[serde(rename = "quizzId")]
    pub quizz_id: String,
    /// Slash-joined answer labels of the traversal being rated.
    pub path: String,
}
