use serde::{Deserialize, Serialize};

// ── Source documents ──
//
// A tree source is a nested node document: a label plus a list of
// answer choices. Each choice either inlines its child node or
// references an inline node elsewhere in the document by label
// (`ref`), which is how shared subtrees (DAG shape) are written.
// Nothing here is validated — `build_tree` does that in one pass.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    pub label: String,
    /// Explicit terminal marker. Optional: a node with no choices is
    /// terminal regardless; `terminal: true` alongside choices is a
    /// validation error.
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceDoc {
    pub label: String,
    /// Inline child node. Exactly one of `node`/`ref` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeDoc>,
    /// By-label reference to an inline node defined elsewhere in the
    /// same document.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub node_ref: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}
