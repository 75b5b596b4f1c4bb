use super::dto::{ChoiceDoc, NodeDoc};
use crate::error::ValidationError;
use crate::types::{Choice, Node, NodeId, TreeDefinition, Version};
use std::collections::{HashMap, HashSet};

/// Placeholder target for a `ref` choice until resolution.
const UNRESOLVED: NodeId = NodeId::MAX;

/// Lower a source document into a validated [`TreeDefinition`].
///
/// One pass over the document checks every structural invariant:
/// non-empty labels, terminal nodes carry no choices, sibling choice
/// labels unique, every `ref` resolves to exactly one inline node,
/// and the resulting graph is acyclic (in-progress/done DFS
/// coloring). Errors carry the document path of the offending node.
pub fn build_tree(
    name: &str,
    version: Version,
    doc: &NodeDoc,
) -> Result<TreeDefinition, ValidationError> {
    let mut builder = Builder::default();
    let root = builder.lower(doc, "root")?;
    builder.resolve_refs()?;
    builder.reject_cycles(root)?;
    Ok(TreeDefinition::new(
        name.to_string(),
        version,
        root,
        builder.nodes,
    ))
}

#[derive(Default)]
struct Builder<'a> {
    nodes: Vec<Node>,
    /// Label → ids of the inline nodes that declared it.
    labels: HashMap<&'a str, Vec<NodeId>>,
    /// Unresolved `ref` choices: (doc path, owner node, choice index, target label).
    pending: Vec<(String, NodeId, usize, &'a str)>,
}

impl<'a> Builder<'a> {
    fn lower(&mut self, doc: &'a NodeDoc, path: &str) -> Result<NodeId, ValidationError> {
        if doc.label.is_empty() {
            return Err(ValidationError::new(path, "empty node label"));
        }
        if doc.terminal && !doc.choices.is_empty() {
            return Err(ValidationError::new(
                path,
                format!(
                    "node '{}' is marked terminal but has {} choices",
                    doc.label,
                    doc.choices.len()
                ),
            ));
        }

        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            label: doc.label.clone(),
            choices: Vec::with_capacity(doc.choices.len()),
        });
        self.labels.entry(doc.label.as_str()).or_default().push(id);

        let mut sibling_labels: HashSet<&str> = HashSet::new();
        for (i, choice) in doc.choices.iter().enumerate() {
            let choice_path = format!("{path}.choices[{i}]");
            if choice.label.is_empty() {
                return Err(ValidationError::new(choice_path, "empty choice label"));
            }
            if !sibling_labels.insert(choice.label.as_str()) {
                return Err(ValidationError::new(
                    choice_path,
                    format!("duplicate label '{}'", choice.label),
                ));
            }
            let target = self.lower_choice(choice, &choice_path, id, i)?;
            self.nodes[id as usize].choices.push(Choice {
                label: choice.label.clone(),
                target,
            });
        }
        Ok(id)
    }

    fn lower_choice(
        &mut self,
        choice: &'a ChoiceDoc,
        choice_path: &str,
        owner: NodeId,
        index: usize,
    ) -> Result<NodeId, ValidationError> {
        match (&choice.node, &choice.node_ref) {
            (Some(child), None) => self.lower(child, &format!("{choice_path}.node")),
            (None, Some(target_label)) => {
                self.pending.push((
                    choice_path.to_string(),
                    owner,
                    index,
                    target_label.as_str(),
                ));
                Ok(UNRESOLVED)
            }
            (Some(_), Some(_)) => Err(ValidationError::new(
                choice_path,
                "choice has both 'node' and 'ref'",
            )),
            (None, None) => Err(ValidationError::new(
                choice_path,
                "choice needs either 'node' or 'ref'",
            )),
        }
    }

    fn resolve_refs(&mut self) -> Result<(), ValidationError> {
        for (path, owner, index, target_label) in std::mem::take(&mut self.pending) {
            let target = match self.labels.get(target_label).map(Vec::as_slice) {
                Some([id]) => *id,
                Some(ids) => {
                    return Err(ValidationError::new(
                        format!("{path}.ref"),
                        format!(
                            "ambiguous ref: '{}' is defined {} times",
                            target_label,
                            ids.len()
                        ),
                    ));
                }
                None => {
                    return Err(ValidationError::new(
                        format!("{path}.ref"),
                        format!("dangling ref to unknown node '{target_label}'"),
                    ));
                }
            };
            self.nodes[owner as usize].choices[index].target = target;
        }
        Ok(())
    }

    /// Depth-first walk from the root with in-progress (gray) vs done
    /// (black) coloring. A choice targeting a gray node is a back-edge.
    fn reject_cycles(&self, root: NodeId) -> Result<(), ValidationError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color = vec![Color::White; self.nodes.len()];
        // (node id, index of the next choice to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        color[root as usize] = Color::Gray;

        while let Some((id, next)) = stack.last().copied() {
            let node = &self.nodes[id as usize];
            if next >= node.choices.len() {
                color[id as usize] = Color::Black;
                stack.pop();
                continue;
            }
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }
            let target = node.choices[next].target;
            match color[target as usize] {
                Color::Gray => {
                    return Err(ValidationError::new(
                        format!("{}.choices[{next}]", path_of(&stack)),
                        format!(
                            "cycle back to '{}'",
                            self.nodes[target as usize].label
                        ),
                    ));
                }
                Color::White => {
                    color[target as usize] = Color::Gray;
                    stack.push((target, 0));
                }
                Color::Black => {}
            }
        }
        Ok(())
    }
}

/// Document path of the node at the top of a DFS stack. Each frame
/// was entered through its parent's previous choice index.
fn path_of(stack: &[(NodeId, usize)]) -> String {
    let mut path = String::from("root");
    for i in 1..stack.len() {
        let entered_via = stack[i - 1].1 - 1;
        path.push_str(&format!(".choices[{entered_via}].node"));
    }
    path
}
