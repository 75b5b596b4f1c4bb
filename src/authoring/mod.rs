//! Tree source authoring: serde documents, deserialization entry
//! points, and the one-pass validating build into a `TreeDefinition`.

pub mod build;
pub mod dto;
pub mod parse;

pub use build::build_tree;
pub use dto::{ChoiceDoc, NodeDoc};
pub use parse::{parse_tree_json, parse_tree_yaml};
