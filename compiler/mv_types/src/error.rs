//! Internal inference failures.

use mv_ir::{NodeId, Span, SyntaxTree};

/// A node that should have been typed by the walker but was not.
///
/// This is a bug in the walker rather than in the program being checked;
/// see [`InferConfig::strict`](crate::InferConfig::strict) for how it is
/// surfaced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} {node:?} at {span} is never inferred (file {file:?}, statement {stmt:?})")]
pub struct InferenceError {
    pub node: NodeId,
    pub kind: &'static str,
    pub span: Span,
    pub file: Option<NodeId>,
    pub stmt: Option<NodeId>,
}

impl InferenceError {
    pub fn never_inferred(tree: &SyntaxTree, node: NodeId) -> Self {
        InferenceError {
            node,
            kind: tree.get(node).map_or("node", |n| n.kind.label()),
            span: tree.span(node),
            file: tree.containing_file(node),
            stmt: tree.containing_stmt(node),
        }
    }
}
