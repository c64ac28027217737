use arbor_core::{Key, KeyError};

use crate::NodeId;

/// Error produced while reconciling or applying patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// A child list mixes keyed and unkeyed nodes.
    #[error("child list mixes keyed and unkeyed nodes")]
    MixedKeys,
    /// Two siblings share a key.
    #[error("duplicate sibling key `{key}`")]
    DuplicateKey {
        /// The repeated key.
        key: Key,
    },
    /// A void element was given children.
    #[error("void element `<{tag}>` can't have children")]
    VoidElementChildren {
        /// Tag name of the element.
        tag: String,
    },
    /// A patch referenced a node the target doesn't know.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// A patch targeted a node of the wrong type.
    #[error("node {id} is not {expected}")]
    UnexpectedNode {
        /// The targeted node.
        id: NodeId,
        /// What the patch expected.
        expected: &'static str,
    },
}

impl From<KeyError> for ReconcileError {
    fn from(value: KeyError) -> Self {
        match value {
            KeyError::Mixed => Self::MixedKeys,
            KeyError::Duplicate(key) => Self::DuplicateKey { key },
        }
    }
}
