use arbor_core::KeyError;

/// Error type produced by the SSR backend.
#[derive(Debug, thiserror::Error)]
pub enum SsrError {
    /// A void element was given children.
    #[error("void element `<{tag}>` can't have children")]
    VoidElementChildren {
        /// Tag name of the offending element.
        tag: String,
    },
    /// A child list broke the sibling key contract.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Application state couldn't be serialized.
    #[error("failed to serialize state: {0}")]
    State(#[from] serde_json::Error),
}
