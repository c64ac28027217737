/// Failure reported by a native listener adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct NativeError(pub String);

impl From<&str> for NativeError {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Error produced by [`GestureEventSource`](crate::GestureEventSource).
///
/// Native failures are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    /// The native listener could not be activated.
    #[error("failed to activate native listener: {0}")]
    Activation(#[source] NativeError),
    /// The native listener could not be deactivated.
    #[error("failed to deactivate native listener: {0}")]
    Deactivation(#[source] NativeError),
    /// The native layer refused to capture a pointer.
    #[error("failed to capture pointer {id}: {source}")]
    Capture {
        /// Pointer id.
        id: u32,
        /// Native failure.
        source: NativeError,
    },
    /// The native layer refused to release a pointer.
    #[error("failed to release pointer {id}: {source}")]
    Release {
        /// Pointer id.
        id: u32,
        /// Native failure.
        source: NativeError,
    },
    /// A listener was removed without a matching add.
    #[error("listener removed more often than added")]
    UnbalancedListener,
}
