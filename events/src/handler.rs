//! Event handlers.

use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::GesturePointerEvent;

/// Identity of an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

bitflags::bitflags! {
    /// Handler options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HandlerFlags: u32 {
        /// Run during the capture phase, root to target.
        const CAPTURE = 1;
        /// Handler allows horizontal panning by the host.
        const TOUCH_ACTION_PAN_X = 1 << 1;
        /// Handler allows vertical panning by the host.
        const TOUCH_ACTION_PAN_Y = 1 << 2;
        /// Handler allows pinch zooming by the host.
        const TOUCH_ACTION_PINCH_ZOOM = 1 << 3;
        /// Handler allows double-tap zooming by the host.
        const TOUCH_ACTION_DOUBLE_TAP_ZOOM = 1 << 4;

        /// All touch-action bits.
        const TOUCH_ACTIONS = Self::TOUCH_ACTION_PAN_X.bits()
            | Self::TOUCH_ACTION_PAN_Y.bits()
            | Self::TOUCH_ACTION_PINCH_ZOOM.bits()
            | Self::TOUCH_ACTION_DOUBLE_TAP_ZOOM.bits();
    }
}

struct HandlerInner {
    source: SourceId,
    flags: HandlerFlags,
    callback: Box<dyn Fn(&GesturePointerEvent)>,
}

/// A shared, reference-counted event handler.
///
/// Clones refer to the same handler. Equality is identity.
#[derive(Clone)]
pub struct EventHandler(Rc<HandlerInner>);

impl EventHandler {
    /// Creates a handler attached to `source`.
    pub fn new<F>(source: SourceId, flags: HandlerFlags, callback: F) -> Self
    where
        F: Fn(&GesturePointerEvent) + 'static,
    {
        Self(Rc::new(HandlerInner {
            source,
            flags,
            callback: Box::new(callback),
        }))
    }

    /// Returns the source the handler listens to.
    #[must_use]
    pub fn source(&self) -> SourceId {
        self.0.source
    }

    /// Returns the handler flags.
    #[must_use]
    pub fn flags(&self) -> HandlerFlags {
        self.0.flags
    }

    /// Invokes the handler.
    pub fn call(&self, event: &GesturePointerEvent) {
        (self.0.callback)(event);
    }

    /// Returns `true` if both refer to the same handler.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("source", &self.0.source)
            .field("flags", &self.0.flags)
            .finish_non_exhaustive()
    }
}
