//! Native input feature detection.

bitflags::bitflags! {
    /// Native input event families available on the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct FeatureFlags: u32 {
        /// Pointer events.
        const POINTER_EVENTS = 1;
        /// Touch events.
        const TOUCH_EVENTS = 1 << 1;
        /// Mouse events.
        const MOUSE_EVENTS = 1 << 2;
        /// Passive listener registration.
        const PASSIVE_EVENTS = 1 << 3;
    }
}

/// The native listener variant driving a gesture source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Native pointer events.
    Pointer,
    /// Native touch events.
    Touch,
    /// Native mouse events.
    Mouse,
}

impl ListenerKind {
    /// Picks pointer events, then touch events, and falls back to mouse events.
    #[must_use]
    pub const fn select(features: FeatureFlags) -> Self {
        if features.contains(FeatureFlags::POINTER_EVENTS) {
            Self::Pointer
        } else if features.contains(FeatureFlags::TOUCH_EVENTS) {
            Self::Touch
        } else {
            Self::Mouse
        }
    }
}

/// Construction options of a gesture source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Detected native features.
    pub features: FeatureFlags,
}
