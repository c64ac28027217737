//! Native listener seam and input normalization.
//!
//! A host provides one [`NativeEventListener`] per listener variant through a
//! [`NativeBackend`]. The listener translates native events with the
//! `normalize_*` functions and feeds them to
//! [`GestureEventSource::dispatch`](crate::GestureEventSource::dispatch).

use crate::{
    GesturePointerEvent, HandlerFlags, ListenerKind, NativeError, PointerAction, PointerType,
    TargetId,
};

/// Native listener adapter driven by a gesture source.
pub trait NativeEventListener {
    /// Starts listening to native events.
    ///
    /// # Errors
    ///
    /// Returns the native failure, which is not retried.
    fn activate(&mut self) -> Result<(), NativeError>;

    /// Stops listening to native events.
    ///
    /// # Errors
    ///
    /// Returns the native failure, which is not retried.
    fn deactivate(&mut self) -> Result<(), NativeError>;

    /// Captures the pointer of `event`, allowing the host the touch actions in
    /// `flags`.
    ///
    /// # Errors
    ///
    /// Returns the native failure, which is not retried.
    fn capture(
        &mut self,
        event: &GesturePointerEvent,
        flags: HandlerFlags,
    ) -> Result<(), NativeError>;

    /// Releases the pointer of `event`.
    ///
    /// # Errors
    ///
    /// Returns the native failure, which is not retried.
    fn release(&mut self, event: &GesturePointerEvent) -> Result<(), NativeError>;
}

/// Creates native listener adapters.
pub trait NativeBackend {
    /// Creates the adapter for `kind`.
    fn create_listener(&self, kind: ListenerKind) -> Box<dyn NativeEventListener>;
}

/// A native pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent {
    /// Native pointer id.
    pub pointer_id: u32,
    /// Device type.
    pub pointer_type: PointerType,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Pressure in `0.0..=1.0`.
    pub pressure: f64,
    /// Pressed buttons.
    pub buttons: u32,
    /// Event time in milliseconds.
    pub timestamp: f64,
    /// Hit target.
    pub target: Option<TargetId>,
}

/// A native mouse event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMouseEvent {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Pressed buttons.
    pub buttons: u32,
    /// Event time in milliseconds.
    pub timestamp: f64,
    /// Hit target.
    pub target: Option<TargetId>,
}

/// One contact of a native touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouch {
    /// Native touch identifier.
    pub identifier: u32,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Contact force in `0.0..=1.0`, zero when unsupported.
    pub force: f64,
    /// Hit target.
    pub target: Option<TargetId>,
}

/// A native touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouchEvent {
    /// Contacts that changed in this event.
    pub changed_touches: Vec<RawTouch>,
    /// Event time in milliseconds.
    pub timestamp: f64,
}

/// Pointer id used for the mouse.
pub const MOUSE_POINTER_ID: u32 = 1;

/// Offset added to native touch identifiers, keeping them clear of the mouse.
pub const TOUCH_ID_OFFSET: u32 = 2;

/// Normalizes a native pointer event.
#[must_use]
pub fn normalize_pointer(event: &RawPointerEvent, action: PointerAction) -> GesturePointerEvent {
    GesturePointerEvent {
        id: event.pointer_id,
        action,
        pointer_type: event.pointer_type,
        x: event.x,
        y: event.y,
        pressure: event.pressure,
        buttons: event.buttons,
        timestamp: event.timestamp,
        target: event.target,
    }
}

/// Normalizes a native mouse event. The mouse is always pointer
/// [`MOUSE_POINTER_ID`] and reports half pressure while a button is held.
#[must_use]
pub fn normalize_mouse(event: &RawMouseEvent, action: PointerAction) -> GesturePointerEvent {
    GesturePointerEvent {
        id: MOUSE_POINTER_ID,
        action,
        pointer_type: PointerType::Mouse,
        x: event.x,
        y: event.y,
        pressure: if event.buttons == 0 { 0.0 } else { 0.5 },
        buttons: event.buttons,
        timestamp: event.timestamp,
        target: event.target,
    }
}

/// Normalizes a native touch event into one event per changed contact.
#[must_use]
pub fn normalize_touch(event: &RawTouchEvent, action: PointerAction) -> Vec<GesturePointerEvent> {
    event
        .changed_touches
        .iter()
        .map(|touch| GesturePointerEvent {
            id: touch.identifier.saturating_add(TOUCH_ID_OFFSET),
            action,
            pointer_type: PointerType::Touch,
            x: touch.x,
            y: touch.y,
            pressure: if touch.force > 0.0 { touch.force } else { 0.5 },
            buttons: u32::from(!action.is_terminal()),
            timestamp: event.timestamp,
            target: touch.target,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_is_pointer_one() {
        let event = RawMouseEvent {
            x: 1.0,
            y: 2.0,
            buttons: 1,
            timestamp: 10.0,
            target: None,
        };
        let normalized = normalize_mouse(&event, PointerAction::Down);
        assert_eq!(normalized.id, MOUSE_POINTER_ID);
        assert_eq!(normalized.pointer_type, PointerType::Mouse);
        assert!((normalized.pressure - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn touches_are_offset_and_split() {
        let touch = |identifier| RawTouch {
            identifier,
            x: 0.0,
            y: 0.0,
            force: 0.0,
            target: None,
        };
        let event = RawTouchEvent {
            changed_touches: vec![touch(0), touch(1)],
            timestamp: 0.0,
        };
        let down = normalize_touch(&event, PointerAction::Down);
        let ids: Vec<u32> = down.iter().map(|e| e.id).collect();
        assert_eq!(ids, [2, 3]);
        assert_eq!(down[0].buttons, 1);
        assert_eq!(normalize_touch(&event, PointerAction::Up)[1].buttons, 0);
    }

    #[test]
    fn pointer_fields_are_kept() {
        let raw = RawPointerEvent {
            pointer_id: 7,
            pointer_type: PointerType::Pen,
            x: 3.0,
            y: 4.0,
            pressure: 0.25,
            buttons: 1,
            timestamp: 1.0,
            target: Some(TargetId::new(0)),
        };
        let event = normalize_pointer(&raw, PointerAction::Move);
        assert_eq!(event.id, 7);
        assert_eq!(event.pointer_type, PointerType::Pen);
        assert_eq!(event.target, Some(TargetId::new(0)));
    }
}
