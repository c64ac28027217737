//! Normalized pointer events.

use crate::TargetId;

/// What happened to a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Contact started.
    Down,
    /// Pointer moved.
    Move,
    /// Contact ended.
    Up,
    /// The host cancelled the interaction.
    Cancel,
}

impl PointerAction {
    /// Returns `true` for actions that end an interaction.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// The device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// Mouse.
    #[default]
    Mouse,
    /// Pen or stylus.
    Pen,
    /// Touch contact.
    Touch,
}

/// A pointer event, independent of the native event family it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GesturePointerEvent {
    /// Pointer identifier, stable for one interaction.
    pub id: u32,
    /// Action.
    pub action: PointerAction,
    /// Device type.
    pub pointer_type: PointerType,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Normalized pressure in `0.0..=1.0`.
    pub pressure: f64,
    /// Pressed buttons bitmask.
    pub buttons: u32,
    /// Event time in milliseconds.
    pub timestamp: f64,
    /// Target the event hit, if any.
    pub target: Option<TargetId>,
}

impl GesturePointerEvent {
    /// Creates an event at `(x, y)` with default pressure, buttons and time.
    #[must_use]
    pub const fn new(id: u32, action: PointerAction, x: f64, y: f64) -> Self {
        Self {
            id,
            action,
            pointer_type: PointerType::Mouse,
            x,
            y,
            pressure: 0.0,
            buttons: 0,
            timestamp: 0.0,
            target: None,
        }
    }

    /// Sets the target.
    #[must_use]
    pub const fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Latest state of every live pointer, in first-seen order.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerList(Vec<GesturePointerEvent>);

impl PointerList {
    /// Inserts or replaces the state of `event.id`.
    pub(crate) fn set(&mut self, event: &GesturePointerEvent) {
        if let Some(slot) = self.0.iter_mut().find(|p| p.id == event.id) {
            slot.clone_from(event);
        } else {
            self.0.push(event.clone());
        }
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<GesturePointerEvent> {
        let index = self.0.iter().position(|p| p.id == id)?;
        Some(self.0.remove(index))
    }

    pub(crate) fn get(&self, id: u32) -> Option<&GesturePointerEvent> {
        self.0.iter().find(|p| p.id == id)
    }

    pub(crate) fn as_slice(&self) -> &[GesturePointerEvent] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_upserts_in_place() {
        let mut list = PointerList::default();
        list.set(&GesturePointerEvent::new(1, PointerAction::Down, 0.0, 0.0));
        list.set(&GesturePointerEvent::new(2, PointerAction::Down, 5.0, 5.0));
        list.set(&GesturePointerEvent::new(1, PointerAction::Move, 3.0, 4.0));

        let ids: Vec<u32> = list.as_slice().iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(list.get(1).map(|p| p.x), Some(3.0));

        assert!(list.remove(1).is_some());
        assert!(list.remove(1).is_none());
        assert!(list.get(1).is_none());
    }
}
