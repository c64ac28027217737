//! The gesture event source.
//!
//! One source owns one native listener adapter and two [`EventSource`]
//! handles: pointer handlers receive raw pointer events and are routed, gesture
//! handlers only keep the adapter alive and contribute touch-action flags.
//!
//! State is only touched from the single dispatch call stack. No borrow is
//! held while handlers run, so handlers may add and remove routes and
//! listeners freely.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    DispatchTree, EventHandler, GestureConfig, GestureError, GesturePointerEvent, ListenerKind,
    NativeBackend, NativeEventListener, PointerAction, Scheduler, SourceId,
    dispatch::{accumulate_dispatch_targets, dispatch_event, touch_action_flags},
    pointer::PointerList,
};

/// A handle handlers register against.
pub trait EventSource {
    /// Returns the id handlers of this source carry.
    fn id(&self) -> SourceId;

    /// Records a new subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error when the native layer must be activated and fails to.
    fn add_listener(&self, handler: &EventHandler) -> Result<(), GestureError>;

    /// Drops a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::UnbalancedListener`] when there is no subscriber
    /// left to drop.
    fn remove_listener(&self, handler: &EventHandler) -> Result<(), GestureError>;
}

#[derive(Debug, Default)]
struct State {
    dependencies: usize,
    // token of the scheduled deactivation, if one is pending
    pending_deactivation: Option<u64>,
    next_token: u64,
    pointers: PointerList,
    routes: Vec<(u32, Vec<EventHandler>)>,
}

impl State {
    fn routes(&self, id: u32) -> Option<&Vec<EventHandler>> {
        self.routes.iter().find(|(p, _)| *p == id).map(|(_, r)| r)
    }

    /// Routes `handler` for pointer `id` unless it already is.
    fn push_route(&mut self, id: u32, handler: &EventHandler) {
        if let Some((_, routes)) = self.routes.iter_mut().find(|(p, _)| *p == id) {
            if !routes.iter().any(|h| h.ptr_eq(handler)) {
                routes.push(handler.clone());
            }
        } else {
            self.routes.push((id, vec![handler.clone()]));
        }
    }

    fn take_routes(&mut self, id: u32) -> Vec<EventHandler> {
        self.routes
            .iter()
            .position(|(p, _)| *p == id)
            .map(|i| self.routes.remove(i).1)
            .unwrap_or_default()
    }
}

struct Inner {
    pointer_source: SourceId,
    gesture_source: SourceId,
    kind: ListenerKind,
    scheduler: Rc<dyn Scheduler>,
    listener: RefCell<Box<dyn NativeEventListener>>,
    state: RefCell<State>,
}

impl Inner {
    fn add_listener(&self) -> Result<(), GestureError> {
        let mut state = self.state.borrow_mut();
        state.dependencies += 1;
        if state.dependencies > 1 {
            return Ok(());
        }
        if state.pending_deactivation.take().is_some() {
            tracing::debug!("cancelled pending listener deactivation");
            return Ok(());
        }
        drop(state);

        tracing::debug!(kind = ?self.kind, "activating native listener");
        if let Err(err) = self.listener.borrow_mut().activate() {
            self.state.borrow_mut().dependencies -= 1;
            return Err(GestureError::Activation(err));
        }
        Ok(())
    }

    fn remove_listener(self: &Rc<Self>) -> Result<(), GestureError> {
        let mut state = self.state.borrow_mut();
        if state.dependencies == 0 {
            return Err(GestureError::UnbalancedListener);
        }
        state.dependencies -= 1;
        if state.dependencies > 0 || state.pending_deactivation.is_some() {
            return Ok(());
        }
        state.next_token += 1;
        let token = state.next_token;
        state.pending_deactivation = Some(token);
        drop(state);

        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule_task(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.run_deactivation(token);
            }
        }));
        Ok(())
    }

    fn run_deactivation(&self, token: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.pending_deactivation != Some(token) {
                return;
            }
            state.pending_deactivation = None;
        }
        tracing::debug!(kind = ?self.kind, "deactivating native listener");
        if let Err(err) = self.listener.borrow_mut().deactivate() {
            let err = GestureError::Deactivation(err);
            tracing::error!(error = %err, "deferred listener deactivation failed");
        }
    }
}

/// Routes pointer events to handlers, with pointer capture.
pub struct GestureEventSource {
    inner: Rc<Inner>,
}

impl fmt::Debug for GestureEventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureEventSource")
            .field("kind", &self.inner.kind)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

impl GestureEventSource {
    /// Creates a source whose native listener variant is selected from
    /// `config.features`.
    pub fn new(
        config: &GestureConfig,
        backend: &dyn NativeBackend,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let kind = ListenerKind::select(config.features);
        tracing::debug!(?kind, features = ?config.features, "created gesture event source");
        Self {
            inner: Rc::new(Inner {
                pointer_source: SourceId::next(),
                gesture_source: SourceId::next(),
                kind,
                scheduler,
                listener: RefCell::new(backend.create_listener(kind)),
                state: RefCell::new(State::default()),
            }),
        }
    }

    /// Returns the selected native listener variant.
    #[must_use]
    pub fn listener_kind(&self) -> ListenerKind {
        self.inner.kind
    }

    /// Returns the handle pointer handlers register against.
    #[must_use]
    pub fn pointer_event_source(&self) -> SourceHandle {
        SourceHandle {
            id: self.inner.pointer_source,
            inner: Rc::clone(&self.inner),
        }
    }

    /// Returns the handle gesture recognizers register against.
    #[must_use]
    pub fn gesture_event_source(&self) -> SourceHandle {
        SourceHandle {
            id: self.inner.gesture_source,
            inner: Rc::clone(&self.inner),
        }
    }

    /// Routes later events of pointer `id` to `handler`.
    ///
    /// Does nothing when the pointer is not active or `handler` is already
    /// routed for it.
    pub fn add_route(&self, id: u32, handler: &EventHandler) {
        let mut state = self.inner.state.borrow_mut();
        if state.pointers.get(id).is_none() {
            tracing::warn!(pointer = id, "route added for an inactive pointer");
            return;
        }
        state.push_route(id, handler);
    }

    /// Stops routing pointer `id` to `handler`.
    ///
    /// Does nothing when the pointer was already released.
    pub fn remove_route(&self, id: u32, handler: &EventHandler) {
        let mut state = self.inner.state.borrow_mut();
        let Some(index) = state.routes.iter().position(|(p, _)| *p == id) else {
            return;
        };
        let routes = &mut state.routes[index].1;
        if let Some(i) = routes.iter().position(|h| h.ptr_eq(handler)) {
            routes.remove(i);
        }
        if routes.is_empty() {
            state.routes.remove(index);
        }
    }

    /// Returns the latest state of every active pointer.
    #[must_use]
    pub fn pointers(&self) -> Vec<GesturePointerEvent> {
        self.inner.state.borrow().pointers.as_slice().to_vec()
    }

    /// Returns the number of handlers routed for pointer `id`.
    #[must_use]
    pub fn route_count(&self, id: u32) -> usize {
        self.inner.state.borrow().routes(id).map_or(0, Vec::len)
    }

    /// Returns the number of subscribed listeners.
    #[must_use]
    pub fn dependencies(&self) -> usize {
        self.inner.state.borrow().dependencies
    }

    /// Dispatches a normalized event.
    ///
    /// On [`PointerAction::Down`] dispatch targets are collected from
    /// `event.target` up through `tree`. Without targets the event is dropped.
    /// Otherwise the pointer is captured and every pointer handler reached
    /// becomes a route for the pointer. Later events go to the routes only.
    ///
    /// A repeated Down for a pointer that is already down, such as a second
    /// mouse button, captures again but routes each handler once.
    ///
    /// # Errors
    ///
    /// Returns an error when the native layer fails to capture or release the
    /// pointer. A failed release still ends the interaction: the pointer and
    /// its routes are dropped without delivering the event.
    pub fn dispatch<T>(&self, tree: &T, event: &GesturePointerEvent) -> Result<(), GestureError>
    where
        T: DispatchTree + ?Sized,
    {
        match event.action {
            PointerAction::Down => self.dispatch_down(tree, event),
            PointerAction::Up | PointerAction::Cancel => self.dispatch_end(event),
            PointerAction::Move => {
                let routes = {
                    let mut state = self.inner.state.borrow_mut();
                    state.pointers.set(event);
                    state.routes(event.id).cloned().unwrap_or_default()
                };
                deliver(&routes, event);
                Ok(())
            }
        }
    }

    fn dispatch_down<T>(&self, tree: &T, event: &GesturePointerEvent) -> Result<(), GestureError>
    where
        T: DispatchTree + ?Sized,
    {
        let inner = &self.inner;
        let targets = accumulate_dispatch_targets(tree, event.target, |h| {
            h.source() == inner.pointer_source || h.source() == inner.gesture_source
        });
        if targets.is_empty() {
            tracing::trace!(pointer = event.id, "no dispatch targets, event dropped");
            return Ok(());
        }

        let flags = touch_action_flags(&targets);
        inner
            .listener
            .borrow_mut()
            .capture(event, flags)
            .map_err(|source| GestureError::Capture {
                id: event.id,
                source,
            })?;
        inner.state.borrow_mut().pointers.set(event);
        tracing::debug!(pointer = event.id, targets = targets.len(), ?flags, "pointer captured");

        dispatch_event(&targets, event, |handler, event| {
            if handler.source() == inner.pointer_source {
                inner.state.borrow_mut().push_route(event.id, handler);
                handler.call(event);
            }
        });
        Ok(())
    }

    fn dispatch_end(&self, event: &GesturePointerEvent) -> Result<(), GestureError> {
        if self.inner.state.borrow().pointers.get(event.id).is_none() {
            tracing::trace!(pointer = event.id, "pointer already released");
            return Ok(());
        }
        let released = self.inner.listener.borrow_mut().release(event);
        let routes = {
            let mut state = self.inner.state.borrow_mut();
            state.pointers.remove(event.id);
            state.take_routes(event.id)
        };
        if let Err(source) = released {
            tracing::debug!(pointer = event.id, routes = routes.len(), "pointer release failed");
            return Err(GestureError::Release {
                id: event.id,
                source,
            });
        }
        tracing::debug!(pointer = event.id, routes = routes.len(), "pointer released");
        deliver(&routes, event);
        Ok(())
    }
}

fn deliver(routes: &[EventHandler], event: &GesturePointerEvent) {
    for route in routes {
        tracing::trace!(pointer = event.id, action = ?event.action, "deliver to route");
        route.call(event);
    }
}

/// An [`EventSource`] handle of a [`GestureEventSource`].
#[derive(Clone)]
pub struct SourceHandle {
    id: SourceId,
    inner: Rc<Inner>,
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl EventSource for SourceHandle {
    fn id(&self) -> SourceId {
        self.id
    }

    fn add_listener(&self, _handler: &EventHandler) -> Result<(), GestureError> {
        self.inner.add_listener()
    }

    fn remove_listener(&self, _handler: &EventHandler) -> Result<(), GestureError> {
        self.inner.remove_listener()
    }
}
