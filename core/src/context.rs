//! Ambient context propagated from context-provider nodes to their descendants.
//!
//! A [`Context`] is an immutable chain of frames. Entering a provider pushes a
//! new frame, producing a new `Context`; the parent context is left untouched,
//! so siblings never observe values pushed by each other.

use alloc::{rc::Rc, vec::Vec};
use core::{any::Any, fmt};

use crate::Str;

/// Values published by one context provider.
#[derive(Clone, Default)]
pub struct ContextValues(Rc<Vec<(Str, Rc<dyn Any>)>>);

impl ContextValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under `key`, returning the updated set.
    #[must_use]
    pub fn with<T: 'static>(mut self, key: impl Into<Str>, value: T) -> Self {
        let key = key.into();
        let entries = Rc::make_mut(&mut self.0);
        let value: Rc<dyn Any> = Rc::new(value);
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
        self
    }

    /// Looks up a value published directly by this set.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.0
            .iter()
            .find(|(k, _)| &**k == key)
            .and_then(|(_, v)| v.downcast_ref::<T>())
    }

    /// Returns `true` if both sets are the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn keys(&self) -> impl Iterator<Item = &Str> {
        self.0.iter().map(|(k, _)| k)
    }
}

impl fmt::Debug for ContextValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

struct Frame {
    values: ContextValues,
    parent: Option<Rc<Frame>>,
}

/// The context visible at one tree position.
#[derive(Clone, Default)]
pub struct Context(Option<Rc<Frame>>);

impl Context {
    /// Creates the empty root context.
    #[must_use]
    pub const fn root() -> Self {
        Self(None)
    }

    /// Returns a child context with `values` layered on top.
    #[must_use]
    pub fn push(&self, values: &ContextValues) -> Self {
        Self(Some(Rc::new(Frame {
            values: values.clone(),
            parent: self.0.clone(),
        })))
    }

    /// Looks up `key`, searching from the innermost frame outwards.
    ///
    /// Returns `None` when no frame publishes `key` or when the nearest value
    /// published under `key` is not a `T`.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        let mut frame = self.0.as_deref();
        while let Some(f) = frame {
            if f.values.keys().any(|k| &**k == key) {
                return f.values.get(key);
            }
            frame = f.parent.as_deref();
        }
        None
    }

    /// Returns `true` if no provider has pushed a frame.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_none()
    }

    /// Returns `true` if both chains hold the same frames, compared with
    /// [`ContextValues::ptr_eq`], innermost first.
    #[must_use]
    pub fn same_frames(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self.0.as_deref(), other.0.as_deref());
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) if core::ptr::eq(x, y) => return true,
                (Some(x), Some(y)) if x.values.ptr_eq(&y.values) => {
                    a = x.parent.as_deref();
                    b = y.parent.as_deref();
                }
                _ => return false,
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut frame = self.0.as_deref();
        while let Some(fr) = frame {
            list.entry(&fr.values);
            frame = fr.parent.as_deref();
        }
        list.finish()
    }
}
