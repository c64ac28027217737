#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

pub mod dispatch;
mod error;
mod features;
mod handler;
pub mod native;
mod pointer;
mod scheduler;
mod source;


pub use dispatch::{DispatchTarget, DispatchTree, TargetId, TargetTree};
pub use error::{GestureError, NativeError};
pub use features::{FeatureFlags, GestureConfig, ListenerKind};
pub use handler::{EventHandler, HandlerFlags, SourceId};
pub use native::{NativeBackend, NativeEventListener};
pub use pointer::{GesturePointerEvent, PointerAction, PointerType};
pub use scheduler::{Scheduler, Task, TaskQueue};
pub use source::{EventSource, GestureEventSource, SourceHandle};
