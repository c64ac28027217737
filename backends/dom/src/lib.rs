#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

mod error;
mod lis;
mod memory;
mod patch;
mod reconcile;

#[cfg(test)]
mod tests;

pub use error::ReconcileError;
pub use memory::MemoryDom;
pub use patch::{NodeId, Patch, PatchList};
pub use reconcile::Root;
