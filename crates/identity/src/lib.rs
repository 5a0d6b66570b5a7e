//! Object identity registry.
//!
//! Assigns a stable, monotonically increasing [`ObjectId`] to every distinct
//! shared allocation observed through an [`Arc`](std::sync::Arc), without
//! keeping the observed object alive.
//!
//! Identity is allocation identity: two handles name the same object iff
//! [`Arc::ptr_eq`](std::sync::Arc::ptr_eq) holds for them, whatever their
//! `PartialEq` says. The registry stores only weak liveness tokens, so dropping
//! the last strong handle to an object drops the object immediately. Entries of
//! dropped objects are reclaimed by amortized sweeps and by
//! [`IdentityRegistry::purge`].
//!
//! A token is a [`Weak`](std::sync::Weak), so while an entry exists the
//! `Arc` allocation backing a dropped object stays reserved: its value has been
//! dropped, but the memory block is only released once the entry is removed by
//! a sweep, [`IdentityRegistry::purge`] or [`IdentityRegistry::forget`]. This
//! also keeps the address from being reused by another object while its
//! entry is stored.
//!
//! Unlike a garbage-collected weak map, reclamation here is not driven by a
//! collector. Callers that destroy objects in bulk and care about the size of
//! the entry table may call [`IdentityRegistry::purge`], or unregister an
//! object explicitly with [`IdentityRegistry::forget`].

/// Registry error types.
pub mod error;
/// Process-wide registry instance.
mod global;
/// Object identifier type.
pub mod id;
/// Type-erased liveness tokens.
mod liveness;
/// Registry tuning options.
pub mod options;
/// The identity registry itself.
pub mod registry;

pub use error::{RegistryError, Result};
pub use global::{get_or_assign_id, global};
pub use id::ObjectId;
pub use options::RegistryOptions;
pub use registry::{IdentityRegistry, RegistryStats};
