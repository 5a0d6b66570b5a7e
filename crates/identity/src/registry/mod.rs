//! Weak-keyed identity registry.
//!
//! Maps each observed allocation to the [`ObjectId`] minted on its first
//! observation. Entries hold only [`Weak`] tokens, so registering an object
//! never extends its lifetime.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::liveness::{Token, address_of};
use crate::{ObjectId, RegistryError, RegistryOptions, Result};

/// Point-in-time counters for a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
	/// Entries currently stored, including dead entries not yet swept.
	pub entries: usize,
	/// Stored entries whose object is still alive.
	pub live: usize,
	/// Ids minted so far; also the next id to be assigned.
	pub minted: u64,
	/// Dead entries removed by sweeps over the registry's lifetime.
	pub reclaimed: u64,
	/// Sweeps performed, amortized or explicit.
	pub sweeps: u64,
}

struct Entry {
	id: ObjectId,
	token: Token,
}

/// Table and counter, updated together under one lock.
///
/// Invariant: `entries.len() <= watermark`. Insertion sweeps dead entries
/// whenever the table has reached the watermark, then moves the watermark to
/// twice the surviving live count (floored at the configured threshold).
struct RegistryState {
	entries: FxHashMap<usize, Entry>,
	next_id: u64,
	watermark: usize,
	reclaimed: u64,
	sweeps: u64,
}

impl RegistryState {
	fn new(opts: &RegistryOptions) -> Self {
		Self {
			entries: FxHashMap::with_capacity_and_hasher(opts.initial_capacity, Default::default()),
			next_id: 0,
			watermark: opts.sweep_threshold,
			reclaimed: 0,
			sweeps: 0,
		}
	}

	fn mint(&mut self) -> ObjectId {
		let id = ObjectId::new(self.next_id);
		self.next_id += 1;
		id
	}

	/// Drops entries of dead objects and reschedules the next sweep.
	fn sweep(&mut self, threshold: usize) -> usize {
		let before = self.entries.len();
		self.entries.retain(|_, entry| entry.token.is_live());
		let live = self.entries.len();
		let reclaimed = before - live;

		self.watermark = threshold.max(live.saturating_mul(2));
		self.reclaimed += reclaimed as u64;
		self.sweeps += 1;

		debug!(reclaimed, live, watermark = self.watermark, "identity.sweep");
		reclaimed
	}
}

/// Assigns stable ids to objects by identity without retaining them.
///
/// Objects are observed through [`Arc`] handles; every handle sharing one
/// allocation receives the same id, including handles coerced to trait
/// objects. Ids start at 0 and advance by one per newly observed object.
/// A registry never hands out the same id twice, so ids stay unique among
/// live objects even after dead entries are reclaimed.
///
/// # Concurrency
///
/// Lookup and insertion run inside one `parking_lot::Mutex` critical section,
/// so concurrent first observations of the same object agree on a single id.
/// The lock is held only for a hash lookup, an insert, and the occasional
/// amortized sweep.
///
/// A sweep walks the whole table while holding the lock, so the insertion
/// that triggers it takes time proportional to the table size and other
/// callers wait for it. Sweeps are spaced so the cost per insertion stays
/// constant on average. [`purge`](Self::purge) has the same cost and can be
/// called at a convenient moment to move that work off a hot path.
pub struct IdentityRegistry {
	state: Mutex<RegistryState>,
	sweep_threshold: usize,
}

impl Default for IdentityRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl IdentityRegistry {
	/// Creates an empty registry with default options.
	pub fn new() -> Self {
		let opts = RegistryOptions::default();
		Self {
			state: Mutex::new(RegistryState::new(&opts)),
			sweep_threshold: opts.sweep_threshold,
		}
	}

	/// Creates an empty registry after validating `opts`.
	pub fn with_options(opts: RegistryOptions) -> Result<Self> {
		opts.validate()?;
		Ok(Self {
			state: Mutex::new(RegistryState::new(&opts)),
			sweep_threshold: opts.sweep_threshold,
		})
	}

	/// Returns the id of `obj`, minting the next one on first observation.
	pub fn get_or_assign_id<T>(&self, obj: &Arc<T>) -> ObjectId
	where
		T: ?Sized + Send + Sync + 'static,
	{
		let key = address_of(Arc::as_ptr(obj));
		let mut state = self.state.lock();

		if let Some(entry) = state.entries.get(&key) {
			debug_assert!(entry.token.is_live(), "entry for a held object must be live");
			return entry.id;
		}

		if state.entries.len() >= state.watermark {
			state.sweep(self.sweep_threshold);
		}

		let id = state.mint();
		let token: Token = Box::new(Arc::downgrade(obj));
		state.entries.insert(key, Entry { id, token });
		trace!(%id, entries = state.entries.len(), "identity.assign");
		id
	}

	/// Like [`get_or_assign_id`](Self::get_or_assign_id), but observes the
	/// object through a weak handle.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::Dangling`] when the handle has no live object
	/// behind it. No id is minted in that case.
	pub fn try_get_or_assign_id<T>(&self, obj: &Weak<T>) -> Result<ObjectId>
	where
		T: ?Sized + Send + Sync + 'static,
	{
		let obj = obj.upgrade().ok_or(RegistryError::Dangling)?;
		Ok(self.get_or_assign_id(&obj))
	}

	/// Returns the id of `obj` if it has been observed, without minting.
	pub fn id_of<T>(&self, obj: &Arc<T>) -> Option<ObjectId>
	where
		T: ?Sized,
	{
		let key = address_of(Arc::as_ptr(obj));
		self.state.lock().entries.get(&key).map(|entry| entry.id)
	}

	/// Unregisters `obj`, returning the id it held.
	///
	/// Observing the object again afterwards mints a fresh id. Owners that
	/// know when an object is retired can call this instead of waiting for a
	/// sweep to notice.
	pub fn forget<T>(&self, obj: &Arc<T>) -> Option<ObjectId>
	where
		T: ?Sized,
	{
		let key = address_of(Arc::as_ptr(obj));
		let removed = self.state.lock().entries.remove(&key).map(|entry| entry.id);
		if let Some(id) = removed {
			trace!(%id, "identity.forget");
		}
		removed
	}

	/// Reclaims entries of objects that have been dropped, returning how many.
	pub fn purge(&self) -> usize {
		self.state.lock().sweep(self.sweep_threshold)
	}

	/// Number of stored entries, including dead entries not yet swept.
	pub fn len(&self) -> usize {
		self.state.lock().entries.len()
	}

	/// Returns true when no entries are stored.
	pub fn is_empty(&self) -> bool {
		self.state.lock().entries.is_empty()
	}

	/// Number of ids minted so far.
	pub fn minted(&self) -> u64 {
		self.state.lock().next_id
	}

	/// Returns a snapshot of the registry counters.
	pub fn stats(&self) -> RegistryStats {
		let state = self.state.lock();
		RegistryStats {
			entries: state.entries.len(),
			live: state.entries.values().filter(|entry| entry.token.is_live()).count(),
			minted: state.next_id,
			reclaimed: state.reclaimed,
			sweeps: state.sweeps,
		}
	}
}

impl fmt::Debug for IdentityRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IdentityRegistry")
			.field("sweep_threshold", &self.sweep_threshold)
			.field("stats", &self.stats())
			.finish()
	}
}
