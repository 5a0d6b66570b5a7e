use std::sync::Weak;

/// Non-owning probe answering whether an observed object is still alive.
///
/// Implemented for [`Weak`] so entries can hold tokens for objects of any type
/// behind one trait object. A token keeps the allocation reserved but never the
/// value, so the address it was registered under stays unique until the token
/// itself is dropped.
pub(crate) trait Liveness: Send + Sync {
	fn is_live(&self) -> bool;
}

impl<T: ?Sized + Send + Sync> Liveness for Weak<T> {
	fn is_live(&self) -> bool {
		self.strong_count() > 0
	}
}

/// Boxed token stored per registry entry.
pub(crate) type Token = Box<dyn Liveness>;

/// Returns the thin address of the allocation behind `ptr`.
///
/// Metadata of unsized pointees (slice lengths, vtables) is discarded, so an
/// `Arc<T>` and the same allocation coerced to `Arc<dyn Trait>` share a key.
pub(crate) fn address_of<T: ?Sized>(ptr: *const T) -> usize {
	ptr.cast::<()>().addr()
}
