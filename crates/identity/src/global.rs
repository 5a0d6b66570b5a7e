use std::sync::{Arc, OnceLock};

use crate::{IdentityRegistry, ObjectId};

static GLOBAL: OnceLock<IdentityRegistry> = OnceLock::new();

/// Returns the process-wide registry, creating it with default options on first use.
///
/// Code that needs isolation (tests in particular) should construct its own
/// [`IdentityRegistry`] instead.
pub fn global() -> &'static IdentityRegistry {
	GLOBAL.get_or_init(IdentityRegistry::new)
}

/// Returns the id of `obj` in the process-wide registry.
pub fn get_or_assign_id<T>(obj: &Arc<T>) -> ObjectId
where
	T: ?Sized + Send + Sync + 'static,
{
	global().get_or_assign_id(obj)
}
