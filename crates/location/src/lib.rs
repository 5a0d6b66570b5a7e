//! Labels for shared memory locations.
//!
//! A [`Location`] names one field or element of a heap object by the object's
//! [`ObjectId`], so events touching the same location can be matched across
//! threads and across the lifetime of a run. Static fields belong to no
//! object and are labeled by their owning type instead.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub use objid_identity::ObjectId;
use objid_identity::IdentityRegistry;
use serde::Serialize;

/// A labeled shared memory location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
	/// Named field of an object, rendered `#3.value`.
	Field { owner: ObjectId, field: Cow<'static, str> },
	/// Indexed element of an array-like object, rendered `#3[5]`.
	Element { owner: ObjectId, index: usize },
	/// Static field of a type, rendered `Counter::value`.
	Static {
		owner_type: Cow<'static, str>,
		field: Cow<'static, str>,
	},
}

impl Location {
	/// Returns the owning object's id, or `None` for static fields.
	pub fn owner(&self) -> Option<ObjectId> {
		match self {
			Self::Field { owner, .. } | Self::Element { owner, .. } => Some(*owner),
			Self::Static { .. } => None,
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field { owner, field } => write!(f, "{owner}.{field}"),
			Self::Element { owner, index } => write!(f, "{owner}[{index}]"),
			Self::Static { owner_type, field } => write!(f, "{owner_type}::{field}"),
		}
	}
}

/// Produces [`Location`] labels using an identity registry.
#[derive(Debug, Clone)]
pub struct Labeler {
	registry: Registry,
}

#[derive(Debug, Clone)]
enum Registry {
	Global,
	Shared(Arc<IdentityRegistry>),
}

impl Labeler {
	/// Labels objects through the given registry.
	pub fn new(registry: &Arc<IdentityRegistry>) -> Self {
		Self {
			registry: Registry::Shared(Arc::clone(registry)),
		}
	}

	/// Labels objects through the process-wide registry.
	pub fn global() -> Self {
		Self {
			registry: Registry::Global,
		}
	}

	fn registry(&self) -> &IdentityRegistry {
		match &self.registry {
			Registry::Global => objid_identity::global(),
			Registry::Shared(registry) => registry,
		}
	}

	/// Labels field `name` of `obj`.
	pub fn field<T>(&self, obj: &Arc<T>, name: impl Into<Cow<'static, str>>) -> Location
	where
		T: ?Sized + Send + Sync + 'static,
	{
		Location::Field {
			owner: self.registry().get_or_assign_id(obj),
			field: name.into(),
		}
	}

	/// Labels element `index` of `obj`.
	pub fn element<T>(&self, obj: &Arc<T>, index: usize) -> Location
	where
		T: ?Sized + Send + Sync + 'static,
	{
		Location::Element {
			owner: self.registry().get_or_assign_id(obj),
			index,
		}
	}

	/// Labels static field `name` of type `T`. Never touches the registry.
	pub fn static_field<T: ?Sized>(&self, name: impl Into<Cow<'static, str>>) -> Location {
		Location::Static {
			owner_type: short_type_name::<T>(),
			field: name.into(),
		}
	}
}

/// Type name with every module path stripped, including inside generic
/// arguments, tuples, slices and references.
///
/// `core::option::Option<my_crate::Counter>` becomes `Option<Counter>`.
fn short_type_name<T: ?Sized>() -> Cow<'static, str> {
	let full = std::any::type_name::<T>();
	if !full.contains("::") {
		return Cow::Borrowed(full);
	}

	let mut out = String::with_capacity(full.len());
	let mut segment_start = 0;
	let mut chars = full.chars().peekable();
	while let Some(c) = chars.next() {
		if c.is_alphanumeric() || c == '_' {
			out.push(c);
		} else if c == ':' && chars.peek() == Some(&':') {
			chars.next();
			out.truncate(segment_start);
		} else {
			out.push(c);
			segment_start = out.len();
		}
	}
	Cow::Owned(out)
}
