use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier assigned to an observed object.
///
/// Opaque label: the numeric value reflects the order in which objects were
/// first observed by a registry, not the order in which they were created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
	pub(crate) const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw numeric value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

impl From<ObjectId> for u64 {
	fn from(id: ObjectId) -> Self {
		id.0
	}
}
