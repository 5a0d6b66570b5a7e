use serde::Deserialize;

use crate::{RegistryError, Result};

/// Default minimum entry count before an amortized sweep runs.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Tuning knobs for an [`IdentityRegistry`](crate::IdentityRegistry).
///
/// Deserializable so embedding applications can carry it in their own
/// configuration files; every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryOptions {
	/// Number of entries the table is pre-sized for.
	pub initial_capacity: usize,
	/// Entry count at which insertion first triggers a sweep of dead entries.
	///
	/// After each sweep the next sweep is scheduled at twice the surviving
	/// live count, but never below this value.
	pub sweep_threshold: usize,
}

impl Default for RegistryOptions {
	fn default() -> Self {
		Self {
			initial_capacity: 0,
			sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
		}
	}
}

impl RegistryOptions {
	/// Checks that the options describe a usable registry.
	pub fn validate(&self) -> Result<()> {
		if self.sweep_threshold == 0 {
			return Err(RegistryError::InvalidOptions {
				field: "sweep_threshold",
				reason: "must be greater than zero",
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let opts = RegistryOptions::default();
		assert_eq!(opts.sweep_threshold, DEFAULT_SWEEP_THRESHOLD);
		assert!(opts.validate().is_ok());
	}

	#[test]
	fn zero_threshold_is_rejected() {
		let opts = RegistryOptions {
			sweep_threshold: 0,
			..Default::default()
		};
		assert_eq!(
			opts.validate(),
			Err(RegistryError::InvalidOptions {
				field: "sweep_threshold",
				reason: "must be greater than zero",
			})
		);
	}

	#[test]
	fn loads_partial_table_from_toml() {
		let opts: RegistryOptions = toml::from_str("sweep_threshold = 64").expect("valid toml");
		assert_eq!(opts.sweep_threshold, 64);
		assert_eq!(opts.initial_capacity, 0);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let res: std::result::Result<RegistryOptions, _> = toml::from_str("sweep = 3");
		assert!(res.is_err());
	}
}
