/// A convenient type alias for `Result` with `E` = [`enum@RegistryError`].
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Errors surfaced by the identity registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The handle does not refer to a live object, so there is no identity to register.
	#[error("handle does not refer to a live object")]
	Dangling,

	/// Registry options failed validation.
	#[error("invalid registry option `{field}`: {reason}")]
	InvalidOptions { field: &'static str, reason: &'static str },
}
