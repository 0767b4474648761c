//! Environment-backed [`ConfigStore`].
//!
//! Keys map to variable names by upper-casing them, splitting camel case, and replacing
//! every separator with `_`: `azure-native:tenantId` is read from `AZURE_NATIVE_TENANT_ID`.

// self
use crate::{_prelude::*, config::ConfigStore};

/// Snapshot of process environment variables answering configuration lookups.
#[derive(Clone, Default)]
pub struct EnvConfig(BTreeMap<String, String>);
impl EnvConfig {
	/// Captures the current process environment.
	pub fn capture() -> Self {
		Self::from_vars(std::env::vars())
	}

	/// Builds a snapshot from explicit `(name, value)` pairs.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}

	/// Returns the variable name consulted for `key`.
	pub fn var_name(key: &str) -> String {
		let mut name = String::with_capacity(key.len() + 4);
		let mut prev_lower = false;

		for ch in key.chars() {
			if ch.is_ascii_alphanumeric() {
				if ch.is_ascii_uppercase() && prev_lower {
					name.push('_');
				}

				name.push(ch.to_ascii_uppercase());

				prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
			} else {
				if !name.is_empty() && !name.ends_with('_') {
					name.push('_');
				}

				prev_lower = false;
			}
		}

		while name.ends_with('_') {
			name.pop();
		}

		name
	}
}
impl ConfigStore for EnvConfig {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get(&Self::var_name(key)).cloned()
	}
}
impl Debug for EnvConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Variable values may hold secrets.
		write!(f, "EnvConfig({} vars)", self.0.len())
	}
}
