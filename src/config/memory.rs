//! In-memory [`ConfigStore`] for embedding and tests.

// self
use crate::{_prelude::*, config::ConfigStore};

/// Fixed key/value configuration held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryConfig(BTreeMap<String, String>);
impl MemoryConfig {
	/// Adds or replaces a value, returning the updated store.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);

		self
	}

	/// Adds or replaces a value in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}
}
impl ConfigStore for MemoryConfig {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get(key).cloned()
	}
}
impl<K, V> FromIterator<(K, V)> for MemoryConfig
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
