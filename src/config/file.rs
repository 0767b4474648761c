//! JSON file-backed [`ConfigStore`].
//!
//! The file is a JSON object of keys to values, optionally nested under a top-level
//! `config` object the way stack files group their settings. String values are returned as
//! is; any other value is returned as its JSON text, so `provisioner:redirectUris` may be
//! written as a native array.

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{_prelude::*, config::ConfigStore, error::ConfigError};

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Configuration loaded once from a JSON file.
#[derive(Clone, Debug)]
pub struct FileConfig {
	path: PathBuf,
	entries: BTreeMap<String, String>,
}
impl FileConfig {
	/// Reads and parses the file at `path`.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let path = path.into();
		let bytes = fs::read(&path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
		let entries = Self::parse(&path, &bytes)?;

		Ok(Self { path, entries })
	}

	/// Path the configuration was loaded from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn parse(path: &Path, bytes: &[u8]) -> Result<BTreeMap<String, String>, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);
		let mut root: JsonMap = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;
		let root = match root.remove("config") {
			Some(serde_json::Value::Object(nested)) => nested,
			Some(other) => {
				root.insert("config".into(), other);

				root
			},
			None => root,
		};

		Ok(root
			.into_iter()
			.map(|(key, value)| {
				let value = match value {
					serde_json::Value::String(text) => text,
					other => other.to_string(),
				};

				(key, value)
			})
			.collect())
	}
}
impl ConfigStore for FileConfig {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.get(key).cloned()
	}
}
