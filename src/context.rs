//! Explicit run context: configuration access, run mode, and the output channel.
//!
//! A [`RunContext`] is created at the start of a run, passed by reference into every step,
//! and consumed by [`RunContext::finish`] once the last export happened or the first error
//! ended the run. Outputs exported before a failure stay in the finished set.

// self
use crate::{_prelude::*, auth::Secret, config::ConfigStore, error::ConfigError};

/// Output carrying the located application id.
pub const APPLICATION_ID_OUTPUT: &str = "applicationId";
/// Output carrying the located application object id.
pub const APPLICATION_OBJECT_ID_OUTPUT: &str = "applicationObjectId";
/// Output carrying the issued client secret (apply only).
pub const SECRET_OUTPUT: &str = "secret";
/// Output echoing the service principal's redirect URIs after the patch (apply only).
pub const REDIRECT_URIS_OUTPUT: &str = "redirect URIs of sp";

/// Whether a run may mutate external state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
	/// Dry run: reads only.
	#[default]
	Plan,
	/// Reads followed by mutations.
	Apply,
}
impl RunMode {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Plan => "plan",
			Self::Apply => "apply",
		}
	}

	/// Returns `true` for [`RunMode::Plan`].
	pub const fn is_dry_run(self) -> bool {
		matches!(self, Self::Plan)
	}
}
impl Display for RunMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Value exported on the run output channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputValue {
	/// Plain string.
	String(String),
	/// Ordered list of strings.
	List(Vec<String>),
	/// Sensitive string, redacted unless explicitly revealed.
	Secret(Secret),
}
impl OutputValue {
	/// Returns the plain string, if this is [`OutputValue::String`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the list, if this is [`OutputValue::List`].
	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			Self::List(values) => Some(values),
			_ => None,
		}
	}

	/// Returns the secret, if this is [`OutputValue::Secret`].
	pub fn as_secret(&self) -> Option<&Secret> {
		match self {
			Self::Secret(secret) => Some(secret),
			_ => None,
		}
	}

	/// Renders the value as JSON, replacing secrets with `"[secret]"` unless `reveal` is set.
	pub fn to_json(&self, reveal: bool) -> serde_json::Value {
		match self {
			Self::String(value) => serde_json::Value::String(value.clone()),
			Self::List(values) => values.iter().cloned().map(serde_json::Value::String).collect(),
			Self::Secret(secret) if reveal => serde_json::Value::String(secret.expose().to_owned()),
			Self::Secret(_) => serde_json::Value::String("[secret]".into()),
		}
	}
}
impl From<&str> for OutputValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}
impl From<String> for OutputValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}
impl From<Vec<String>> for OutputValue {
	fn from(values: Vec<String>) -> Self {
		Self::List(values)
	}
}
impl From<Secret> for OutputValue {
	fn from(secret: Secret) -> Self {
		Self::Secret(secret)
	}
}

/// Named outputs exported by a run, in key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outputs(BTreeMap<String, OutputValue>);
impl Outputs {
	/// Looks up an output by name.
	pub fn get(&self, name: &str) -> Option<&OutputValue> {
		self.0.get(name)
	}

	/// Returns `true` when `name` was exported.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Number of exported outputs.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when nothing was exported.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Exported output names in key order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Renders every output into a JSON object; see [`OutputValue::to_json`].
	pub fn to_json(&self, reveal_secrets: bool) -> serde_json::Value {
		self.0
			.iter()
			.map(|(name, value)| (name.clone(), value.to_json(reveal_secrets)))
			.collect::<serde_json::Map<_, _>>()
			.into()
	}
}

/// Per-run context threaded through every pipeline step.
pub struct RunContext {
	config: Arc<dyn ConfigStore>,
	outputs: Outputs,
}
impl RunContext {
	/// Starts a run backed by `config`.
	pub fn new(config: Arc<dyn ConfigStore>) -> Self {
		Self { config, outputs: Outputs::default() }
	}

	/// Reads an optional configuration value.
	pub fn config(&self, key: &str) -> Option<String> {
		self.config.get(key)
	}

	/// Reads a required configuration value, naming the key when absent.
	pub fn require_config(&self, key: &str) -> Result<String, ConfigError> {
		self.config(key).ok_or_else(|| ConfigError::missing(key))
	}

	/// Exports a named output, replacing any earlier value with the same name.
	pub fn export(&mut self, name: impl Into<String>, value: impl Into<OutputValue>) {
		let name = name.into();

		#[cfg(feature = "tracing")]
		tracing::debug!(output = %name, "exported run output");

		self.outputs.0.insert(name, value.into());
	}

	/// Outputs exported so far.
	pub fn outputs(&self) -> &Outputs {
		&self.outputs
	}

	/// Ends the run and hands back everything that was exported.
	pub fn finish(self) -> Outputs {
		self.outputs
	}
}
impl Debug for RunContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RunContext")
			.field("outputs", &self.outputs.names().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::MemoryConfig;

	#[test]
	fn require_config_names_missing_key() {
		let ctx = RunContext::new(Arc::new(MemoryConfig::default()));
		let err = ctx.require_config("azure-native:clientId").expect_err("Key is absent.");

		assert_eq!(
			err.to_string(),
			"Missing required configuration value `azure-native:clientId`."
		);
	}

	#[test]
	fn outputs_redact_secrets_unless_revealed() {
		let mut ctx = RunContext::new(Arc::new(MemoryConfig::default()));

		ctx.export(APPLICATION_ID_OUTPUT, "app-1");
		ctx.export(SECRET_OUTPUT, Secret::new("plaintext"));
		ctx.export(REDIRECT_URIS_OUTPUT, vec!["https://a.example.com".to_owned()]);

		let outputs = ctx.finish();

		assert_eq!(
			outputs.to_json(false),
			serde_json::json!({
				"applicationId": "app-1",
				"secret": "[secret]",
				"redirect URIs of sp": ["https://a.example.com"],
			})
		);
		assert_eq!(outputs.to_json(true)["secret"], "plaintext");
	}

	#[test]
	fn run_mode_labels() {
		assert!(RunMode::Plan.is_dry_run());
		assert!(!RunMode::Apply.is_dry_run());
		assert_eq!(RunMode::Apply.to_string(), "apply");
	}
}
