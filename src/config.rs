//! Configuration stores and the resolvers that read credentials and provisioning settings.
//!
//! Keys are namespaced the way a stack configuration namespaces them: deployer credentials
//! live under `azure-native:`, provisioning inputs under `provisioner:`. Stores only answer
//! "present or absent"; the resolvers decide what absence means.

pub mod cloud;
pub mod env;
pub mod file;
pub mod memory;

pub use cloud::*;
pub use env::EnvConfig;
pub use file::FileConfig;
pub use memory::MemoryConfig;

// self
use crate::{_prelude::*, auth::Credentials, context::RunContext, error::ConfigError};

/// Tenant identifier of the deploying principal.
pub const TENANT_ID_KEY: &str = "azure-native:tenantId";
/// Client identifier of the deploying principal.
pub const CLIENT_ID_KEY: &str = "azure-native:clientId";
/// Client secret of the deploying principal.
pub const CLIENT_SECRET_KEY: &str = "azure-native:clientSecret";
/// Cloud environment (`public`, `usgovernment`, `china`).
pub const ENVIRONMENT_KEY: &str = "azure-native:environment";
/// Display name of the application registration to provision.
pub const APPLICATION_NAME_KEY: &str = "provisioner:applicationName";
/// JSON array of redirect URIs to pin on the application.
pub const REDIRECT_URIS_KEY: &str = "provisioner:redirectUris";
/// Display label attached to issued client secrets.
pub const SECRET_LABEL_KEY: &str = "provisioner:secretLabel";

/// Application display name used when `provisioner:applicationName` is unset.
pub const DEFAULT_APPLICATION_NAME: &str = "demo";
/// Redirect URIs used when `provisioner:redirectUris` is unset.
pub const DEFAULT_REDIRECT_URIS: &[&str] = &["https://marcelheers:8080"];
/// Secret label used when `provisioner:secretLabel` is unset.
pub const DEFAULT_SECRET_LABEL: &str = "created by app-provisioner";

/// Key/value lookup contract for run configuration.
pub trait ConfigStore
where
	Self: Send + Sync,
{
	/// Returns the value for `key`, or `None` when the store does not hold it.
	fn get(&self, key: &str) -> Option<String>;
}

/// Ordered stack of stores; the first store holding a key wins.
#[derive(Clone, Default)]
pub struct LayeredConfig(Vec<Arc<dyn ConfigStore>>);
impl LayeredConfig {
	/// Appends a lower-priority layer.
	pub fn with_layer(mut self, store: impl 'static + ConfigStore) -> Self {
		self.0.push(Arc::new(store));

		self
	}
}
impl ConfigStore for LayeredConfig {
	fn get(&self, key: &str) -> Option<String> {
		self.0.iter().find_map(|store| store.get(key))
	}
}
impl Debug for LayeredConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "LayeredConfig({} layers)", self.0.len())
	}
}

/// Reads the deployer credentials, failing on the first absent key.
pub fn resolve_credentials(ctx: &RunContext) -> Result<Credentials, ConfigError> {
	let tenant_id = ctx.require_config(TENANT_ID_KEY)?;
	let client_id = ctx.require_config(CLIENT_ID_KEY)?;
	let client_secret = ctx.require_config(CLIENT_SECRET_KEY)?;

	Ok(Credentials::new(tenant_id, client_id, client_secret))
}

/// Provisioning inputs beyond the deployer credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisionSettings {
	/// Exact display name of the application registration.
	pub application_name: String,
	/// Redirect URIs, in order, exactly as configured.
	pub redirect_uris: Vec<String>,
	/// Display label for issued client secrets.
	pub secret_label: String,
}
impl ProvisionSettings {
	/// Resolves settings from the run configuration, applying defaults for absent keys.
	pub fn resolve(ctx: &RunContext) -> Result<Self, ConfigError> {
		let application_name = match ctx.config(APPLICATION_NAME_KEY) {
			Some(name) if name.trim().is_empty() =>
				return Err(ConfigError::invalid(APPLICATION_NAME_KEY, "value is blank")),
			Some(name) => name,
			None => DEFAULT_APPLICATION_NAME.to_owned(),
		};
		let redirect_uris = match ctx.config(REDIRECT_URIS_KEY) {
			Some(raw) => parse_redirect_uris(&raw)?,
			None => DEFAULT_REDIRECT_URIS.iter().map(|uri| (*uri).to_owned()).collect(),
		};
		let secret_label =
			ctx.config(SECRET_LABEL_KEY).unwrap_or_else(|| DEFAULT_SECRET_LABEL.to_owned());

		Ok(Self { application_name, redirect_uris, secret_label })
	}
}

fn parse_redirect_uris(raw: &str) -> Result<Vec<String>, ConfigError> {
	let uris: Vec<String> = serde_json::from_str(raw).map_err(|e| {
		ConfigError::invalid(REDIRECT_URIS_KEY, format_args!("expected a JSON array of strings ({e})"))
	})?;

	for uri in &uris {
		Url::parse(uri).map_err(|e| {
			ConfigError::invalid(REDIRECT_URIS_KEY, format_args!("`{uri}` is not an absolute URL ({e})"))
		})?;
	}

	Ok(uris)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn context(store: MemoryConfig) -> RunContext {
		RunContext::new(Arc::new(store))
	}

	#[test]
	fn credentials_resolve_when_all_keys_present() {
		let ctx = context(
			MemoryConfig::default()
				.with(TENANT_ID_KEY, "tenant")
				.with(CLIENT_ID_KEY, "client")
				.with(CLIENT_SECRET_KEY, "secret"),
		);
		let creds = resolve_credentials(&ctx).expect("All credential keys are present.");

		assert_eq!(creds, Credentials::new("tenant", "client", "secret"));
	}

	#[test]
	fn credentials_report_each_missing_key() {
		let full = [
			(TENANT_ID_KEY, "tenant"),
			(CLIENT_ID_KEY, "client"),
			(CLIENT_SECRET_KEY, "secret"),
		];

		for (absent, _) in full {
			let store = full
				.iter()
				.filter(|(key, _)| *key != absent)
				.fold(MemoryConfig::default(), |store, (key, value)| store.with(*key, *value));
			let err = resolve_credentials(&context(store))
				.expect_err("Resolution should fail when a credential key is absent.");

			assert!(
				matches!(&err, ConfigError::MissingKey { key } if key == absent),
				"Expected {absent} to be reported, got {err:?}."
			);
		}
	}

	#[test]
	fn credentials_report_first_missing_key_only() {
		let err = resolve_credentials(&context(MemoryConfig::default()))
			.expect_err("Empty configuration must fail.");

		assert!(matches!(err, ConfigError::MissingKey { key } if key == TENANT_ID_KEY));
	}

	#[test]
	fn settings_fall_back_to_defaults() {
		let settings = ProvisionSettings::resolve(&context(MemoryConfig::default()))
			.expect("Defaults should resolve.");

		assert_eq!(settings.application_name, "demo");
		assert_eq!(settings.redirect_uris, vec!["https://marcelheers:8080".to_owned()]);
		assert_eq!(settings.secret_label, DEFAULT_SECRET_LABEL);
	}

	#[test]
	fn settings_keep_redirect_uris_verbatim_and_ordered() {
		let ctx = context(
			MemoryConfig::default()
				.with(APPLICATION_NAME_KEY, "billing-api")
				.with(REDIRECT_URIS_KEY, r#"["https://b.example.com/cb","https://a.example.com"]"#),
		);
		let settings = ProvisionSettings::resolve(&ctx).expect("Settings should resolve.");

		assert_eq!(settings.application_name, "billing-api");
		assert_eq!(
			settings.redirect_uris,
			vec!["https://b.example.com/cb".to_owned(), "https://a.example.com".to_owned()]
		);
	}

	#[test]
	fn settings_reject_malformed_redirect_uris() {
		for raw in ["https://not-an-array", r#"["relative/path"]"#, r#"[42]"#] {
			let ctx = context(MemoryConfig::default().with(REDIRECT_URIS_KEY, raw));
			let err = ProvisionSettings::resolve(&ctx)
				.expect_err("Malformed redirect URIs should be rejected.");

			assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == REDIRECT_URIS_KEY));
		}
	}

	#[test]
	fn layered_config_prefers_earlier_layers() {
		let layered = LayeredConfig::default()
			.with_layer(MemoryConfig::default().with(TENANT_ID_KEY, "from-file"))
			.with_layer(
				MemoryConfig::default()
					.with(TENANT_ID_KEY, "from-env")
					.with(CLIENT_ID_KEY, "client-from-env"),
			);

		assert_eq!(layered.get(TENANT_ID_KEY).as_deref(), Some("from-file"));
		assert_eq!(layered.get(CLIENT_ID_KEY).as_deref(), Some("client-from-env"));
		assert_eq!(layered.get(CLIENT_SECRET_KEY), None);
	}
}
