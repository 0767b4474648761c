//! National cloud selection and the endpoints each cloud exposes.

// self
use crate::{
	_prelude::*,
	config::{ConfigStore, ENVIRONMENT_KEY},
	error::ConfigError,
};

/// Microsoft cloud the run targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudEnvironment {
	/// Global Azure.
	#[default]
	Public,
	/// Azure US Government.
	UsGovernment,
	/// Azure China (21Vianet).
	China,
}
impl CloudEnvironment {
	/// Reads `azure-native:environment` from `store`, defaulting to [`CloudEnvironment::Public`].
	pub fn from_config(store: &dyn ConfigStore) -> Result<Self, ConfigError> {
		store.get(ENVIRONMENT_KEY).map_or(Ok(Self::default()), |raw| raw.parse())
	}

	/// Returns a stable label matching the configuration value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Public => "public",
			Self::UsGovernment => "usgovernment",
			Self::China => "china",
		}
	}

	/// Login authority that issues tokens for this cloud.
	pub const fn authority(self) -> &'static str {
		match self {
			Self::Public => "https://login.microsoftonline.com",
			Self::UsGovernment => "https://login.microsoftonline.us",
			Self::China => "https://login.chinacloudapi.cn",
		}
	}

	/// Microsoft Graph root for this cloud.
	pub const fn graph(self) -> &'static str {
		match self {
			Self::Public => "https://graph.microsoft.com",
			Self::UsGovernment => "https://graph.microsoft.us",
			Self::China => "https://microsoftgraph.chinacloudapi.cn",
		}
	}

	/// Resolves the endpoint pair for this cloud.
	pub fn endpoints(self) -> Result<CloudEndpoints, url::ParseError> {
		Ok(CloudEndpoints {
			authority: Url::parse(self.authority())?,
			graph: Url::parse(self.graph())?,
		})
	}
}
impl Display for CloudEnvironment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for CloudEnvironment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"public" | "azurecloud" => Ok(Self::Public),
			"usgovernment" | "azureusgovernment" => Ok(Self::UsGovernment),
			"china" | "azurechinacloud" => Ok(Self::China),
			other => Err(ConfigError::invalid(
				ENVIRONMENT_KEY,
				format_args!("unknown cloud `{other}`, expected public, usgovernment, or china"),
			)),
		}
	}
}

/// Login authority and Graph root used by a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudEndpoints {
	/// Token authority root; the tenant segment is appended per request.
	pub authority: Url,
	/// Microsoft Graph root; `v1.0/` is appended per request.
	pub graph: Url,
}
impl CloudEndpoints {
	/// Uses explicit roots, e.g. a sovereign proxy or a local mock server.
	pub fn custom(authority: Url, graph: Url) -> Self {
		Self { authority, graph }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_portal_and_short_names() {
		assert_eq!("public".parse::<CloudEnvironment>().ok(), Some(CloudEnvironment::Public));
		assert_eq!(
			"AzureUSGovernment".parse::<CloudEnvironment>().ok(),
			Some(CloudEnvironment::UsGovernment)
		);
		assert_eq!(" china ".parse::<CloudEnvironment>().ok(), Some(CloudEnvironment::China));
		assert!("mars".parse::<CloudEnvironment>().is_err());
	}

	#[test]
	fn reads_environment_from_config() {
		let store = crate::config::MemoryConfig::default().with(ENVIRONMENT_KEY, "usgovernment");

		assert_eq!(CloudEnvironment::from_config(&store).ok(), Some(CloudEnvironment::UsGovernment));
		assert_eq!(
			CloudEnvironment::from_config(&crate::config::MemoryConfig::default()).ok(),
			Some(CloudEnvironment::Public)
		);
	}

	#[test]
	fn endpoints_match_cloud() {
		let endpoints =
			CloudEnvironment::China.endpoints().expect("Built-in cloud roots should parse.");

		assert_eq!(endpoints.authority.as_str(), "https://login.chinacloudapi.cn/");
		assert_eq!(endpoints.graph.as_str(), "https://microsoftgraph.chinacloudapi.cn/");
	}
}
