//! Deployer credentials as resolved from configuration.

// self
use crate::{_prelude::*, auth::Secret};

/// Client-secret credentials of the principal that performs the provisioning.
///
/// Values are kept exactly as configured; validation happens when the credential is
/// constructed so malformed input surfaces as an authentication error.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Directory (tenant) identifier.
	pub tenant_id: String,
	/// Client identifier of the deploying application.
	pub client_id: String,
	/// Client secret of the deploying application.
	pub client_secret: Secret,
}
impl Credentials {
	/// Bundles the three credential parts.
	pub fn new(
		tenant_id: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			tenant_id: tenant_id.into(),
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
		}
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("tenant_id", &self.tenant_id)
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secret() {
		let creds = Credentials::new("tenant", "client", "hunter2");
		let rendered = format!("{creds:?}");

		assert!(rendered.contains("tenant"));
		assert!(!rendered.contains("hunter2"));
	}
}
