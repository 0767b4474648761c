//! Seams to the two external systems a run talks to.
//!
//! [`ApplicationDirectory`] is the read path (idempotent lookups), [`IdentityApi`] the write
//! path (non-idempotent mutations), and [`IdentityClientFactory`] builds an authenticated
//! client implementing both. The pipeline only depends on these traits, so it can run
//! against Microsoft Graph or against an in-process fake.

// self
use crate::{
	_prelude::*,
	auth::{ApplicationId, Credentials, ObjectId, Secret},
	error::{AuthError, GraphError, LookupError},
};

/// Boxed future returned by the directory and identity traits.
pub type ApiFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Application registration located in the directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
	/// Application (`appId`) identifier.
	pub application_id: ApplicationId,
	/// Directory object (`id`) identifier.
	pub object_id: ObjectId,
	/// Display name the lookup matched.
	pub display_name: String,
}

/// Service principal backing an application registration in the tenant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServicePrincipal {
	/// Directory object identifier of the service principal.
	pub object_id: ObjectId,
	/// Application (`appId`) identifier it instantiates.
	pub application_id: ApplicationId,
	/// Redirect URIs as observed on the service principal.
	pub redirect_uris: Vec<String>,
}

/// Password credential returned by `addPassword`.
///
/// `secret_text` is optional on the wire; callers must check it before use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordCredential {
	/// Credential key identifier.
	pub key_id: Option<String>,
	/// Display label stored with the credential.
	pub display_name: Option<String>,
	/// Plaintext secret, only ever returned by the issuing call.
	pub secret_text: Option<Secret>,
	/// Expiry instant.
	pub end_date_time: Option<OffsetDateTime>,
}

/// Partial application update limited to the web platform's redirect URIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApplicationPatch {
	/// Web platform settings.
	pub web: WebApplicationPatch,
}
impl ApplicationPatch {
	/// Replaces the web redirect URIs with `redirect_uris`.
	pub fn redirect_uris(redirect_uris: Vec<String>) -> Self {
		Self { web: WebApplicationPatch { redirect_uris } }
	}
}

/// Web platform portion of an [`ApplicationPatch`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApplicationPatch {
	/// Full replacement list of redirect URIs.
	pub redirect_uris: Vec<String>,
}

/// Read path: side-effect-free directory lookups.
pub trait ApplicationDirectory
where
	Self: Send + Sync,
{
	/// Finds the single application whose display name equals `display_name` exactly.
	fn lookup_application<'a>(
		&'a self,
		display_name: &'a str,
	) -> ApiFuture<'a, Application, LookupError>;

	/// Finds the single service principal instantiating `application_id`.
	fn lookup_service_principal<'a>(
		&'a self,
		application_id: &'a ApplicationId,
	) -> ApiFuture<'a, ServicePrincipal, LookupError>;
}

/// Write path: mutations without plan/preview support.
///
/// Neither call is idempotent; `add_password` mints a distinct credential on every call.
pub trait IdentityApi
where
	Self: Send + Sync,
{
	/// Adds a password credential labelled `display_label` to the application `object_id`.
	fn add_password<'a>(
		&'a self,
		object_id: &'a ObjectId,
		display_label: &'a str,
	) -> ApiFuture<'a, PasswordCredential, GraphError>;

	/// Applies `patch` to the application addressed by its `application_id`.
	fn patch_application<'a>(
		&'a self,
		application_id: &'a ApplicationId,
		patch: &'a ApplicationPatch,
	) -> ApiFuture<'a, (), GraphError>;
}

/// Builds an authenticated client for one run.
pub trait IdentityClientFactory
where
	Self: Send + Sync,
{
	/// Client implementing both the read and the write path.
	type Client: ApplicationDirectory + IdentityApi;

	/// Constructs the credential and the client; no caching across runs.
	fn connect<'a>(&'a self, credentials: &'a Credentials)
	-> ApiFuture<'a, Self::Client, AuthError>;
}
