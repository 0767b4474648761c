//! Microsoft Graph wire shapes and their conversion into directory types.
//!
//! Every field is optional on the wire; conversions name the first absent field instead of
//! assuming presence.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{Application, PasswordCredential, ServicePrincipal},
	auth::{ApplicationId, ObjectId, Secret},
	error::{GraphError, LookupError, MissingFieldError},
	http::BufferedResponse,
};

/// OData collection envelope (`{"value": [...]}`).
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
	#[serde(default = "Vec::new")]
	pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplicationResource {
	pub id: Option<String>,
	pub app_id: Option<String>,
	pub display_name: Option<String>,
}
impl TryFrom<ApplicationResource> for Application {
	type Error = LookupError;

	fn try_from(resource: ApplicationResource) -> Result<Self, Self::Error> {
		const ENTITY: &str = "application";

		let object_id = resource.id.ok_or(MissingFieldError::new(ENTITY, "id"))?;
		let application_id = resource.app_id.ok_or(MissingFieldError::new(ENTITY, "appId"))?;
		let display_name =
			resource.display_name.ok_or(MissingFieldError::new(ENTITY, "displayName"))?;

		Ok(Self {
			application_id: ApplicationId::new(application_id)?,
			object_id: ObjectId::new(object_id)?,
			display_name,
		})
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServicePrincipalResource {
	pub id: Option<String>,
	pub app_id: Option<String>,
	#[serde(default)]
	pub reply_urls: Option<Vec<String>>,
}
impl TryFrom<ServicePrincipalResource> for ServicePrincipal {
	type Error = LookupError;

	fn try_from(resource: ServicePrincipalResource) -> Result<Self, Self::Error> {
		const ENTITY: &str = "service principal";

		let object_id = resource.id.ok_or(MissingFieldError::new(ENTITY, "id"))?;
		let application_id = resource.app_id.ok_or(MissingFieldError::new(ENTITY, "appId"))?;

		Ok(Self {
			object_id: ObjectId::new(object_id)?,
			application_id: ApplicationId::new(application_id)?,
			redirect_uris: resource.reply_urls.unwrap_or_default(),
		})
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddPasswordRequest<'a> {
	pub password_credential: PasswordCredentialRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordCredentialRequest<'a> {
	pub display_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordCredentialResource {
	pub key_id: Option<String>,
	pub display_name: Option<String>,
	pub secret_text: Option<String>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub end_date_time: Option<OffsetDateTime>,
}
impl From<PasswordCredentialResource> for PasswordCredential {
	fn from(resource: PasswordCredentialResource) -> Self {
		Self {
			key_id: resource.key_id,
			display_name: resource.display_name,
			secret_text: resource.secret_text.map(Secret::new),
			end_date_time: resource.end_date_time,
		}
	}
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
	error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	code: Option<String>,
	message: Option<String>,
}

const BODY_PREVIEW_LIMIT: usize = 256;

/// Decodes a successful response body into `T`.
pub(crate) fn decode<T>(response: &BufferedResponse) -> Result<T, GraphError>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(de)
		.map_err(|source| GraphError::Decode { source, status: response.status })
}

/// Converts a non-success response into [`GraphError::Api`], preferring Graph's error
/// envelope and falling back to a body preview.
pub(crate) fn api_error(response: &BufferedResponse) -> GraphError {
	let (code, message) = match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
		Ok(ErrorEnvelope { error }) => (
			error.code.unwrap_or_else(|| "unknown".into()),
			error.message.unwrap_or_default(),
		),
		Err(_) => ("unknown".into(), body_preview(&response.body)),
	};

	GraphError::Api { status: response.status, code, message, retry_after: response.retry_after }
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
