//! Client-secret credential for the Microsoft identity platform.
//!
//! The credential validates its inputs up front, then performs a single
//! `client_credentials` exchange against `{authority}/{tenant}/oauth2/v2.0/token` for the
//! Graph `.default` scope. Every failure, local or remote, is an [`AuthError`].

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId as OAuthClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, Credentials, Secret, TenantId},
	config::CloudEndpoints,
	error::{AuthError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Bearer token issued for Graph.
#[derive(Clone, Debug)]
pub struct AccessToken {
	/// Token value, redacted in logs.
	pub secret: Secret,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Lifetime announced by the authority, when present.
	pub expires_in: Option<Duration>,
}

/// Credential that authenticates a confidential client with its secret.
pub struct ClientSecretCredential {
	tenant_id: TenantId,
	client_id: ClientId,
	scope: String,
	oauth_client: ConfiguredBasicClient,
}
impl ClientSecretCredential {
	/// Validates `credentials` and prepares the token request for `endpoints`.
	pub fn new(credentials: &Credentials, endpoints: &CloudEndpoints) -> Result<Self, AuthError> {
		let tenant_id = TenantId::new(&credentials.tenant_id).map_err(|e| {
			AuthError::InvalidCredential { field: "tenantId", reason: e.to_string() }
		})?;
		let client_id = ClientId::new(&credentials.client_id).map_err(|e| {
			AuthError::InvalidCredential { field: "clientId", reason: e.to_string() }
		})?;

		if credentials.client_secret.expose().trim().is_empty() {
			return Err(AuthError::InvalidCredential {
				field: "clientSecret",
				reason: "client secret cannot be blank".into(),
			});
		}

		let token_url = endpoints
			.authority
			.join(&format!("{tenant_id}/oauth2/v2.0/token"))
			.map_err(|source| AuthError::InvalidEndpoint { source })?;
		let token_url = TokenUrl::from_url(token_url);
		let scope = endpoints
			.graph
			.join(".default")
			.map_err(|source| AuthError::InvalidEndpoint { source })?
			.to_string();
		let oauth_client = BasicClient::new(OAuthClientId::new(client_id.to_string()))
			.set_client_secret(ClientSecret::new(credentials.client_secret.expose().to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { tenant_id, client_id, scope, oauth_client })
	}

	/// Tenant the credential authenticates against.
	pub fn tenant_id(&self) -> &TenantId {
		&self.tenant_id
	}

	/// Client identifier presented to the authority.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Scope requested for every token (`{graph}/.default`).
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Performs the `client_credentials` exchange.
	pub async fn fetch_token<C>(&self, http_client: &C) -> Result<AccessToken, AuthError>
	where
		C: ?Sized + TokenHttpClient,
	{
		let meta = ResponseMetadataSlot::default();
		let handle = http_client.with_metadata(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.add_scope(Scope::new(self.scope.clone()))
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		Ok(AccessToken {
			secret: Secret::new(response.access_token().secret().to_owned()),
			issued_at: OffsetDateTime::now_utc(),
			expires_in: response
				.expires_in()
				.and_then(|lifetime| Duration::try_from(lifetime).ok()),
		})
	}
}
impl Debug for ClientSecretCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientSecretCredential")
			.field("tenant_id", &self.tenant_id)
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.finish_non_exhaustive()
	}
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> AuthError
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.as_ref().and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(source, _body) => AuthError::TokenResponseParse { source, status },
		RequestTokenError::Other(message) => AuthError::TokenEndpoint { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> AuthError {
	let code = response.error().as_ref().to_owned();
	let reason = match response.error_description() {
		Some(description) => format!("{code}: {description}"),
		None => code,
	};

	AuthError::Rejected { reason, status }
}

fn map_transport_error<E>(err: HttpClientError<E>, status: Option<u16>) -> AuthError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => AuthError::http_client_build(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => AuthError::TokenEndpoint { message, status },
		_ => AuthError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
		},
	}
}
