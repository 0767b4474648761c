//! Microsoft Graph client implementing both the directory read path and the identity write
//! path, plus the factory that authenticates it.

pub mod models;

// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
	redirect::Policy,
};
// self
use crate::{
	_prelude::*,
	api::{
		ApiFuture, Application, ApplicationDirectory, ApplicationPatch, IdentityApi,
		IdentityClientFactory, PasswordCredential, ServicePrincipal,
	},
	auth::{ApplicationId, Credentials, ObjectId},
	config::{CloudEndpoints, CloudEnvironment},
	error::{AuthError, GraphError, LookupError},
	http::{BufferedResponse, ReqwestHttpClient},
	oauth::{AccessToken, ClientSecretCredential},
};
use models::{
	AddPasswordRequest, ApplicationResource, Collection, PasswordCredentialRequest,
	PasswordCredentialResource, ServicePrincipalResource,
};

const API_VERSION: &str = "v1.0/";
const JSON: &str = "application/json";

/// Builds a [`GraphClient`] per run by exchanging the deployer's client secret for a token.
#[derive(Clone)]
pub struct GraphClientFactory {
	http_client: ReqwestHttpClient,
	endpoints: CloudEndpoints,
}
impl GraphClientFactory {
	/// Uses the provided transport and endpoints.
	pub fn new(http_client: ReqwestHttpClient, endpoints: CloudEndpoints) -> Self {
		Self { http_client, endpoints }
	}

	/// Targets `cloud` with a transport that never follows redirects.
	pub fn for_cloud(cloud: CloudEnvironment) -> Result<Self, AuthError> {
		let endpoints =
			cloud.endpoints().map_err(|source| AuthError::InvalidEndpoint { source })?;
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.build()
			.map_err(AuthError::http_client_build)?;

		Ok(Self::new(ReqwestHttpClient::with_client(client), endpoints))
	}

	/// Endpoints this factory authenticates against.
	pub fn endpoints(&self) -> &CloudEndpoints {
		&self.endpoints
	}
}
impl IdentityClientFactory for GraphClientFactory {
	type Client = GraphClient;

	fn connect<'a>(
		&'a self,
		credentials: &'a Credentials,
	) -> ApiFuture<'a, Self::Client, AuthError> {
		Box::pin(async move {
			let credential = ClientSecretCredential::new(credentials, &self.endpoints)?;
			let base = self
				.endpoints
				.graph
				.join(API_VERSION)
				.map_err(|source| AuthError::InvalidEndpoint { source })?;
			let token = credential.fetch_token(&self.http_client).await?;

			#[cfg(feature = "tracing")]
			tracing::debug!(
				tenant = %credential.tenant_id(),
				client = %credential.client_id(),
				expires_in = ?token.expires_in,
				"acquired graph token"
			);

			Ok(GraphClient { http_client: self.http_client.clone(), base, token })
		})
	}
}
impl Debug for GraphClientFactory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphClientFactory").field("endpoints", &self.endpoints).finish()
	}
}

/// Authenticated Microsoft Graph client scoped to one run.
pub struct GraphClient {
	http_client: ReqwestHttpClient,
	base: Url,
	token: AccessToken,
}
impl GraphClient {
	fn url(&self, path: &str) -> Result<Url, GraphError> {
		self.base.join(path).map_err(GraphError::InvalidUrl)
	}

	async fn send(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<BufferedResponse, GraphError> {
		#[cfg(feature = "tracing")]
		tracing::debug!(%method, %url, "calling graph");

		let mut request = self
			.http_client
			.request(method, url)
			.bearer_auth(self.token.secret.expose())
			.header(ACCEPT, JSON);

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, JSON).body(body);
		}

		let response = self.http_client.execute(request).await?;

		if response.is_success() { Ok(response) } else { Err(models::api_error(&response)) }
	}

	async fn list<T>(&self, path: &str, filter: &str, select: &str) -> Result<Vec<T>, GraphError>
	where
		T: serde::de::DeserializeOwned,
	{
		let mut url = self.url(path)?;

		url.query_pairs_mut().append_pair("$filter", filter).append_pair("$select", select);

		let response = self.send(Method::GET, url, None).await?;
		let collection: Collection<T> = models::decode(&response)?;

		Ok(collection.value)
	}
}
impl ApplicationDirectory for GraphClient {
	fn lookup_application<'a>(
		&'a self,
		display_name: &'a str,
	) -> ApiFuture<'a, Application, LookupError> {
		Box::pin(async move {
			let filter = format!("displayName eq '{}'", odata_literal(display_name));
			let matches: Vec<ApplicationResource> =
				self.list("applications", &filter, "id,appId,displayName").await?;
			let resource = exactly_one("application", filter, matches)?;

			Application::try_from(resource)
		})
	}

	fn lookup_service_principal<'a>(
		&'a self,
		application_id: &'a ApplicationId,
	) -> ApiFuture<'a, ServicePrincipal, LookupError> {
		Box::pin(async move {
			let filter = format!("appId eq '{}'", odata_literal(application_id));
			let matches: Vec<ServicePrincipalResource> =
				self.list("servicePrincipals", &filter, "id,appId,replyUrls").await?;
			let resource = exactly_one("service principal", filter, matches)?;

			ServicePrincipal::try_from(resource)
		})
	}
}
impl IdentityApi for GraphClient {
	fn add_password<'a>(
		&'a self,
		object_id: &'a ObjectId,
		display_label: &'a str,
	) -> ApiFuture<'a, PasswordCredential, GraphError> {
		Box::pin(async move {
			let url = self.url(&format!("applications/{object_id}/addPassword"))?;
			let body = serde_json::to_vec(&AddPasswordRequest {
				password_credential: PasswordCredentialRequest { display_name: display_label },
			})
			.map_err(GraphError::Encode)?;
			let response = self.send(Method::POST, url, Some(body)).await?;
			let resource: PasswordCredentialResource = models::decode(&response)?;

			Ok(resource.into())
		})
	}

	fn patch_application<'a>(
		&'a self,
		application_id: &'a ApplicationId,
		patch: &'a ApplicationPatch,
	) -> ApiFuture<'a, (), GraphError> {
		Box::pin(async move {
			let url = self.url(&format!("applications(appId='{application_id}')"))?;
			let body = serde_json::to_vec(patch).map_err(GraphError::Encode)?;

			self.send(Method::PATCH, url, Some(body)).await?;

			Ok(())
		})
	}
}
impl Debug for GraphClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphClient").field("base", &self.base.as_str()).finish_non_exhaustive()
	}
}

/// Escapes a value for use inside a single-quoted OData string literal.
fn odata_literal(value: &str) -> String {
	value.replace('\'', "''")
}

fn exactly_one<T>(
	entity: &'static str,
	query: String,
	mut matches: Vec<T>,
) -> Result<T, LookupError> {
	match matches.len() {
		0 => Err(LookupError::NotFound { entity, query }),
		1 => Ok(matches.remove(0)),
		count => Err(LookupError::Ambiguous { entity, query, count }),
	}
}
