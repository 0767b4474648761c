//! Run-level error types shared across the config, auth, directory, and mutation steps.

// self
use crate::_prelude::*;

/// Provisioner-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical run error; every variant aborts the run.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Required configuration is missing or malformed.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The client-secret credential or the Graph client could not be constructed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// The application could not be located.
	#[error(transparent)]
	Lookup(#[from] LookupError),
	/// Graph rejected or failed the `addPassword` request.
	#[error("Failed to issue a client secret: {source}")]
	SecretIssuance {
		/// Underlying Graph failure.
		#[source]
		source: GraphError,
	},
	/// Redirect URI patch or its verification read failed.
	#[error(transparent)]
	RedirectUpdate(#[from] RedirectUpdateError),
	/// A response omitted a field the run depends on.
	#[error(transparent)]
	MissingField(#[from] MissingFieldError),
}

/// Configuration failures raised before any network call is attempted.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required key is absent from every configured store.
	#[error("Missing required configuration value `{key}`.")]
	MissingKey {
		/// Fully qualified configuration key (e.g. `azure-native:tenantId`).
		key: String,
	},
	/// A key is present but its value cannot be used.
	#[error("Configuration value `{key}` is invalid: {reason}.")]
	InvalidValue {
		/// Fully qualified configuration key.
		key: String,
		/// Human-readable reason.
		reason: String,
	},
	/// A configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	Read {
		/// Path of the file.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// A configuration file is not a JSON object of keys to values.
	#[error("Failed to parse configuration file {path}.")]
	Parse {
		/// Path of the file.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Shorthand for [`ConfigError::MissingKey`].
	pub fn missing(key: impl Into<String>) -> Self {
		Self::MissingKey { key: key.into() }
	}

	/// Shorthand for [`ConfigError::InvalidValue`].
	pub fn invalid(key: impl Into<String>, reason: impl Display) -> Self {
		Self::InvalidValue { key: key.into(), reason: reason.to_string() }
	}
}

/// Credential and client construction failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// A credential input was rejected before contacting the authority.
	#[error("Credential input `{field}` is invalid: {reason}.")]
	InvalidCredential {
		/// Credential field name.
		field: &'static str,
		/// Validation failure.
		reason: String,
	},
	/// Authority or Graph endpoint could not be derived.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The token endpoint rejected the client credentials.
	#[error("Token endpoint rejected the client credentials: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// The token endpoint answered with something other than a token response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Network failure while fetching the initial token.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl AuthError {
	/// Wraps a transport's builder failure inside [`AuthError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Directory lookup failures for applications and service principals.
#[derive(Debug, ThisError)]
pub enum LookupError {
	/// No entity matched the query.
	#[error("No {entity} found where {query}.")]
	NotFound {
		/// Entity kind (`application`, `service principal`).
		entity: &'static str,
		/// Filter that was applied.
		query: String,
	},
	/// More than one entity matched a query that must be unique.
	#[error("Found {count} {entity} entries where {query}; expected exactly one.")]
	Ambiguous {
		/// Entity kind.
		entity: &'static str,
		/// Filter that was applied.
		query: String,
		/// Number of matches.
		count: usize,
	},
	/// The matched entity lacks a required field.
	#[error(transparent)]
	Incomplete(#[from] MissingFieldError),
	/// The matched entity carries an identifier that cannot be used in later requests.
	#[error("Directory returned an unusable identifier: {0}")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// The directory call itself failed.
	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// Redirect URI update failures.
#[derive(Debug, ThisError)]
pub enum RedirectUpdateError {
	/// Graph rejected or failed the application patch.
	#[error("Failed to patch redirect URIs: {0}")]
	Patch(#[source] GraphError),
	/// The service principal could not be re-read after the patch.
	#[error("Failed to verify redirect URIs on the service principal: {0}")]
	Verify(#[source] LookupError),
}

/// A response omitted a field that the run must read.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("The {entity} response is missing the `{field}` field.")]
pub struct MissingFieldError {
	/// Entity kind carrying the field.
	pub entity: &'static str,
	/// Wire name of the absent field.
	pub field: &'static str,
}
impl MissingFieldError {
	/// Creates a new error for `entity.field`.
	pub const fn new(entity: &'static str, field: &'static str) -> Self {
		Self { entity, field }
	}
}

/// Microsoft Graph call failures.
#[derive(Debug, ThisError)]
pub enum GraphError {
	/// Graph answered with a non-success status.
	#[error("Graph returned {status} {code}: {message}")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Graph error code (e.g. `Authorization_RequestDenied`).
		code: String,
		/// Graph error message.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Graph answered with a body that does not match the expected shape.
	#[error("Graph returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// A request body could not be serialized.
	#[error("Graph request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// A request URL could not be assembled.
	#[error("Graph request URL is invalid.")]
	InvalidUrl(#[source] url::ParseError),
	/// Network failure while calling Graph.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for GraphError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport(e.into())
	}
}
