// crates.io
use httpmock::prelude::*;
// self
use app_provisioner::{
	_preludet::*,
	api::{ApplicationDirectory, IdentityApi, IdentityClientFactory},
	auth::{ApplicationId, Credentials, ObjectId},
	error::{AuthError, GraphError, LookupError},
	graph::GraphClient,
};

const ACCESS_TOKEN: &str = "graph-access-token";

fn credentials() -> Credentials {
	Credentials::new(TEST_TENANT_ID, TEST_CLIENT_ID, TEST_CLIENT_SECRET)
}

async fn connect(server: &MockServer) -> GraphClient {
	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/{TEST_TENANT_ID}/oauth2/v2.0/token"));
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"Bearer\",\"expires_in\":3599}}"
			));
		})
		.await;

	build_test_factory(&server.base_url())
		.connect(&credentials())
		.await
		.expect("Token exchange against the mock authority should succeed.")
}

#[tokio::test]
async fn token_request_targets_tenant_and_graph_default_scope() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(format!("/{TEST_TENANT_ID}/oauth2/v2.0/token"))
				.header("content-type", "application/x-www-form-urlencoded")
				.body_includes("grant_type=client_credentials")
				.body_includes(format!("client_secret={TEST_CLIENT_SECRET}"))
				.body_includes("scope=");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"bearer\",\"expires_in\":3599}}"
			));
		})
		.await;

	build_test_factory(&server.base_url())
		.connect(&credentials())
		.await
		.expect("Token exchange should succeed.");

	token.assert_async().await;
}

#[tokio::test]
async fn rejected_client_secret_surfaces_provider_reason() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/{TEST_TENANT_ID}/oauth2/v2.0/token"));
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"AADSTS7000215: Invalid client secret provided.\"}",
			);
		})
		.await;
	let err = build_test_factory(&server.base_url())
		.connect(&credentials())
		.await
		.expect_err("Rejected credentials must fail client construction.");

	token.assert_async().await;

	match err {
		AuthError::Rejected { reason, status } => {
			assert_eq!(status, Some(401));
			assert!(reason.contains("invalid_client"));
			assert!(reason.contains("AADSTS7000215"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn malformed_tenant_is_rejected_without_contacting_authority() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST);
			then.status(500);
		})
		.await;
	let err = build_test_factory(&server.base_url())
		.connect(&Credentials::new("   ", TEST_CLIENT_ID, TEST_CLIENT_SECRET))
		.await
		.expect_err("Blank tenant must be rejected.");

	assert!(matches!(err, AuthError::InvalidCredential { field: "tenantId", .. }));
	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn display_name_quotes_are_escaped_in_filter() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/applications")
				.query_param("$filter", "displayName eq 'O''Brien''s app'")
				.query_param("$select", "id,appId,displayName");
			then.status(200).header("content-type", "application/json").body(
				"{\"value\":[{\"id\":\"obj-7\",\"appId\":\"app-7\",\"displayName\":\"O'Brien's app\"}]}",
			);
		})
		.await;
	let application = client
		.lookup_application("O'Brien's app")
		.await
		.expect("Escaped lookup should match exactly one application.");

	lookup.assert_async().await;

	assert_eq!(application.application_id.as_ref(), "app-7");
	assert_eq!(application.object_id.as_ref(), "obj-7");
}

#[tokio::test]
async fn duplicate_display_names_are_ambiguous() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/applications");
			then.status(200).header("content-type", "application/json").body(
				"{\"value\":[{\"id\":\"obj-1\",\"appId\":\"app-1\",\"displayName\":\"demo\"},{\"id\":\"obj-2\",\"appId\":\"app-2\",\"displayName\":\"demo\"}]}",
			);
		})
		.await;

	let err = client.lookup_application("demo").await.expect_err("Two matches are ambiguous.");

	assert!(matches!(err, LookupError::Ambiguous { entity: "application", count: 2, .. }));
}

#[tokio::test]
async fn lookup_reports_missing_app_id() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/applications");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":[{\"id\":\"obj-1\",\"displayName\":\"demo\"}]}");
		})
		.await;

	let err = client.lookup_application("demo").await.expect_err("appId is absent.");

	assert!(matches!(err, LookupError::Incomplete(missing) if missing.field == "appId"));
}

#[tokio::test]
async fn throttled_add_password_keeps_retry_after() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/applications/obj-1/addPassword");
			then.status(429)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body("{\"error\":{\"code\":\"TooManyRequests\",\"message\":\"Too many requests.\"}}");
		})
		.await;

	let object_id = ObjectId::new("obj-1").expect("Object identifier fixture should be valid.");
	let err = client
		.add_password(&object_id, "created by app-provisioner")
		.await
		.expect_err("Throttled request must fail.");

	match err {
		GraphError::Api { status, code, retry_after, .. } => {
			assert_eq!(status, 429);
			assert_eq!(code, "TooManyRequests");
			assert_eq!(retry_after, Some(Duration::seconds(30)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn add_password_tolerates_absent_secret_text() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/applications/obj-1/addPassword");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"keyId\":\"key-1\",\"displayName\":\"created by app-provisioner\"}");
		})
		.await;

	let object_id = ObjectId::new("obj-1").expect("Object identifier fixture should be valid.");
	let credential = client
		.add_password(&object_id, "created by app-provisioner")
		.await
		.expect("A response without secretText still decodes.");

	assert_eq!(credential.key_id.as_deref(), Some("key-1"));
	assert!(credential.secret_text.is_none());
}

#[tokio::test]
async fn undecodable_service_principal_response_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let client = connect(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/servicePrincipals");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":[{\"id\":\"sp-1\",\"appId\":\"app-1\",\"replyUrls\":\"https://not-a-list\"}]}");
		})
		.await;

	let application_id = ApplicationId::new("app-1")
		.expect("Application identifier fixture should be valid.");
	let err = client
		.lookup_service_principal(&application_id)
		.await
		.expect_err("replyUrls must be a list.");

	match err {
		LookupError::Graph(GraphError::Decode { source, status }) => {
			assert_eq!(status, 200);
			assert!(source.path().to_string().contains("replyUrls"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
