//! Provision an Entra ID application registration in one fixed pass: resolve credentials,
//! locate the application, mint a client secret, and pin its redirect URIs, with explicit
//! plan/apply semantics and typed run outputs.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod flows;
#[cfg(feature = "reqwest")] pub mod graph;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{CLIENT_ID_KEY, CLIENT_SECRET_KEY, CloudEndpoints, MemoryConfig, TENANT_ID_KEY},
		graph::GraphClientFactory,
		http::ReqwestHttpClient,
	};

	/// Tenant identifier seeded by [`test_config`].
	pub const TEST_TENANT_ID: &str = "tenant-under-test";
	/// Client identifier seeded by [`test_config`].
	pub const TEST_CLIENT_ID: &str = "deployer-client";
	/// Client secret seeded by [`test_config`].
	pub const TEST_CLIENT_SECRET: &str = "deployer-secret";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns an in-memory configuration holding the three deployer credentials.
	pub fn test_config() -> MemoryConfig {
		MemoryConfig::default()
			.with(TENANT_ID_KEY, TEST_TENANT_ID)
			.with(CLIENT_ID_KEY, TEST_CLIENT_ID)
			.with(CLIENT_SECRET_KEY, TEST_CLIENT_SECRET)
	}

	/// Constructs a [`GraphClientFactory`] whose login authority and Graph endpoint both point
	/// at the provided mock server base URL.
	pub fn build_test_factory(base_url: &str) -> GraphClientFactory {
		let base = Url::parse(base_url).expect("Failed to parse mock server base URL.");
		let endpoints = CloudEndpoints::custom(base.clone(), base);

		GraphClientFactory::new(test_reqwest_http_client(), endpoints)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")] use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
