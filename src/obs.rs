//! Optional observability helpers for pipeline steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `app_provisioner.step` with the `step` and
//!   `mode` fields.
//! - Enable `metrics` to increment the `app_provisioner_step_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline steps observed by the provisioner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
	/// Reading credentials and settings.
	ResolveConfig,
	/// Building the credential and the identity client.
	Connect,
	/// Looking up the application registration.
	LocateApplication,
	/// Issuing a client secret.
	IssueSecret,
	/// Patching and verifying redirect URIs.
	UpdateRedirectUris,
}
impl StepKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepKind::ResolveConfig => "resolve_config",
			StepKind::Connect => "connect",
			StepKind::LocateApplication => "locate_application",
			StepKind::IssueSecret => "issue_secret",
			StepKind::UpdateRedirectUris => "update_redirect_uris",
		}
	}
}
impl Display for StepKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure that aborts the run.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
