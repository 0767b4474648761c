//! The provisioning pipeline: resolve, connect, locate, then (apply only) issue and patch.
//!
//! [`Provisioner::run`] executes the steps strictly in order against any
//! [`IdentityClientFactory`]. The first failing step ends the run; outputs exported by earlier
//! steps stay on the [`RunContext`].

mod locate;
mod redirect;
mod secret;

pub use locate::*;
pub use redirect::*;
pub use secret::*;

// self
use crate::{
	_prelude::*,
	api::IdentityClientFactory,
	config::{self, ProvisionSettings},
	context::{RunContext, RunMode},
	obs::{self, StepKind, StepOutcome, StepSpan},
};
#[cfg(feature = "reqwest")] use crate::graph::GraphClientFactory;

#[cfg(feature = "reqwest")]
/// Provisioner backed by the Microsoft Graph client.
pub type GraphProvisioner = Provisioner<GraphClientFactory>;

/// Runs the fixed provisioning sequence for one application per call.
#[derive(Clone, Debug)]
pub struct Provisioner<F>
where
	F: IdentityClientFactory,
{
	factory: F,
}
impl<F> Provisioner<F>
where
	F: IdentityClientFactory,
{
	/// Creates a provisioner that authenticates through `factory` on every run.
	pub fn new(factory: F) -> Self {
		Self { factory }
	}

	/// Factory used to build the per-run client.
	pub fn factory(&self) -> &F {
		&self.factory
	}

	/// Executes one run in `mode`, exporting outputs into `ctx` as steps complete.
	///
	/// [`RunMode::Plan`] stops after the application lookup; [`RunMode::Apply`] continues with
	/// secret issuance followed by the redirect URI update. Nothing is retried.
	pub async fn run(&self, ctx: &mut RunContext, mode: RunMode) -> Result<()> {
		let view: &RunContext = ctx;
		let (credentials, settings) = observe(StepKind::ResolveConfig, mode, async {
			let credentials = config::resolve_credentials(view)?;
			let settings = ProvisionSettings::resolve(view)?;

			Ok((credentials, settings))
		})
		.await?;
		let client = observe(StepKind::Connect, mode, async {
			self.factory.connect(&credentials).await.map_err(Error::from)
		})
		.await?;
		let application = observe(
			StepKind::LocateApplication,
			mode,
			locate_application(ctx, &client, &settings.application_name),
		)
		.await?;

		if mode.is_dry_run() {
			#[cfg(feature = "tracing")]
			tracing::info!(application = %application.display_name, "plan complete without mutations");

			return Ok(());
		}

		observe(
			StepKind::IssueSecret,
			mode,
			issue_secret(ctx, &client, &application, &settings.secret_label),
		)
		.await?;
		observe(
			StepKind::UpdateRedirectUris,
			mode,
			update_redirect_uris(ctx, &client, &application, &settings.redirect_uris),
		)
		.await
	}
}

async fn observe<T, Fut>(kind: StepKind, mode: RunMode, step: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = StepSpan::new(kind, mode);

	obs::record_step_outcome(kind, StepOutcome::Attempt);

	let result = span.instrument(step).await;

	match &result {
		Ok(_) => obs::record_step_outcome(kind, StepOutcome::Success),
		Err(err) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(step = %kind, mode = %mode, error = %err, "step failed");
			#[cfg(not(feature = "tracing"))]
			let _ = err;

			obs::record_step_outcome(kind, StepOutcome::Failure);
		},
	}

	result
}
