//! Application locator step.

// self
use crate::{
	_prelude::*,
	api::{Application, ApplicationDirectory},
	context::{APPLICATION_ID_OUTPUT, APPLICATION_OBJECT_ID_OUTPUT, RunContext},
};

/// Looks up the application named `display_name` and exports its identifiers.
///
/// Runs in both modes; the exports happen before any mutation is attempted.
pub async fn locate_application<D>(
	ctx: &mut RunContext,
	directory: &D,
	display_name: &str,
) -> Result<Application>
where
	D: ?Sized + ApplicationDirectory,
{
	let application = directory.lookup_application(display_name).await?;

	#[cfg(feature = "tracing")]
	tracing::info!(
		application_id = %application.application_id,
		object_id = %application.object_id,
		"located application"
	);

	ctx.export(APPLICATION_ID_OUTPUT, application.application_id.to_string());
	ctx.export(APPLICATION_OBJECT_ID_OUTPUT, application.object_id.to_string());

	Ok(application)
}
