//! Redirect URI updater step.

// self
use crate::{
	_prelude::*,
	api::{Application, ApplicationDirectory, ApplicationPatch, IdentityApi},
	context::{REDIRECT_URIS_OUTPUT, RunContext},
	error::RedirectUpdateError,
};

/// Replaces the application's web redirect URIs, then exports what the service principal
/// reports afterwards.
///
/// The exported list is the observed one, not the requested one.
pub async fn update_redirect_uris<C>(
	ctx: &mut RunContext,
	client: &C,
	application: &Application,
	redirect_uris: &[String],
) -> Result<()>
where
	C: ?Sized + ApplicationDirectory + IdentityApi,
{
	let patch = ApplicationPatch::redirect_uris(redirect_uris.to_vec());

	client
		.patch_application(&application.application_id, &patch)
		.await
		.map_err(RedirectUpdateError::Patch)?;

	let service_principal = client
		.lookup_service_principal(&application.application_id)
		.await
		.map_err(RedirectUpdateError::Verify)?;

	#[cfg(feature = "tracing")]
	{
		if service_principal.redirect_uris != redirect_uris {
			tracing::warn!(
				requested = ?redirect_uris,
				observed = ?service_principal.redirect_uris,
				"service principal does not reflect the patched redirect URIs yet"
			);
		}
	}

	ctx.export(REDIRECT_URIS_OUTPUT, service_principal.redirect_uris);

	Ok(())
}
