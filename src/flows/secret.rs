//! Secret issuer step.

// self
use crate::{
	_prelude::*,
	api::{Application, IdentityApi},
	context::{RunContext, SECRET_OUTPUT},
	error::MissingFieldError,
};

/// Mints a new password credential labelled `label` and exports its plaintext as `secret`.
///
/// Each call creates a distinct credential; nothing is retried.
pub async fn issue_secret<A>(
	ctx: &mut RunContext,
	api: &A,
	application: &Application,
	label: &str,
) -> Result<()>
where
	A: ?Sized + IdentityApi,
{
	let credential = api
		.add_password(&application.object_id, label)
		.await
		.map_err(|source| Error::SecretIssuance { source })?;

	#[cfg(feature = "tracing")]
	tracing::info!(
		key_id = credential.key_id.as_deref().unwrap_or("unknown"),
		end_date_time = ?credential.end_date_time,
		"issued client secret"
	);

	let secret =
		credential.secret_text.ok_or(MissingFieldError::new("passwordCredential", "secretText"))?;

	ctx.export(SECRET_OUTPUT, secret);

	Ok(())
}
