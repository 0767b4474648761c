// self
use crate::{_prelude::*, context::RunMode, obs::StepKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStep<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStep<F> = F;

/// Span wrapper used around every pipeline step.
#[derive(Clone, Debug)]
pub struct StepSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StepSpan {
	/// Creates a new span tagged with the step and the run mode.
	pub fn new(kind: StepKind, mode: RunMode) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("app_provisioner.step", step = kind.as_str(), mode = mode.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, mode);

			Self {}
		}
	}

	/// Instruments an async step without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStep<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = StepSpan::new(StepKind::LocateApplication, RunMode::Plan);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
