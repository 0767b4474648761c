//! `app-provisioner` command line: `preview` only reads, `up` applies the mutations.

// std
use std::{path::PathBuf, sync::Arc};
// crates.io
use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::EnvFilter;
// self
use app_provisioner::{
	config::{CloudEnvironment, EnvConfig, FileConfig, LayeredConfig},
	context::{Outputs, RunContext, RunMode},
	flows::GraphProvisioner,
	graph::GraphClientFactory,
};

#[derive(Debug, Parser)]
#[command(
	name = "app-provisioner",
	version,
	about = "Locate an Entra ID application, mint a client secret, and pin its redirect URIs."
)]
struct Cli {
	/// JSON configuration file; its keys take precedence over environment variables such as
	/// `AZURE_NATIVE_TENANT_ID` or `PROVISIONER_APPLICATION_NAME`.
	#[arg(short, long, env = "APP_PROVISIONER_CONFIG", global = true)]
	config: Option<PathBuf>,
	/// Print secret outputs in plaintext instead of `[secret]`.
	#[arg(long, global = true)]
	show_secrets: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
	/// Resolve configuration and locate the application without mutating anything.
	Preview,
	/// Issue a new client secret and replace the application's redirect URIs.
	Up,
}
impl Command {
	fn mode(self) -> RunMode {
		match self {
			Self::Preview => RunMode::Plan,
			Self::Up => RunMode::Apply,
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let mode = cli.command.mode();
	let mut config = LayeredConfig::default();

	if let Some(path) = &cli.config {
		config = config.with_layer(FileConfig::open(path.clone())?);
	}

	let config = config.with_layer(EnvConfig::capture());
	let cloud = CloudEnvironment::from_config(&config)?;
	let provisioner = GraphProvisioner::new(GraphClientFactory::for_cloud(cloud)?);
	let mut ctx = RunContext::new(Arc::new(config));

	tracing::info!(%mode, cloud = cloud.as_str(), "starting run");

	let result = provisioner.run(&mut ctx, mode).await;
	let outputs = ctx.finish();

	match result {
		Ok(()) => {
			println!("{}", render(&outputs, cli.show_secrets)?);

			Ok(())
		},
		Err(e) => {
			if !outputs.is_empty() {
				eprintln!("Outputs exported before the failure:\n{}", render(&outputs, false)?);
			}

			Err(e).wrap_err_with(|| format!("`{mode}` run failed"))
		},
	}
}

fn render(outputs: &Outputs, reveal_secrets: bool) -> Result<String> {
	Ok(serde_json::to_string_pretty(&outputs.to_json(reveal_secrets))?)
}
