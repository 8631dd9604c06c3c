pub mod routes;
pub mod state;

use std::{future, net::SocketAddr, path::PathBuf};

use clap::{
	Parser,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

#[derive(Debug, Parser)]
#[command(
	version = VERSION,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = lexgraph_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let state = AppState::new(config).await?;

	serve(state, http_addr, shutdown_signal()).await
}

/// Serves the API on `http_addr` until `shutdown` resolves. The state's pool is closed on every
/// exit path, including a failed bind.
pub async fn serve<F>(state: AppState, http_addr: SocketAddr, shutdown: F) -> color_eyre::Result<()>
where
	F: Future<Output = ()> + Send + 'static,
{
	let served = listen(state.clone(), http_addr, shutdown).await;

	state.close().await;

	tracing::info!("HTTP server stopped.");

	served
}

async fn listen<F>(state: AppState, http_addr: SocketAddr, shutdown: F) -> color_eyre::Result<()>
where
	F: Future<Output = ()> + Send + 'static,
{
	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, version = VERSION, "HTTP server listening.");

	axum::serve(http_listener, app).with_graceful_shutdown(shutdown).await?;

	Ok(())
}

fn init_tracing(config: &lexgraph_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for Ctrl-C.");

			future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(err) => {
				tracing::error!(error = %err, "Failed to listen for SIGTERM.");

				future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("Shutdown signal received.");
}
