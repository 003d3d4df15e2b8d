use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("info,serenity=warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.init();
}
