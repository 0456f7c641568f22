mod config;
mod reconciler;
mod server;
mod source;

use std::path::PathBuf;
use std::sync::Arc;

use bpaf::Bpaf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::Config;
use crate::reconciler::Reconciler;
use crate::server::serve;

#[derive(Bpaf, Clone, Debug)]
#[bpaf(options)]
struct Options {
    /// Perform verbose logging
    #[bpaf(short, long)]
    verbose: bool,

    /// Path to the config file
    #[bpaf(short, long, argument("PATH"), fallback(PathBuf::from("./config.toml")))]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = options().run();

    let env_filter = EnvFilter::builder()
        .with_default_directive(
            match options.verbose {
                true => LevelFilter::TRACE,
                _ => LevelFilter::INFO,
            }
            .into(),
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let config = Config::load(&options.config)?;
    let address = config.server.address;
    let state = Arc::new(Reconciler::new(&config));

    serve(address, state).await
}
