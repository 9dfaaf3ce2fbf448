//! cdc-sink-plugin binary: loads configuration, installs the tracing
//! subscriber and serves the plugin endpoint until shutdown.

use anyhow::Result;
use cdc_sink_plugin::core::{LogFormat, PluginConfig};
use cdc_sink_plugin::server;
use cdc_sink_plugin::{Dispatcher, EventSink, TracingSink};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "cdc-sink-plugin",
    about = "HTTP endpoint dispatching CDC sink operations to handlers",
    version
)]
struct Args {
    /// Address to listen on (overrides SINK_PLUGIN_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SINK_PLUGIN_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log output format, "pretty" or "json" (overrides LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = PluginConfig::from_env()?.with_overrides(args.host, args.port, args.log_format)?;

    init_tracing(config.log_format);

    info!(
        host = %config.host,
        port = config.port,
        request_timeout_secs = config.request_timeout_secs,
        "Starting sink plugin"
    );

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink::new());
    info!("Forwarding sink events to: {}", sink.sink_type());
    let dispatcher = Arc::new(Dispatcher::with_sink(sink));

    match server::serve(&config, dispatcher).await {
        Ok(()) => {
            info!("Sink plugin completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Sink plugin failed: {}", e);
            Err(e.into())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init(),
    }
}
