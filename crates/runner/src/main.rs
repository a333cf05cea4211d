use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crossrate_clock::SystemClock;
use crossrate_conversion::{JsonLinesSink, RateComputer};
use crossrate_gateway::RestPairSource;
use crossrate_ports::Clock;
use crossrate_runner::bootstrap::{discover_pairs, missing_route_pairs};
use crossrate_runner::config::load_config_from_env;
use crossrate_runner::logging::init_tracing;
use crossrate_runner::session::{StreamingSession, rate_callback};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let config = load_config_from_env().context("failed to load configuration")?;
    init_tracing(config.logging.json);

    tracing::info!(
        rest = %config.rest_base_url,
        websocket = %config.websocket_base_url,
        "Starting crossrate streamer"
    );

    let source = RestPairSource::new(
        config.rest_base_url.clone(),
        config.discovery.request_timeout(),
    );
    let pairs = discover_pairs(&source, config.discovery.timeout())
        .await
        .context("cannot start without trading pairs")?;

    let route = config.conversion_route();
    for pair in missing_route_pairs(&route, &pairs) {
        tracing::warn!(pair = %pair, "Conversion pair not offered by the exchange");
    }

    let sink = Arc::new(
        JsonLinesSink::open(&config.sink.path)
            .with_context(|| format!("failed to open {}", config.sink.path.display()))?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let mut session = StreamingSession::new(config.to_stream_config(), Arc::clone(&clock));
    let computer = Arc::new(RateComputer::new(session.reader(), sink, clock, route));
    session.start(&pairs, Some(rate_callback(computer)));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown requested");

    session.shutdown(SHUTDOWN_GRACE).await;
    Ok(())
}
