//! Battlefield client binary.
//!
//! Plays one match headless and logs the result.
//!
//! # Examples
//!
//! ```bash
//! # Local heuristic for both teams
//! BATTLEFIELD_SEED=7 cargo run -p battlefield-client
//!
//! # Remote decision service
//! DECISION_URL=http://localhost:5000/act cargo run -p battlefield-client
//! ```

use anyhow::Result;
use battlefield_client::{ClientConfig, logging};
use runtime::{
    DecisionEvent, Event, HeuristicDecisionProvider, HttpDecisionProvider, Runtime, Topic,
};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let seed = config.resolved_seed();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref(), &format!("seed_{seed}"))?;

    tracing::info!("Starting battlefield client");
    tracing::info!("Seed: {}", seed);
    tracing::info!("Decision timeout: {:?}", config.decision_timeout);

    let builder = Runtime::builder().config(config.runtime_config(seed));
    let builder = match &config.decision_url {
        Some(url) => {
            tracing::info!("Decision service: {}", url);
            builder.provider(HttpDecisionProvider::new(url.clone()))
        }
        None => {
            tracing::info!("No DECISION_URL set, using the local heuristic");
            builder.provider(HeuristicDecisionProvider::new())
        }
    };
    let mut runtime = builder.build().await?;

    let reporter = tokio::spawn(report_events(runtime.handle()));

    let summary = runtime.run(config.max_rounds).await?;
    match summary.winner {
        Some(team) => tracing::info!(
            "{} team wins after {} rounds ({} actions, {} passes)",
            team,
            summary.rounds,
            summary.actions,
            summary.forfeits
        ),
        None => tracing::info!(
            "No winner after {} rounds ({} actions, {} passes)",
            summary.rounds,
            summary.actions,
            summary.forfeits
        ),
    }

    reporter.abort();
    runtime.shutdown().await?;
    tracing::info!("Client shutdown complete");
    Ok(())
}

/// Mirrors turn hand-overs and agent thoughts into the log.
async fn report_events(handle: runtime::RuntimeHandle) {
    let mut topics = handle.subscribe_multiple(&[Topic::Turn, Topic::Decision]);
    let (Some(mut turns), Some(mut decisions)) =
        (topics.remove(&Topic::Turn), topics.remove(&Topic::Decision))
    else {
        return;
    };
    drop(handle);

    loop {
        let received = tokio::select! {
            event = turns.recv() => event,
            event = decisions.recv() => event,
        };
        match received {
            Ok(Event::Turn(turn)) => {
                tracing::info!("Round {}: {} to act", turn.round, turn.callsign);
            }
            Ok(Event::Decision(DecisionEvent::Received {
                thoughts, action, ..
            })) => {
                tracing::info!("{} ({})", action, thoughts);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Event reporter lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
