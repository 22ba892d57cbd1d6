// tile_world/server/src/operational/monitoring/metrics.rs
use metrics::{counter, gauge, histogram, describe_counter, describe_gauge, describe_histogram};
use std::time::Duration;
use anyhow::{Context, Result};

/// Reload metrics. Only emits through the `metrics` facade; installing an
/// exporter is left to the embedding server.
#[derive(Debug, Default)]
pub struct WorldMetrics;

impl WorldMetrics {
    pub fn new() -> Self {
        describe_counter!("world_reloads_total", "Number of world snapshots published");
        describe_counter!("world_reload_failures_total", "Number of reload attempts that were rejected");
        describe_histogram!("world_reload_time_seconds", "Time spent building a world snapshot");
        describe_gauge!("world_maps_loaded", "Maps in the live world snapshot");
        describe_gauge!("world_walkable_tiles", "Walkable tiles across all maps in the live snapshot");
        WorldMetrics
    }

    pub fn record_reload(&self, elapsed: Duration, map_count: usize, walkable_tiles: usize) {
        histogram!("world_reload_time_seconds").record(elapsed.as_secs_f64());
        counter!("world_reloads_total").increment(1);
        gauge!("world_maps_loaded").set(map_count as f64);
        gauge!("world_walkable_tiles").set(walkable_tiles as f64);
    }

    pub fn record_reload_failure(&self, elapsed: Duration) {
        histogram!("world_reload_time_seconds").record(elapsed.as_secs_f64());
        counter!("world_reload_failures_total").increment(1);
    }
}

pub const DEFAULT_LOG_FILTER: &str = "tile_world_core=info,tile_world_server=info,warn";

/// Output format for the log subscriber. Text for a terminal, JSON lines for
/// log shippers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{}', expected text or json", other),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `DEFAULT_LOG_FILTER`.
pub fn init_logging(format: LogFormat) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(false)))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
