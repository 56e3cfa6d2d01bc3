//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use runtime::RuntimeConfig;

/// Configuration required to bootstrap the runtime and pick a provider.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// World seed. Unset means a fresh seed from the clock.
    pub seed: Option<u64>,
    /// Decision service endpoint. Unset plays with the local heuristic.
    pub decision_url: Option<String>,
    pub decision_timeout: Duration,
    pub tick_interval: Option<Duration>,
    pub max_rounds: Option<u32>,
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            decision_url: None,
            decision_timeout: Duration::from_secs(15),
            tick_interval: None,
            max_rounds: Some(200),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLEFIELD_SEED` - World seed (default: clock based)
    /// - `DECISION_URL` - Decision service endpoint (default: local heuristic)
    /// - `DECISION_TIMEOUT_MS` - Decision timeout (default: 15000)
    /// - `TICK_INTERVAL_MS` - Wall-clock tick pacing, `0` disables (default: 0)
    /// - `MAX_ROUNDS` - Round limit, `0` disables (default: 200)
    /// - `LOG_DIR` - Log directory (default: platform cache directory)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.seed = read_parsed(&read, "BATTLEFIELD_SEED");
        config.decision_url = read("DECISION_URL");

        if let Some(ms) = read_parsed::<u64>(&read, "DECISION_TIMEOUT_MS") {
            config.decision_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_parsed::<u64>(&read, "TICK_INTERVAL_MS") {
            config.tick_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(rounds) = read_parsed::<u32>(&read, "MAX_ROUNDS") {
            config.max_rounds = (rounds > 0).then_some(rounds);
        }
        config.log_dir = read("LOG_DIR").map(PathBuf::from);

        config
    }

    /// The seed to play with, drawing one from the clock if none was set.
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        })
    }

    pub fn runtime_config(&self, seed: u64) -> RuntimeConfig {
        RuntimeConfig {
            seed,
            decision_timeout: self.decision_timeout,
            tick_interval: self.tick_interval,
            ..RuntimeConfig::default()
        }
    }
}

fn read_parsed<T>(read: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    read(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.seed, None);
        assert_eq!(config.decision_url, None);
        assert_eq!(config.decision_timeout, Duration::from_secs(15));
        assert_eq!(config.tick_interval, None);
        assert_eq!(config.max_rounds, Some(200));
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("BATTLEFIELD_SEED", "42"),
            ("DECISION_URL", "http://localhost:5000/act"),
            ("DECISION_TIMEOUT_MS", "2500"),
            ("TICK_INTERVAL_MS", "16"),
            ("MAX_ROUNDS", "0"),
            ("LOG_DIR", "/var/log/battlefield"),
        ]);
        assert_eq!(config.resolved_seed(), 42);
        assert_eq!(config.decision_url.as_deref(), Some("http://localhost:5000/act"));
        assert_eq!(config.decision_timeout, Duration::from_millis(2500));
        assert_eq!(config.tick_interval, Some(Duration::from_millis(16)));
        assert_eq!(config.max_rounds, None);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/battlefield")));

        let runtime = config.runtime_config(42);
        assert_eq!(runtime.seed, 42);
        assert_eq!(runtime.decision_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn garbage_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("BATTLEFIELD_SEED", "abc"),
            ("DECISION_TIMEOUT_MS", "-5"),
            ("DECISION_URL", "   "),
        ]);
        assert_eq!(config.seed, None);
        assert_eq!(config.decision_timeout, Duration::from_secs(15));
        assert_eq!(config.decision_url, None);
    }
}
