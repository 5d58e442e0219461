//! Engine configuration.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `TABNUM_REFRESH_DELAY_MS` | u64 | 50 | Debounce delay before a refresh runs |
//!
//! Values are clamped to `0..=1000` ms.

use web_time::Duration;

use crate::scheduler::DEFAULT_REFRESH_DELAY_MS;

/// Environment variable overriding the refresh delay.
pub const REFRESH_DELAY_ENV: &str = "TABNUM_REFRESH_DELAY_MS";

/// Upper bound for the refresh delay.
pub const MAX_REFRESH_DELAY_MS: u64 = 1_000;

/// Tunables of [`TabNumbers`](crate::engine::TabNumbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay between the last refresh request and the reconciliation.
    pub refresh_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_millis(DEFAULT_REFRESH_DELAY_MS),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Load config from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through `lookup`, which maps a variable name to its
    /// value. Unparseable values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup(REFRESH_DELAY_ENV)
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.refresh_delay = Duration::from_millis(ms);
        }

        config.validated()
    }

    /// Clamp values to supported ranges.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let delay_ms = u64::try_from(self.refresh_delay.as_millis()).unwrap_or(u64::MAX);
        self.refresh_delay = Duration::from_millis(delay_ms.min(MAX_REFRESH_DELAY_MS));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |key| (key == REFRESH_DELAY_ENV).then(|| value.to_owned())
    }

    #[test]
    fn default_delay_is_fifty_ms() {
        assert_eq!(EngineConfig::default().refresh_delay, Duration::from_millis(50));
    }

    #[test]
    fn lookup_overrides_delay() {
        let config = EngineConfig::from_lookup(lookup_with("120"));
        assert_eq!(config.refresh_delay, Duration::from_millis(120));
    }

    #[test]
    fn lookup_ignores_garbage() {
        let config = EngineConfig::from_lookup(lookup_with("soon"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn delay_is_clamped() {
        let config = EngineConfig::from_lookup(lookup_with("60000"));
        assert_eq!(
            config.refresh_delay,
            Duration::from_millis(MAX_REFRESH_DELAY_MS)
        );
    }

    #[test]
    fn missing_variable_keeps_defaults() {
        assert_eq!(EngineConfig::from_lookup(|_| None), EngineConfig::default());
    }
}
