use std::time::Duration;

const ENV_LINE_LIMIT: &str = "FRAGVIEW_LINE_LIMIT";
const ENV_CONTEXT_LINES: &str = "FRAGVIEW_CONTEXT_LINES";
const ENV_MAX_RESULTS: &str = "FRAGVIEW_MAX_RESULTS";
const ENV_MIN_QUERY_CHARS: &str = "FRAGVIEW_MIN_QUERY_CHARS";
const ENV_DEBOUNCE_MS: &str = "FRAGVIEW_DEBOUNCE_MS";

const DEFAULT_LINE_LIMIT: usize = 20;
const DEFAULT_CONTEXT_LINES: usize = 5;
const DEFAULT_MAX_RESULTS: usize = 2000;
const DEFAULT_MIN_QUERY_CHARS: usize = 4;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Tunables shared by the searcher, the session controller, and the surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreConfig {
    /// Lines requested per load-more call.
    pub line_limit: usize,
    /// Context lines attached to each side of a fresh search result.
    pub context_lines: usize,
    /// Match-count ceiling before a query is rejected as too broad.
    pub max_results: usize,
    /// Minimum query length accepted by the searcher.
    pub min_query_chars: usize,
    /// Quiet window for debounced search triggers.
    pub debounce_window: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            line_limit: DEFAULT_LINE_LIMIT,
            context_lines: DEFAULT_CONTEXT_LINES,
            max_results: DEFAULT_MAX_RESULTS,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl CoreConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            line_limit: read_env_usize(ENV_LINE_LIMIT, defaults.line_limit, 1),
            context_lines: read_env_usize(ENV_CONTEXT_LINES, defaults.context_lines, 0),
            max_results: read_env_usize(ENV_MAX_RESULTS, defaults.max_results, 1),
            min_query_chars: read_env_usize(ENV_MIN_QUERY_CHARS, defaults.min_query_chars, 1),
            debounce_window: Duration::from_millis(
                read_env_u64(ENV_DEBOUNCE_MS).unwrap_or(DEFAULT_DEBOUNCE_MS),
            ),
        }
    }
}

#[must_use]
fn read_env_usize(name: &str, default_value: usize, min_value: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value >= min_value)
        .unwrap_or(default_value)
}

#[must_use]
fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_tunables() {
        let config = CoreConfig::default();
        assert_eq!(config.line_limit, 20);
        assert_eq!(config.context_lines, 5);
        assert_eq!(config.max_results, 2000);
        assert_eq!(config.min_query_chars, 4);
        assert_eq!(config.debounce_window, Duration::from_millis(500));
    }

    #[test]
    fn env_reader_falls_back_on_unparsable_values() {
        assert_eq!(read_env_usize("FRAGVIEW_TEST_UNSET_VALUE", 7, 1), 7);
    }
}
