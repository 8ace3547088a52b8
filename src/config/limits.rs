//! Rate limit configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for one limiter instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitParams {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitParams {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Per-feature rate limits. The diagnosis pipeline and the spare-parts
/// search run independent limiter instances with different windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub diagnosis: RateLimitParams,
    pub parts_search: RateLimitParams,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            diagnosis: RateLimitParams {
                max_requests: 5,
                window_secs: 3600,
            },
            parts_search: RateLimitParams {
                max_requests: 30,
                window_secs: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = LimitsConfig::default();
        assert_eq!(config.diagnosis.max_requests, 5);
        assert_eq!(config.diagnosis.window(), Duration::from_secs(3600));
        assert_eq!(config.parts_search.max_requests, 30);
        assert_eq!(config.parts_search.window(), Duration::from_secs(60));
    }
}
