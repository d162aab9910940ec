//! Request pacing for multi-page scans.

use std::time::Duration;

/// Default spacing between requests: the Flavortown listing endpoints
/// allow 5 requests per minute.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_millis(12_500);

/// Decides how long to wait before each request of a scan.
pub trait PacingPolicy: Send + Sync {
    /// Delay before request number `request_index` (0 is the first page).
    fn delay_before(&self, request_index: u32) -> Duration;
}

/// Waits a fixed delay before every request except the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_RATE_LIMIT_DELAY)
    }
}

impl PacingPolicy for FixedDelay {
    fn delay_before(&self, request_index: u32) -> Duration {
        if request_index == 0 {
            Duration::ZERO
        } else {
            self.0
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PacingPolicy for NoDelay {
    fn delay_before(&self, _request_index: u32) -> Duration {
        Duration::ZERO
    }
}

/// Rough wall-clock estimate for scanning the remaining pages after page 1.
pub fn estimate_scan_duration(policy: &dyn PacingPolicy, total_pages: u32) -> Duration {
    (1..total_pages).map(|index| policy.delay_before(index)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_skips_first_request() {
        let policy = FixedDelay::default();
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        assert_eq!(policy.delay_before(1), Duration::from_millis(12_500));
        assert_eq!(policy.delay_before(7), Duration::from_millis(12_500));
    }

    #[test]
    fn test_estimate_scan_duration() {
        let policy = FixedDelay(Duration::from_secs(10));
        assert_eq!(estimate_scan_duration(&policy, 1), Duration::ZERO);
        assert_eq!(estimate_scan_duration(&policy, 4), Duration::from_secs(30));
        assert_eq!(estimate_scan_duration(&NoDelay, 50), Duration::ZERO);
    }
}
