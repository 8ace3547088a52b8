//! Sliding-window request limiting.
//!
//! One limiter instance guards one feature: the diagnosis pipeline runs a
//! 1-hour / 5-request window, the spare-parts search a 1-minute window
//! with a higher cap. Instances share no state.
//!
//! Windows are keyed by a normalized identity (lowercased, trimmed).
//! Per-key check-and-increment is atomic: the map's entry guard holds the
//! shard lock for the whole read-modify-write, so two concurrent requests
//! for the same identity cannot both slip under the cap. Expired windows
//! are dropped lazily on next access and by a periodic sweeper whose
//! interval equals the window length.

use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Time source abstraction so window expiry is testable without
/// wall-clock waits.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// The production clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    epoch: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().expect("clock offset lock");
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.epoch + *self.offset.lock().expect("clock offset lock")
    }
}

/// Outcome of a consumption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// Denied; the window resets after roughly this long.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-process sliding-window limiter.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    /// Construct with an injected clock (for tests).
    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            clock,
        }
    }

    /// Atomically check the identity's window and consume one request.
    ///
    /// First use, or first use after expiry, resets the count to 1 and
    /// allows. Under the cap, increments and allows. At the cap, denies
    /// without incrementing.
    pub fn check_and_consume(&self, identity: &str) -> RateLimitDecision {
        let key = identity.trim().to_lowercase();
        let now = self.clock.now();

        let mut entry = self.windows.entry(key).or_insert_with(|| Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return RateLimitDecision::Allowed;
        }

        if entry.count >= self.max_requests {
            return RateLimitDecision::Limited {
                retry_after: entry.reset_at.saturating_duration_since(now),
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }

    /// Drop every expired window.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, window| window.reset_at > now);
        let removed = before - self.windows.len();
        if removed > 0 {
            debug!(removed, remaining = self.windows.len(), "Swept expired rate-limit windows");
        }
    }

    /// Number of live windows (expired-but-unswept entries included).
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }

    /// Start the periodic sweeper. Runs until the token is cancelled;
    /// the interval equals the window length.
    pub fn start_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Rate-limit sweeper stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        limiter.sweep();
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn limiter(max: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(max, HOUR, clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_allows_up_to_cap_then_denies() {
        let (limiter, _clock) = limiter(5);
        for i in 0..5 {
            assert!(
                limiter.check_and_consume("jo@example.com").is_allowed(),
                "request {i} should be allowed"
            );
        }
        assert!(!limiter.check_and_consume("jo@example.com").is_allowed());
        // Denials do not consume; still denied.
        assert!(!limiter.check_and_consume("jo@example.com").is_allowed());
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let (limiter, clock) = limiter(5);
        for _ in 0..5 {
            assert!(limiter.check_and_consume("jo@example.com").is_allowed());
        }
        assert!(!limiter.check_and_consume("jo@example.com").is_allowed());

        clock.advance(HOUR + Duration::from_secs(1));
        assert!(limiter.check_and_consume("jo@example.com").is_allowed());
        // The reset left room for four more.
        for _ in 0..4 {
            assert!(limiter.check_and_consume("jo@example.com").is_allowed());
        }
        assert!(!limiter.check_and_consume("jo@example.com").is_allowed());
    }

    #[test]
    fn test_identities_are_independent() {
        let (limiter, _clock) = limiter(1);
        assert!(limiter.check_and_consume("a@example.com").is_allowed());
        assert!(limiter.check_and_consume("b@example.com").is_allowed());
        assert!(!limiter.check_and_consume("a@example.com").is_allowed());
    }

    #[test]
    fn test_identity_normalized() {
        let (limiter, _clock) = limiter(1);
        assert!(limiter.check_and_consume("Jo@Example.COM ").is_allowed());
        assert!(!limiter.check_and_consume("jo@example.com").is_allowed());
    }

    #[test]
    fn test_denial_reports_retry_after() {
        let (limiter, clock) = limiter(1);
        assert!(limiter.check_and_consume("jo@example.com").is_allowed());
        clock.advance(Duration::from_secs(600));
        match limiter.check_and_consume("jo@example.com") {
            RateLimitDecision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(3000));
            }
            RateLimitDecision::Allowed => panic!("expected denial"),
        }
    }

    #[test]
    fn test_sweep_drops_only_expired_windows() {
        let (limiter, clock) = limiter(5);
        limiter.check_and_consume("old@example.com");
        clock.advance(Duration::from_secs(1800));
        limiter.check_and_consume("new@example.com");
        clock.advance(Duration::from_secs(1801));

        // old expired (3601s elapsed), new still live (1801s elapsed).
        limiter.sweep();
        assert_eq!(limiter.tracked_identities(), 1);
    }

    #[test]
    fn test_concurrent_same_key_never_exceeds_cap() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let limiter = Arc::new(RateLimiter::new(5, HOUR));
        let allowed = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let allowed = Arc::clone(&allowed);
                std::thread::spawn(move || {
                    if limiter.check_and_consume("same@example.com").is_allowed() {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread join");
        }

        assert_eq!(allowed.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_cancel() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_millis(10)));
        let cancel = CancellationToken::new();
        let handle = limiter.start_sweeper(cancel.clone());

        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok());
    }
}
