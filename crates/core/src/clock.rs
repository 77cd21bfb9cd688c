//! # Clock Module
//!
//! Nguồn thời gian cho lockout. Inject được để test không phải sleep.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Nguồn thời gian hiện tại
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Đồng hồ hệ thống
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Đồng hồ điều khiển bằng tay, dùng cho test và mô phỏng.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Tiến đồng hồ thêm `secs` giây
    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc::now();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);
        clock.advance_secs(30);
        assert_eq!(clock.now() - start, Duration::seconds(30));
    }
}
