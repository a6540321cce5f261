use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const SCROLL_INITIAL_COUNT: usize = 50;
pub const SCROLL_BATCH_SIZE: usize = 20;
pub const SCROLL_DELAY: Duration = Duration::from_millis(2000);
pub const SENTINEL_INITIAL_COUNT: usize = 25;
pub const SENTINEL_BATCH_SIZE: usize = 25;

/// Upper bound on how many posts a feed keeps loading.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MaxCount {
    Unbounded,
    AtMost(usize),
}

impl MaxCount {
    /// Whether another batch may be loaded on top of `len` posts.
    pub fn allows(self, len: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::AtMost(max) => len < max,
        }
    }
}

impl Default for MaxCount {
    fn default() -> Self {
        Self::Unbounded
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadPolicy {
    pub initial_count: usize,
    pub batch_size: usize,
    pub delay_ms: u64,
    pub max_count: MaxCount,
}

impl LoadPolicy {
    /// Loads after the last post scrolls into view, with a simulated fetch delay.
    pub fn scroll() -> Self {
        Self {
            initial_count: SCROLL_INITIAL_COUNT,
            batch_size: SCROLL_BATCH_SIZE,
            delay_ms: SCROLL_DELAY.as_millis() as u64,
            max_count: MaxCount::Unbounded,
        }
    }

    /// Loads as soon as the trailing sentinel shows up, without delay.
    pub fn sentinel() -> Self {
        Self {
            initial_count: SENTINEL_INITIAL_COUNT,
            batch_size: SENTINEL_BATCH_SIZE,
            delay_ms: 0,
            max_count: MaxCount::Unbounded,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_max_count(mut self, max_count: MaxCount) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::FatalConfiguration(
                "batch size must be at least 1".into(),
            ));
        }
        if let MaxCount::AtMost(max) = self.max_count {
            if max < self.initial_count {
                return Err(Error::FatalConfiguration(format!(
                    "max count {max} is below the initial count {}",
                    self.initial_count
                )));
            }
        }
        Ok(())
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self::scroll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let scroll = LoadPolicy::scroll();
        assert_eq!(scroll.initial_count, 50);
        assert_eq!(scroll.batch_size, 20);
        assert_eq!(scroll.delay(), Duration::from_secs(2));
        assert_eq!(scroll.max_count, MaxCount::Unbounded);

        let sentinel = LoadPolicy::sentinel();
        assert_eq!(sentinel.initial_count, 25);
        assert_eq!(sentinel.batch_size, 25);
        assert_eq!(sentinel.delay(), Duration::ZERO);
    }

    #[test]
    fn max_count_is_a_stop_condition() {
        assert!(MaxCount::Unbounded.allows(usize::MAX - 1));
        assert!(MaxCount::AtMost(100).allows(99));
        assert!(!MaxCount::AtMost(100).allows(100));
        assert!(!MaxCount::AtMost(100).allows(120));
    }

    #[test]
    fn validation() {
        assert!(LoadPolicy::scroll().validate().is_ok());

        let no_batch = LoadPolicy {
            batch_size: 0,
            ..LoadPolicy::scroll()
        };
        assert!(matches!(
            no_batch.validate(),
            Err(Error::FatalConfiguration(_))
        ));

        let tiny_cap = LoadPolicy::scroll().with_max_count(MaxCount::AtMost(10));
        assert!(matches!(
            tiny_cap.validate(),
            Err(Error::FatalConfiguration(_))
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let policy: LoadPolicy = serde_json::from_str(r#"{ "batch_size": 5 }"#).unwrap();
        assert_eq!(policy.batch_size, 5);
        assert_eq!(policy.initial_count, SCROLL_INITIAL_COUNT);
        assert_eq!(policy.max_count, MaxCount::Unbounded);

        let capped: LoadPolicy =
            serde_json::from_str(r#"{ "max_count": { "AtMost": 200 } }"#).unwrap();
        assert_eq!(capped.max_count, MaxCount::AtMost(200));
    }
}
