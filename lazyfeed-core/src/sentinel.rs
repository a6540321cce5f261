/// Identity of one appearance of the trailing sentinel: the length of the list it
/// was rendered after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppearanceKey(pub usize);

impl AppearanceKey {
    pub fn after(len: usize) -> Self {
        Self(len)
    }

    /// Whether this sentinel was rendered after the list as it is now.
    pub fn is_current(&self, len: usize) -> bool {
        self.0 == len
    }
}

/// Runs the load-more effect once per sentinel appearance, no matter how many
/// times the same appearance gets mounted or redrawn.
///
/// Lists only grow, so keys only grow as well. A key at or below the last fired
/// one belongs to a sentinel that already did its job.
#[derive(Clone, Debug, Default)]
pub struct SentinelTrigger {
    last: Option<AppearanceKey>,
}

impl SentinelTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appear(&mut self, key: AppearanceKey) -> bool {
        if self.last.is_some_and(|last| key <= last) {
            log::debug!("sentinel after {} posts already fired", key.0);
            return false;
        }
        log::debug!("sentinel appeared after {} posts", key.0);
        self.last = Some(key);
        true
    }

    pub fn last(&self) -> Option<AppearanceKey> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_key() {
        let mut trigger = SentinelTrigger::new();
        assert!(trigger.appear(AppearanceKey::after(25)));
        assert!(!trigger.appear(AppearanceKey::after(25)));
        assert!(!trigger.appear(AppearanceKey::after(25)));
        assert!(trigger.appear(AppearanceKey::after(50)));
        assert_eq!(trigger.last(), Some(AppearanceKey(50)));
    }

    #[test]
    fn late_remount_of_older_sentinel_is_ignored() {
        let mut trigger = SentinelTrigger::new();
        assert!(trigger.appear(AppearanceKey::after(25)));
        assert!(trigger.appear(AppearanceKey::after(50)));
        assert!(!trigger.appear(AppearanceKey::after(25)));
        assert!(!trigger.appear(AppearanceKey::after(50)));
        assert_eq!(trigger.last(), Some(AppearanceKey(50)));
        assert!(trigger.appear(AppearanceKey::after(75)));
    }

    #[test]
    fn key_is_current_only_for_its_length() {
        let key = AppearanceKey::after(25);
        assert!(key.is_current(25));
        assert!(!key.is_current(50));
        assert!(!key.is_current(0));
    }

    #[test]
    fn nothing_fired_initially() {
        assert_eq!(SentinelTrigger::new().last(), None);
    }
}
