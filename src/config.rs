/*!
 * Synchronization Configuration
 *
 * Runtime knobs shared by every primitive: diagnostics thresholds,
 * best-effort self-deadlock detection, and a fallback wait deadline
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Synchronization configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Blocked waits longer than this are reported at warn level
    pub slow_wait_threshold: Duration,
    /// Reject re-acquisition of an `OwnedLock` by its own holder
    pub detect_self_deadlock: bool,
    /// Reject re-acquisition of a `MutualExclusionLock` by its last acquirer
    ///
    /// Opt-in: that lock may be released by any thread, so a re-acquire
    /// can be legitimate and this check reports false positives.
    pub detect_unowned_self_deadlock: bool,
    /// Deadline used when a blocking call is given `None`
    pub default_timeout: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            slow_wait_threshold: Duration::from_millis(100),
            detect_self_deadlock: cfg!(debug_assertions),
            detect_unowned_self_deadlock: false,
            default_timeout: None,
        }
    }
}

impl SyncConfig {
    /// Configuration that surfaces every misuse it can detect
    pub const fn strict() -> Self {
        Self {
            slow_wait_threshold: Duration::from_millis(10),
            detect_self_deadlock: true,
            detect_unowned_self_deadlock: true,
            default_timeout: None,
        }
    }

    /// Configuration with detection off and quiet diagnostics
    pub const fn relaxed() -> Self {
        Self {
            slow_wait_threshold: Duration::from_secs(5),
            detect_self_deadlock: false,
            detect_unowned_self_deadlock: false,
            default_timeout: None,
        }
    }

    /// Set the fallback deadline for blocking calls
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Load a configuration from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve the effective timeout for a blocking call
    #[inline]
    pub(crate) fn effective_timeout(&self, timeout: Option<Duration>) -> Option<Duration> {
        timeout.or(self.default_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_timeout_prefers_explicit() {
        let config = SyncConfig::relaxed().with_default_timeout(Duration::from_secs(1));
        assert_eq!(
            config.effective_timeout(Some(Duration::from_millis(5))),
            Some(Duration::from_millis(5))
        );
        assert_eq!(config.effective_timeout(None), Some(Duration::from_secs(1)));
        assert_eq!(SyncConfig::strict().effective_timeout(None), None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = SyncConfig::from_json(r#"{"detect_self_deadlock": true}"#).unwrap();
        assert!(config.detect_self_deadlock);
        assert!(!config.detect_unowned_self_deadlock);
        assert_eq!(
            config.slow_wait_threshold,
            SyncConfig::default().slow_wait_threshold
        );
    }

    #[test]
    fn test_json_roundtrip_of_preset() {
        let json = serde_json::to_string(&SyncConfig::strict()).unwrap();
        assert_eq!(SyncConfig::from_json(&json).unwrap(), SyncConfig::strict());
    }
}
