//! Timestamp and nonce generation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of `oauth_timestamp` and `oauth_nonce` values.
///
/// Each signing call asks for a fresh pair. Swap in [`FixedClock`] to get
/// reproducible signatures.
pub trait ClockAndNonceSource: Send + Sync {
    /// Seconds since the Unix epoch, as a decimal string.
    fn timestamp(&self) -> String;

    /// Single-use random value.
    fn nonce(&self) -> String;
}

/// Wall clock with cryptographically random nonces.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockAndNonceSource for SystemClock {
    fn timestamp(&self) -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
            .to_string()
    }

    /// 32 hex characters from 16 random bytes.
    fn nonce(&self) -> String {
        let bytes: [u8; 16] = rand::random();
        hex::encode(bytes)
    }
}

/// Constant timestamp and nonce, for tests and fixture generation.
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: String,
    nonce: String,
}

impl FixedClock {
    pub fn new(timestamp: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            nonce: nonce.into(),
        }
    }
}

impl ClockAndNonceSource for FixedClock {
    fn timestamp(&self) -> String {
        self.timestamp.clone()
    }

    fn nonce(&self) -> String {
        self.nonce.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_uniqueness() {
        let nonce1 = SystemClock.nonce();
        let nonce2 = SystemClock.nonce();
        assert_ne!(nonce1, nonce2);
        assert_eq!(nonce1.len(), 32);
        assert!(nonce1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_timestamp_is_current_seconds() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let timestamp: u64 = SystemClock.timestamp().parse().unwrap();
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        assert!(before <= timestamp && timestamp <= after);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new("1191242096", "kllo9940pd9333jh");
        assert_eq!(clock.timestamp(), "1191242096");
        assert_eq!(clock.nonce(), "kllo9940pd9333jh");
        assert_eq!(clock.nonce(), "kllo9940pd9333jh");
    }
}
