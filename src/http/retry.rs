//! Retry policy for transport failures.

use std::time::Duration;

use crate::config::ClientConfig;

/// Requests that never got a response are retried `attempts` more times,
/// each after a fixed `delay`. Anything with a response is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub fn none() -> Self {
        Self {
            attempts: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.retry_attempts, cfg.retry_delay())
    }

    pub fn should_retry(&self, failure: TransportFailure, retries_done: u32) -> bool {
        failure == TransportFailure::Network && retries_done < self.attempts
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportFailure {
    /// No response: refused, reset, DNS, incomplete message.
    Network,
    Timeout,
    /// The request could not be built; retrying cannot help.
    Setup,
}

pub fn classify(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_builder() {
        TransportFailure::Setup
    } else {
        TransportFailure::Network
    }
}
