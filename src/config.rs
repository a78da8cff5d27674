//! Configuration for tyrantkv sessions
//!
//! A `Config` is handed to [`Session::connect`](crate::Session::connect) and
//! never changes afterwards.

use std::time::Duration;

/// Default Tokyo Tyrant port
pub const DEFAULT_PORT: u16 = 1978;

/// Connection settings for a single session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub addr: String,

    /// Per-operation deadline, re-armed before every request.
    /// `Duration::ZERO` means operations may block forever.
    pub timeout: Duration,

    /// Bound on the TCP handshake. `None` dials with the OS default.
    pub connect_timeout: Option<Duration>,

    /// Disable Nagle's algorithm on the socket
    pub nodelay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            timeout: Duration::ZERO,
            connect_timeout: None,
            nodelay: true,
        }
    }
}

impl Config {
    /// Config for `addr` with the given per-operation timeout
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether a deadline is applied to each operation
    pub fn has_deadline(&self) -> bool {
        !self.timeout.is_zero()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address (host:port)
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the per-operation timeout (zero disables it)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the per-operation timeout in milliseconds
    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Bound the time spent dialing
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Toggle TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.addr, "127.0.0.1:1978");
        assert!(!config.has_deadline());
        assert!(config.connect_timeout.is_none());
        assert!(config.nodelay);
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .addr("10.0.0.1:60000")
            .timeout_ms(1500)
            .connect_timeout(Duration::from_secs(2))
            .nodelay(false)
            .build();

        assert_eq!(config.addr, "10.0.0.1:60000");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert!(config.has_deadline());
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
        assert!(!config.nodelay);
    }

    #[test]
    fn test_new_keeps_other_defaults() {
        let config = Config::new("localhost:1978", Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.nodelay);
    }
}
