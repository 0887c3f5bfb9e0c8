//! Engine configuration, loaded from a TOML file the way `ikebuster`'s CLI
//! loads its scan parameters.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

/// Top level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Address to bind the ISAKMP (UDP 500) listener to
    #[serde(default = "EngineConfig::default_listen")]
    pub listen: SocketAddr,

    /// Address to bind the NAT-T (UDP 4500) listener to
    #[serde(default = "EngineConfig::default_listen_nat_t")]
    pub listen_nat_t: SocketAddr,

    /// Number of byte-identical duplicate retransmissions accepted from a
    /// peer before the SA is considered abusive, per §4.7.
    #[serde(default = "EngineConfig::default_max_duplicates")]
    pub max_accepted_duplicates: u32,

    /// Number of malformed-payload notifications accepted from a peer before
    /// the Informational handler starts ignoring them outright. Resolved as
    /// a configuration knob rather than a fixed constant, see DESIGN.md's
    /// answer to the `MAXIMUM_MALFORMED_NOTIFY` open question.
    #[serde(default = "EngineConfig::default_max_malformed_notify")]
    pub max_malformed_notify: u32,

    /// Whether to honor the Cisco Unity `SOFTREMOTE_CLIENT_WORKAROUND` vendor
    /// quirk engine-wide when a connection does not say otherwise, see
    /// DESIGN.md.
    #[serde(default)]
    pub softremote_workaround_default: bool,

    /// Whether `ISAKMP_N_CISCO_LOAD_BALANCE` redirects apply per-SA or are
    /// promoted to a connection-wide redirect, see DESIGN.md.
    #[serde(default)]
    pub cisco_load_balance_connection_wide: bool,

    /// Default Phase-1 dead peer detection interval.
    #[serde(
        default = "EngineConfig::default_dpd_interval",
        with = "humantime_seconds"
    )]
    pub dpd_interval: Duration,
}

impl EngineConfig {
    fn default_listen() -> SocketAddr {
        "0.0.0.0:500".parse().expect("valid default listen address")
    }

    fn default_listen_nat_t() -> SocketAddr {
        "0.0.0.0:4500".parse().expect("valid default NAT-T listen address")
    }

    fn default_max_duplicates() -> u32 {
        5
    }

    fn default_max_malformed_notify() -> u32 {
        10
    }

    fn default_dpd_interval() -> Duration {
        Duration::from_secs(30)
    }

    /// Parse a configuration from TOML source text.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

mod humantime_seconds {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
