//! Configuration for the beacon settings module

use crate::contract::PacketKind;
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "BEACON_SETTINGS_";

/// Beacon settings configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Highest number of simultaneous slots read per packet kind
    #[serde(default = "default_max_slots_per_packet")]
    pub max_slots_per_packet: u8,

    /// Packet kinds covered by a device read
    #[serde(default = "default_packets")]
    pub packets: Vec<PacketKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_slots_per_packet: default_max_slots_per_packet(),
            packets: default_packets(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, overridden by `BEACON_SETTINGS_*`
    /// environment variables. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.max_slots_per_packet >= 1,
            "max_slots_per_packet must be at least 1"
        );
        Ok(())
    }
}

fn default_max_slots_per_packet() -> u8 {
    1
}

fn default_packets() -> Vec<PacketKind> {
    PacketKind::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_cover_all_packets() {
        let config = Config::default();
        assert_eq!(config.max_slots_per_packet, 1);
        assert_eq!(config.packets.len(), PacketKind::ALL.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "beacon.yaml",
                "max_slots_per_packet: 2\npackets: [ibeacon, eddystone_url]\n",
            )?;

            let config = Config::load("beacon.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.max_slots_per_packet, 2);
            assert_eq!(
                config.packets,
                vec![PacketKind::IBeacon, PacketKind::EddystoneUrl]
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("beacon.yaml", "max_slots_per_packet: 2\n")?;
            jail.set_env("BEACON_SETTINGS_MAX_SLOTS_PER_PACKET", "4");

            let config = Config::load("beacon.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config.max_slots_per_packet, 4);
            assert_eq!(config.packets, default_packets());
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load("absent.yaml").map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_zero_slots_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("beacon.yaml", "max_slots_per_packet: 0\n")?;
            assert!(Config::load("beacon.yaml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("beacon.yaml", "retries: 3\n")?;
            assert!(Config::load("beacon.yaml").is_err());
            Ok(())
        });
    }
}
