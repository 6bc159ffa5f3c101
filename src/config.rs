//! Configuration management for minichain

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_node_identifier")]
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default)]
    pub bootstrap_peers: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            identifier: default_node_identifier(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bootstrap_peers: Vec::new(),
        }
    }
}

fn default_node_identifier() -> String {
    "node-0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

/// Load `config.toml` from the working directory; absent or empty files
/// yield the defaults.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config {
            node: NodeConfig::default(),
            network: NetworkConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    if config.node.identifier.is_empty() {
        return Err("node.identifier must not be empty".into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.node.identifier, "node-0");
        assert_eq!(config.network.api_port, 8080);
        assert!(config.network.bootstrap_peers.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [node]
            identifier = "alpha"

            [network]
            api_port = 9000
            bootstrap_peers = ["http://127.0.0.1:9001"]
            "#,
        )
        .unwrap();
        assert_eq!(config.node.identifier, "alpha");
        assert_eq!(config.network.api_port, 9000);
        assert_eq!(config.network.bootstrap_peers.len(), 1);
    }
}
