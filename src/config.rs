use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Web {
    #[serde(default = "default_ip")]
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub web: Web,
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Web {
    fn default() -> Self {
        Web {
            ip: default_ip(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            web: Web::default(),
        }
    }
}

pub fn read_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let raw_config = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw_config)?)
}
