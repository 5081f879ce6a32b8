use crate::errors::ConfigError;
use std::env;

const DEFAULT_PORT: u16 = 8080;
const JSONBIN_BASE: &str = "https://api.jsonbin.io/v3/b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub store_url: String,
    pub master_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());

        let master_key =
            present("JSONBIN_MASTER_KEY").ok_or(ConfigError::Missing("JSONBIN_MASTER_KEY"))?;

        let store_url = match (present("JSONBIN_URL"), present("JSONBIN_BIN_ID")) {
            (Some(url), _) => {
                let url = url.trim().to_string();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid {
                        var: "JSONBIN_URL",
                        value: url,
                    });
                }
                url
            }
            (None, Some(bin_id)) => format!("{JSONBIN_BASE}/{}", bin_id.trim()),
            (None, None) => return Err(ConfigError::Missing("JSONBIN_URL")),
        };

        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            store_url,
            master_key,
        })
    }
}
