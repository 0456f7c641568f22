use std::fmt::{self, Debug, Formatter};
use std::net::{Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

#[derive(Clone, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from((Ipv6Addr::LOCALHOST, 3001)),
        }
    }
}

/// The XMLTV scheduling database, a SQLite file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct XmltvConfig {
    pub path: PathBuf,
}

impl Default for XmltvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/home/mythtv/.xmltv/SchedulesDirect.DB"),
        }
    }
}

/// The MythTV database holding the DVR's channel table.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MythtvConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub login: String,
    pub password: Password,
}

impl Default for MythtvConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "mythconverg".to_string(),
            login: "mythtv".to_string(),
            password: Password::from("mythtv".to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub xmltv: XmltvConfig,

    #[serde(default)]
    pub mythtv: MythtvConfig,
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist,
    /// then applies overrides from the process environment.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            info!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&file)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        Ok(config)
    }

    /// Overrides database settings with the variables a web server would
    /// inject into the request environment.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(host) = var("DB_SERVER") {
            self.mythtv.host = host;
        }

        if let Some(port) = var("DB_PORT") {
            self.mythtv.port = port
                .parse()
                .with_context(|| format!("invalid DB_PORT: {port:?}"))?;
        }

        if let Some(database) = var("DB_NAME") {
            self.mythtv.database = database;
        }

        if let Some(login) = var("DB_LOGIN") {
            self.mythtv.login = login;
        }

        if let Some(password) = var("DB_PASSWORD") {
            self.mythtv.password = password.into();
        }

        if let Some(path) = var("XMLTV_DB_PATH") {
            self.xmltv.path = path.into();
        }

        Ok(())
    }
}
