//! Layered connection settings.
//!
//! Precedence, highest first: command-line flag, environment variable (both
//! handled by clap), TOML config file, built-in defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use trackhub_core::{Credentials, ServerEndpoint};

use crate::args::GlobalArgs;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Contents of the optional config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub verify_tls: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("couldn't read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub verify_tls: bool,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::layer(file, args))
    }

    pub fn layer(file: FileConfig, args: &GlobalArgs) -> Self {
        Self {
            server: args
                .server
                .clone()
                .or(file.server)
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            user: args.user.clone().or(file.user),
            password: args.password.clone().or(file.password),
            verify_tls: !args.insecure && file.verify_tls.unwrap_or(true),
            timeout: args.timeout.or(file.timeout_secs).map(Duration::from_secs),
        }
    }

    pub fn endpoint(&self) -> ServerEndpoint {
        ServerEndpoint::new(&self.server)
            .with_verify_tls(self.verify_tls)
            .with_timeout(self.timeout)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| anyhow!("no user configured; pass --user or set TRACKHUB_USER"))?;
        let password = self
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("no password configured; pass --password or set TRACKHUB_PASSWORD"))?;
        Ok(Credentials::new(user, password))
    }
}
