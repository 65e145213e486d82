use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use ikuuu_checkin_utils::fs_toml_util::read_toml;
use log::info;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};

use crate::{
    account::{load_accounts_from_env, parse_accounts, Account, ConfigError},
    check_in::CheckInRunner,
    mirror::Mirror,
};

pub const DEFAULT_ENV_VAR: &str = "ikuuu";
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Parser)]
pub struct Opts {
    /// Optional TOML file with mirrors, accounts and timeouts
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Environment variable holding `email&passwd#email2&passwd2`
    #[arg(long, default_value = DEFAULT_ENV_VAR)]
    pub env_var: String,
    /// Candidate mirror domain, tried in the given order (repeatable)
    #[arg(long = "mirror")]
    pub mirrors: Vec<Mirror>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub mirrors: Vec<Mirror>,
    /// Used only when the environment variable is not set.
    pub accounts: Option<String>,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub probe_timeout: Option<Duration>,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub request_timeout: Option<Duration>,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => Ok(Self::default()),
        }
    }
}

impl Opts {
    /// Mirrors from the command line win over the file, which wins over the built-in list.
    pub fn runner(&self, file: &FileConfig) -> CheckInRunner {
        let mirrors = [&self.mirrors, &file.mirrors]
            .into_iter()
            .find(|mirrors| !mirrors.is_empty())
            .cloned()
            .unwrap_or_else(Mirror::defaults);
        CheckInRunner {
            mirrors,
            probe_timeout: file.probe_timeout.unwrap_or(PROBE_TIMEOUT),
            request_timeout: file.request_timeout.unwrap_or(REQUEST_TIMEOUT),
        }
    }

    pub fn accounts(&self, file: &FileConfig) -> Result<Vec<Account>, ConfigError> {
        match (load_accounts_from_env(&self.env_var), &file.accounts) {
            (Err(ConfigError::EnvNotFound(_)), Some(accounts)) => {
                info!("`{}` is not set; using accounts from the config file", self.env_var);
                parse_accounts(accounts)
            }
            (result, _) => result,
        }
    }
}
