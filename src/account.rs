use std::fmt::Debug;

use derive_more::{AsRef, Display, From};
use log::info;
use typed_builder::TypedBuilder;

pub const ACCOUNT_SEPARATOR: char = '#';
pub const FIELD_SEPARATOR: char = '&';

#[derive(Debug, TypedBuilder)]
pub struct Account {
    pub email: Email,
    pub password: Password,
}

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display)]
#[as_ref(forward)]
pub struct Email(String);

#[derive(Clone, PartialEq, Eq, From, AsRef)]
#[as_ref(forward)]
pub struct Password(String);
impl Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable `{0}` was not found")]
    EnvNotFound(String),
    #[error("No account was configured")]
    Empty,
}

/// Parses `email&passwd#email2&passwd2`.
/// Entries without `&` are skipped; only the first `&` of an entry separates the fields.
pub fn parse_accounts(source: &str) -> Result<Vec<Account>, ConfigError> {
    if source.is_empty() {
        return Err(ConfigError::Empty);
    }
    Ok(source
        .split(ACCOUNT_SEPARATOR)
        .filter_map(|entry| entry.split_once(FIELD_SEPARATOR))
        .map(|(email, password)| {
            Account::builder()
                .email(email.trim().to_owned().into())
                .password(password.trim().to_owned().into())
                .build()
        })
        .collect())
}

pub fn load_accounts_from_env(var: &str) -> Result<Vec<Account>, ConfigError> {
    let source = std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::EnvNotFound(var.to_owned()))?;
    let accounts = parse_accounts(&source)?;
    info!("Loaded {} account(s) from `{var}`", accounts.len());
    Ok(accounts)
}
