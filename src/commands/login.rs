//! `flavor login ...`: store credentials and identifiers.

use crate::cli::LoginCommand;
use crate::error::AppError;
use crate::store::{ConfigStore, SettingKey};
use crate::ui::Prompter;
use std::io::{BufRead, Write};
use tracing::info;

const API_KEY_PREFIX: &str = "ft_sk_";

/// Store the value given (or prompted for). Returns the success message.
pub fn run<R: BufRead, W: Write>(
    command: LoginCommand,
    store: &dyn ConfigStore,
    prompter: &mut Prompter<R, W>,
) -> Result<String, AppError> {
    let (key, given, question) = match command {
        LoginCommand::Api { key } => (
            SettingKey::ApiKey,
            key,
            "Please enter your Flavortown API key",
        ),
        LoginCommand::Id { id } => (SettingKey::FlavorId, id, "Please enter your Flavortown User ID"),
        LoginCommand::Hackatime { key } => (
            SettingKey::HackatimeKey,
            key,
            "Please enter your Hackatime API key",
        ),
        LoginCommand::HackatimeUser { username } => (
            SettingKey::HackatimeUsername,
            username,
            "Please enter your Hackatime username",
        ),
    };

    let value = match given.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value,
        None if key.is_secret() => prompter.ask_secret(question)?,
        None => prompter.ask_required(question)?,
    };

    validate(key, &value)?;
    store.set(key, &value)?;
    info!("Stored {}", key);

    Ok(match key {
        SettingKey::ApiKey => "Successfully logged in to the Flavortown API!".to_string(),
        SettingKey::FlavorId => "Successfully saved your Flavortown User ID!".to_string(),
        SettingKey::HackatimeKey => "Successfully logged in with your Hackatime API key!".to_string(),
        SettingKey::HackatimeUsername => {
            format!("Successfully set Hackatime username to {}!", value)
        }
    })
}

fn validate(key: SettingKey, value: &str) -> Result<(), AppError> {
    match key {
        SettingKey::ApiKey if !value.starts_with(API_KEY_PREFIX) => Err(AppError::input(format!(
            "Invalid API key format. It must start with '{}'.",
            API_KEY_PREFIX
        ))),
        SettingKey::FlavorId => super::parse_flavor_id(value).map(|_| ()),
        _ => Ok(()),
    }
}
