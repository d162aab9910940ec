//! Command handlers.
//!
//! Each handler prints its own output and returns `Err` only for
//! conditions that should end the process with a failure status.

pub mod lists;
pub mod login;
pub mod projects;
pub mod search;
pub mod status;
pub mod times;

use crate::api::{FlavortownClient, HackatimeClient};
use crate::cli::{Command, ListCommand, ProjectsCommand, SearchCommand, TimeCommand};
use crate::config::Config;
use crate::error::AppError;
use crate::models::ResourceKind;
use crate::store::{ConfigStore, SettingKey};
use crate::ui::{self, Prompter};
use std::io::{BufRead, Write};

/// Everything a command needs: settings, credentials, output mode.
pub struct Context {
    pub config: Config,
    pub store: Box<dyn ConfigStore>,
    pub show_progress: bool,
}

impl Context {
    pub fn flavortown(&self) -> Result<FlavortownClient, AppError> {
        FlavortownClient::from_store(self.store.as_ref(), &self.config.api)
    }

    pub fn hackatime(&self) -> Result<HackatimeClient, AppError> {
        HackatimeClient::from_store(self.store.as_ref(), &self.config.api)
    }

    /// The stored Flavortown user ID, asking for (and saving) it if unset.
    pub fn flavor_id<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<u64, AppError> {
        let raw = match self.store.get(SettingKey::FlavorId) {
            Some(id) => id,
            None => {
                ui::warning("You haven't set your Flavortown User ID yet.");
                let id = prompter.ask_required("Please enter your Flavortown User ID")?;
                self.store.set(SettingKey::FlavorId, &id)?;
                ui::success("Flavor ID saved!");
                id
            }
        };

        parse_flavor_id(&raw)
    }
}

/// Parse a stored user ID.
pub fn parse_flavor_id(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::input(format!("Stored Flavor ID is not a valid integer: '{}'", raw)))
}

/// Run one command.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<(), AppError> {
    match command {
        Command::Status => status::run(ctx),
        Command::Login(login) => {
            let mut prompter = Prompter::stdio();
            let message = login::run(login, ctx.store.as_ref(), &mut prompter)?;
            ui::success(&message);
            Ok(())
        }
        Command::List(ListCommand::Shop) => lists::shop(ctx).await,
        Command::List(ListCommand::Users { page }) => lists::users(ctx, page).await,
        Command::List(ListCommand::MyProjects) => lists::my_projects(ctx).await,
        Command::Search(SearchCommand::Users(args)) => {
            search::run(ctx, ResourceKind::User, &args).await
        }
        Command::Search(SearchCommand::Projects(args)) => {
            search::run(ctx, ResourceKind::Project, &args).await
        }
        Command::Projects(ProjectsCommand::Create) => projects::create(ctx).await,
        Command::Projects(ProjectsCommand::Edit { project_id }) => {
            projects::edit(ctx, project_id).await
        }
        Command::Projects(ProjectsCommand::View { project_id }) => {
            projects::view(ctx, project_id).await
        }
        Command::Time(TimeCommand::Today) => times::today(ctx).await,
        Command::Time(TimeCommand::Stats { username }) => times::stats(ctx, username).await,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::context;
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_flavor_id() {
        assert_eq!(parse_flavor_id(" 42 ").unwrap(), 42);
        assert!(matches!(parse_flavor_id("abc"), Err(AppError::Input(_))));
    }

    #[test]
    fn test_flavor_id_uses_stored_value() {
        let ctx = context(&[(SettingKey::FlavorId, "7")]);
        let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(ctx.flavor_id(&mut prompter).unwrap(), 7);
    }

    #[test]
    fn test_flavor_id_prompts_and_saves() {
        let ctx = context(&[]);
        let mut prompter = Prompter::new(Cursor::new(b"123\n".to_vec()), Vec::new());
        assert_eq!(ctx.flavor_id(&mut prompter).unwrap(), 123);
        assert_eq!(ctx.store.get(SettingKey::FlavorId).as_deref(), Some("123"));
    }

    #[test]
    fn test_malformed_stored_id_is_input_error() {
        let ctx = context(&[(SettingKey::FlavorId, "twelve")]);
        let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        assert!(matches!(ctx.flavor_id(&mut prompter), Err(AppError::Input(_))));
    }

    #[test]
    fn test_clients_require_keys() {
        let ctx = context(&[]);
        assert!(matches!(ctx.flavortown(), Err(AppError::MissingSetting { .. })));
        assert!(matches!(ctx.hackatime(), Err(AppError::MissingSetting { .. })));

        let ctx = context(&[(SettingKey::ApiKey, "ft_sk_1"), (SettingKey::HackatimeKey, "h")]);
        assert!(ctx.flavortown().is_ok());
        assert!(ctx.hackatime().is_ok());
    }
}
