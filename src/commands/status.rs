//! `flavor status`

use super::Context;
use crate::error::AppError;
use crate::store::{ConfigStore, SettingKey};
use crate::ui::{self, Align, Table};
use colored::Color;

pub fn run(ctx: &Context) -> Result<(), AppError> {
    ui::success("FlavorLineTool is alive!!!");
    println!();
    print!("{}", settings_table(ctx.store.as_ref()).render());
    Ok(())
}

/// Which settings are present. Secrets are masked.
fn settings_table(store: &dyn ConfigStore) -> Table {
    let mut table = Table::titled("Local Settings")
        .column("Setting", Align::Left, Some(Color::Cyan))
        .column("Value", Align::Left, None);

    for key in SettingKey::ALL {
        let value = match store.get(key) {
            Some(_) if key.is_secret() => "set".to_string(),
            Some(value) => value,
            None => "not set".to_string(),
        };
        table.add_row([key.as_str().to_string(), value]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_secrets_masked() {
        colored::control::set_override(false);

        let store = MemoryStore::with(&[
            (SettingKey::ApiKey, "ft_sk_secret"),
            (SettingKey::HackatimeUsername, "ada"),
        ]);
        let rendered = settings_table(&store).render();

        assert!(!rendered.contains("ft_sk_secret"));
        assert!(rendered.contains("api_key            │ set"));
        assert!(rendered.contains("hackatime_username │ ada"));
        assert!(rendered.contains("flavor_id          │ not set"));
    }
}
