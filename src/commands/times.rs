//! `flavor time today|stats`

use super::Context;
use crate::error::AppError;
use crate::models::{StatsData, TodayStatus};
use crate::store::SettingKey;
use crate::ui::{render_panel, spinner, Align, Table};
use colored::{Color, Colorize};

const TOP_LANGUAGES: usize = 10;

pub async fn today(ctx: &Context) -> Result<(), AppError> {
    let client = ctx.hackatime()?;

    let pb = spinner("Fetching your coding time...", ctx.show_progress);
    let status = client.time_today().await;
    pb.finish_and_clear();

    println!("{}", today_message(&status?));
    Ok(())
}

fn today_message(status: &TodayStatus) -> String {
    format!(
        "{} {} {}",
        "You have coded for".green(),
        status.text().bold().cyan(),
        "today!".green()
    )
}

pub async fn stats(ctx: &Context, username: Option<String>) -> Result<(), AppError> {
    let client = ctx.hackatime()?;
    let username = match username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        Some(username) => username,
        None => ctx.store.require(
            SettingKey::HackatimeUsername,
            "No Hackatime username set. Run 'flavor login hackatime-user <name>' first.",
        )?,
    };

    let pb = spinner(&format!("Fetching stats for {}...", username), ctx.show_progress);
    let stats = client.stats(&username).await;
    pb.finish_and_clear();
    let stats = stats?;

    print!("{}", stats_panel(&stats.data, &username));
    if !stats.data.languages.is_empty() {
        println!();
        print!("{}", languages_table(&stats.data).render());
    }
    Ok(())
}

fn stats_panel(data: &StatsData, username: &str) -> String {
    let shown_name = data.username.as_deref().unwrap_or(username);
    render_panel(
        &format!("Hackatime Stats for {}", shown_name),
        &[
            (
                "Total",
                data.human_readable_total.clone().unwrap_or_else(|| "-".to_string()),
            ),
            (
                "Daily Average",
                data.human_readable_daily_average
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ],
    )
}

/// The most used languages, as reported (already sorted upstream).
fn languages_table(data: &StatsData) -> Table {
    let mut table = Table::titled("Top Languages")
        .column("Language", Align::Left, Some(Color::Magenta))
        .column("Time", Align::Right, Some(Color::Cyan))
        .column("Share", Align::Right, Some(Color::Green));

    for language in data.languages.iter().take(TOP_LANGUAGES) {
        table.add_row([
            language.name.clone(),
            language.text.clone().unwrap_or_else(|| "-".to_string()),
            language
                .percent
                .map(|percent| format!("{:.1}%", percent))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    table
}
