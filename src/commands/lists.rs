//! `flavor list ...`: shop, users, and your own projects.

use super::Context;
use crate::error::AppError;
use crate::models::{Pagination, Project, ShopItem, User};
use crate::ui::{self, spinner, truncate, Align, Prompter, Table};
use colored::{Color, Colorize};
use tracing::warn;

pub async fn shop(ctx: &Context) -> Result<(), AppError> {
    let client = ctx.flavortown()?;

    let pb = spinner("Fetching shop items...", ctx.show_progress);
    let items = client.get_shop().await;
    pb.finish_and_clear();
    let mut items = items?;

    if items.is_empty() {
        ui::warning("No items found in the shop.");
        return Ok(());
    }

    items.sort_by_key(|item| item.id);
    print!("{}", shop_table(&items).render());
    Ok(())
}

fn shop_table(items: &[ShopItem]) -> Table {
    let mut table = Table::titled("Flavortown Shop")
        .column("ID", Align::Right, Some(Color::Cyan))
        .column("Name", Align::Left, Some(Color::Magenta))
        .column("Cost", Align::Right, Some(Color::Green))
        .column("Stock", Align::Right, Some(Color::Yellow))
        .column("Limited", Align::Center, Some(Color::Red));

    for item in items {
        let cost = item
            .ticket_cost
            .as_ref()
            .and_then(|cost| cost.base_cost.as_ref())
            .map(|cost| match cost {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "N/A".to_string());
        let stock = item
            .stock
            .map(|stock| stock.to_string())
            .unwrap_or_else(|| "∞".to_string());
        let limited = if item.limited.unwrap_or(false) { "Yes" } else { "No" };

        table.add_row([
            item.id.to_string(),
            item.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            cost,
            stock,
            limited.to_string(),
        ]);
    }

    table
}

pub async fn users(ctx: &Context, page: u32) -> Result<(), AppError> {
    let client = ctx.flavortown()?;

    let pb = spinner(&format!("Fetching users (page {})...", page), ctx.show_progress);
    let response = client.list_users(page, None).await;
    pb.finish_and_clear();
    let response = response?;

    if response.users.is_empty() {
        ui::warning("No users found on this page.");
        return Ok(());
    }

    print!("{}", users_table("Flavortown Users", &response.users).render());
    println!("{}", pagination_footer(&response.pagination, page, "Users"));
    if has_next_page(&response.pagination, page) {
        ui::hint(&format!(
            "Tip: Use 'flavor list users --page {}' to see the next page.",
            page + 1
        ));
    }
    Ok(())
}

/// Users as a table: ID, display name, Slack ID, cookies.
pub(crate) fn users_table<'a>(title: &str, users: impl IntoIterator<Item = &'a User>) -> Table {
    let mut table = Table::titled(title)
        .column("ID", Align::Right, Some(Color::Cyan))
        .column("Display Name", Align::Left, Some(Color::Magenta))
        .column("Slack ID", Align::Left, Some(Color::Green))
        .column("Cookies", Align::Right, Some(Color::Yellow));

    for user in users {
        table.add_row([
            user.id.to_string(),
            user.display_name.clone().unwrap_or_else(|| "Unknown".to_string()),
            user.slack_id.clone().unwrap_or_else(|| "N/A".to_string()),
            user.cookies.unwrap_or(0).to_string(),
        ]);
    }

    table
}

/// Projects as a table: ID, title, shortened description, repo URL.
pub(crate) fn projects_table<'a>(
    title: &str,
    projects: impl IntoIterator<Item = &'a Project>,
) -> Table {
    let mut table = Table::titled(title)
        .column("ID", Align::Right, Some(Color::Cyan))
        .column("Title", Align::Left, Some(Color::Magenta))
        .column("Description", Align::Left, None)
        .column("Repo URL", Align::Left, Some(Color::Blue));

    for project in projects {
        table.add_row([
            project.id.to_string(),
            project.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            truncate(project.description.as_deref().unwrap_or("-"), 50),
            project.repo_url.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    table
}

/// "Page X of Y • Total <label>: Z", omitting unknown parts.
pub(crate) fn pagination_footer(pagination: &Pagination, requested_page: u32, label: &str) -> String {
    let current = pagination.current_page.unwrap_or(requested_page);
    let mut footer = format!("{}", format!("Page {}", current).bold());
    if let Some(total_pages) = pagination.total_pages {
        footer.push_str(&format!(" of {}", total_pages));
    }
    if let Some(total_count) = pagination.total_count {
        footer.push_str(&format!(" • Total {}: {}", label, total_count));
    }
    footer
}

pub(crate) fn has_next_page(pagination: &Pagination, requested_page: u32) -> bool {
    let current = pagination.current_page.unwrap_or(requested_page);
    matches!(pagination.total_pages, Some(total) if current < total)
}

pub async fn my_projects(ctx: &Context) -> Result<(), AppError> {
    let client = ctx.flavortown()?;
    let flavor_id = ctx.flavor_id(&mut Prompter::stdio())?;

    let pb = spinner("Fetching your profile...", ctx.show_progress);
    let user = client.get_user(flavor_id).await;
    pb.finish_and_clear();
    let user = user?;

    if user.project_ids.is_empty() {
        ui::warning("You have no projects linked to your profile.");
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} projects. Fetching details...", user.project_ids.len()).cyan()
    );

    let mut projects = Vec::new();
    let pb = spinner("Fetching project details...", ctx.show_progress);
    for project_id in &user.project_ids {
        match client.get_project(*project_id).await {
            Ok(project) => projects.push(project),
            Err(e) => {
                warn!("Project {} fetch failed: {}", project_id, e);
                pb.println(format!(
                    "{}",
                    format!("Failed to fetch project {}: {}", project_id, e).red()
                ));
            }
        }
    }
    pb.finish_and_clear();

    if projects.is_empty() {
        ui::error("No project details could be retrieved.");
        return Ok(());
    }

    print!("{}", projects_table("Your Projects", &projects).render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketCost;

    #[test]
    fn test_shop_table_fallbacks() {
        colored::control::set_override(false);

        let items = vec![
            ShopItem {
                id: 2,
                name: None,
                ticket_cost: None,
                stock: None,
                limited: None,
            },
            ShopItem {
                id: 1,
                name: Some("Sticker".to_string()),
                ticket_cost: Some(TicketCost {
                    base_cost: Some(serde_json::json!(25)),
                }),
                stock: Some(3),
                limited: Some(true),
            },
        ];

        let rendered = shop_table(&items).render();
        assert!(rendered.contains("Unknown"));
        assert!(rendered.contains("N/A"));
        assert!(rendered.contains("∞"));
        assert!(rendered.contains("Sticker"));
        assert!(rendered.contains("25"));
        assert!(rendered.contains("Yes"));
    }

    #[test]
    fn test_pagination_footer() {
        colored::control::set_override(false);

        let full = Pagination {
            current_page: Some(2),
            total_pages: Some(9),
            total_count: Some(180),
        };
        assert_eq!(pagination_footer(&full, 2, "Users"), "Page 2 of 9 • Total Users: 180");

        let empty = Pagination::default();
        assert_eq!(pagination_footer(&empty, 3, "Users"), "Page 3");
    }

    #[test]
    fn test_has_next_page() {
        let pagination = Pagination {
            current_page: Some(2),
            total_pages: Some(3),
            total_count: None,
        };
        assert!(has_next_page(&pagination, 2));

        let last = Pagination {
            current_page: Some(3),
            ..pagination
        };
        assert!(!has_next_page(&last, 3));
        assert!(!has_next_page(&Pagination::default(), 1));
    }

    #[test]
    fn test_projects_table_truncates_description() {
        colored::control::set_override(false);

        let project = Project {
            id: 1,
            title: Some("Long".to_string()),
            description: Some("d".repeat(80)),
            ..Project::default()
        };
        let rendered = projects_table("Your Projects", [&project]).render();
        assert!(rendered.contains(&format!("{}...", "d".repeat(47))));
        assert!(!rendered.contains(&"d".repeat(48)));
    }

    #[test]
    fn test_projects_table_keeps_multiline_description_on_one_row() {
        colored::control::set_override(false);

        let project = Project {
            id: 3,
            title: Some("Notes".to_string()),
            description: Some("line one\nline two\r\n\n  line three".to_string()),
            repo_url: Some("https://example.com/notes".to_string()),
            ..Project::default()
        };
        let rendered = projects_table("Your Projects", [&project]).render();

        let row = rendered
            .lines()
            .find(|line| line.contains("Notes"))
            .unwrap();
        assert!(row.contains("line one line two line three"));
        assert!(row.contains("https://example.com/notes"));
        assert!(!rendered.lines().any(|line| line.trim_start().starts_with("line two")));
    }
}
