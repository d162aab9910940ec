//! `flavor search users|projects <QUERY>`
//!
//! Without `--all` one page is fetched and filtered locally. With `--all`
//! the aggregator scans every page, pacing requests to stay under the
//! listing rate limit. Ctrl-C during the scan stops it and the partial
//! results are still shown.

use super::lists::{has_next_page, pagination_footer, projects_table, users_table};
use super::Context;
use crate::api::{FlavortownClient, ResourceListing};
use crate::cli::SearchArgs;
use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::{Record, ResourceKind};
use crate::search::{
    estimate_scan_duration, FixedDelay, NoDelay, PacingPolicy, Query, SearchAggregator,
    SearchResult,
};
use crate::ui::{self, spinner, Prompter, ScanProgress, Table};
use colored::Colorize;
use std::future::Future;
use std::io::{BufRead, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub async fn run(ctx: &Context, kind: ResourceKind, args: &SearchArgs) -> Result<(), AppError> {
    let query = Query::new(&args.query, kind)?;
    let client = ctx.flavortown()?;

    if !args.all {
        return single_page(ctx, &client, &query, args.page).await;
    }

    let mut prompter = Prompter::stdio();
    let result = scan_all(
        &client,
        &query,
        args,
        &ctx.config.search,
        &mut prompter,
        ctx.show_progress,
    )
    .await?;

    if result.matches.is_empty() {
        ui::warning(&no_matches_message(&query));
    } else {
        print!("{}", results_table(&query, &result.matches).render());
    }
    print_summary(&result);
    Ok(())
}

async fn single_page(
    ctx: &Context,
    client: &FlavortownClient,
    query: &Query,
    page: u32,
) -> Result<(), AppError> {
    let pb = spinner(
        &format!("Searching for '{}' (page {})...", query.text(), page),
        ctx.show_progress,
    );
    let response = client.list_resources(query.kind(), page, query.text()).await;
    pb.finish_and_clear();
    let response = response?;

    let matches: Vec<Record> = response
        .records
        .into_iter()
        .filter(|record| query.matches(record))
        .collect();
    debug!(
        "Page {}: matched {:?}",
        page,
        matches.iter().map(Record::id).collect::<Vec<_>>()
    );

    if matches.is_empty() {
        ui::warning(&no_matches_message(query));
    } else {
        print!("{}", results_table(query, &matches).render());
    }

    println!("{}", pagination_footer(&response.pagination, page, "Results"));
    if has_next_page(&response.pagination, page) {
        ui::hint(&format!(
            "Tip: Use 'flavor search {} \"{}\" --page {}' for the next page, or --all to scan every page.",
            query.kind(),
            query.text(),
            page + 1
        ));
    }
    Ok(())
}

/// Run a full scan of `listing`.
///
/// Unless `--yes` is given or `confirm_autoscan` is off, page 1 is fetched
/// first and the user is asked before the remaining pages are scanned.
/// Declining keeps the page 1 result.
async fn scan_all<R: BufRead, W: Write>(
    listing: &dyn ResourceListing,
    query: &Query,
    args: &SearchArgs,
    settings: &SearchConfig,
    prompter: &mut Prompter<R, W>,
    show_progress: bool,
) -> Result<SearchResult, AppError> {
    let progress = ScanProgress::new(show_progress);
    let cancel = CancellationToken::new();
    let aggregator = paced(
        SearchAggregator::new(listing)
            .with_cancellation(cancel.clone())
            .with_observer(progress.clone()),
        scan_delay(args, settings),
    );

    let result = if args.yes || !settings.confirm_autoscan {
        until_ctrl_c(&cancel, aggregator.search(query, true)).await?
    } else {
        let pb = spinner(
            &format!("Searching for '{}' (page 1)...", query.text()),
            show_progress,
        );
        let first = aggregator.first_page(query).await;
        pb.finish_and_clear();
        let first = first?;

        match first.total_pages {
            Some(total_pages) if first.has_more_pages() => {
                if confirm_scan(prompter, aggregator.pacing(), total_pages)? {
                    until_ctrl_c(&cancel, aggregator.scan_remaining(query, first)).await
                } else {
                    info!("Full scan declined");
                    prompter.say(&format!(
                        "{}",
                        "Full scan skipped. Showing page 1 only.".yellow()
                    ))?;
                    first
                }
            }
            _ => first,
        }
    };
    progress.finish();
    Ok(result)
}

/// Delay between page requests. `--delay` overrides the settings file.
fn scan_delay(args: &SearchArgs, settings: &SearchConfig) -> Duration {
    args.delay
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_else(|| settings.rate_limit_delay())
}

/// Attach the pacing policy for `delay`; zero disables pacing.
fn paced(aggregator: SearchAggregator<'_>, delay: Duration) -> SearchAggregator<'_> {
    if delay.is_zero() {
        aggregator.with_pacing(NoDelay)
    } else {
        aggregator.with_pacing(FixedDelay(delay))
    }
}

/// Await `scan`, cancelling `cancel` if Ctrl-C arrives meanwhile.
///
/// The signal is only intercepted for the duration of the scan.
async fn until_ctrl_c<F: Future>(cancel: &CancellationToken, scan: F) -> F::Output {
    let listener = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping scan");
                cancel.cancel();
            }
        })
    };
    let output = scan.await;
    listener.abort();
    output
}

fn confirm_scan<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    pacing: &dyn PacingPolicy,
    total_pages: u32,
) -> Result<bool, AppError> {
    let estimate = estimate_scan_duration(pacing, total_pages);
    let question = format!(
        "Scanning all {} pages will take about {}. Continue?",
        total_pages,
        format_duration(estimate)
    );
    prompter.confirm(&question, true)
}

fn no_matches_message(query: &Query) -> String {
    format!("No {} found matching '{}'.", query.kind(), query.text())
}

/// Matches as a users or projects table, depending on the query kind.
fn results_table(query: &Query, matches: &[Record]) -> Table {
    let title = format!("Search Results for '{}'", query.text());
    match query.kind() {
        ResourceKind::User => users_table(
            &title,
            matches.iter().filter_map(|record| match record {
                Record::User(user) => Some(user),
                Record::Project(_) => None,
            }),
        ),
        ResourceKind::Project => projects_table(
            &title,
            matches.iter().filter_map(|record| match record {
                Record::Project(project) => Some(project),
                Record::User(_) => None,
            }),
        ),
    }
}

fn print_summary(result: &SearchResult) {
    println!("{}", summary_line(result).bold());
    for failure in &result.failures {
        println!(
            "{}",
            format!("Page {} could not be fetched: {}", failure.page, failure.message).yellow()
        );
    }
    if result.cancelled {
        ui::warning("Scan cancelled. Results are partial.");
    }
}

/// "Scanned X of Y pages • N matches • Total Results: Z"
fn summary_line(result: &SearchResult) -> String {
    let mut line = match result.total_pages {
        Some(total) => format!("Scanned {} of {} pages", result.pages_scanned, total),
        None => format!("Scanned {} page(s)", result.pages_scanned),
    };
    line.push_str(&format!(" • {} matches", result.matches.len()));
    if let Some(total_count) = result.total_count {
        line.push_str(&format!(" • Total Results: {}", total_count));
    }
    line
}

/// Human-readable duration, rounded up to whole seconds.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64().ceil() as u64;
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, User};
    use crate::search::testing::FakeListing;
    use crate::search::PageFailure;
    use std::io::Cursor;

    fn user(id: u64, name: &str) -> Record {
        Record::User(User {
            id,
            display_name: Some(name.to_string()),
            slack_id: None,
            cookies: None,
            project_ids: vec![],
        })
    }

    fn three_pages() -> FakeListing {
        FakeListing::default()
            .page(1, vec![user(1, "Ada"), user(2, "Bob")], Some(3))
            .page(2, vec![user(3, "Carol")], Some(3))
            .page(3, vec![user(4, "Adam")], Some(3))
    }

    fn scan_args(yes: bool) -> SearchArgs {
        SearchArgs {
            query: "ada".to_string(),
            page: 1,
            all: true,
            yes,
            delay: Some(0.0),
        }
    }

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn written(prompter: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(prompter.output()).into_owned()
    }

    fn ids(result: &SearchResult) -> Vec<u64> {
        result.matches.iter().map(Record::id).collect()
    }

    async fn scan(
        listing: &FakeListing,
        args: &SearchArgs,
        settings: &SearchConfig,
        prompter: &mut Prompter<Cursor<Vec<u8>>, Vec<u8>>,
    ) -> Result<SearchResult, AppError> {
        let query = Query::new(&args.query, ResourceKind::User).unwrap();
        scan_all(listing, &query, args, settings, prompter, false).await
    }

    #[tokio::test]
    async fn test_scan_all_accepted_continues_after_first_page() {
        let listing = three_pages();
        let mut prompter = prompter("y\n");

        let result = scan(&listing, &scan_args(false), &SearchConfig::default(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(listing.requested(), vec![1, 2, 3]);
        assert_eq!(result.pages_scanned, 3);
        assert_eq!(ids(&result), vec![1, 4]);
        assert!(written(&prompter).contains("Scanning all 3 pages will take about 0s. Continue?"));
    }

    #[tokio::test]
    async fn test_scan_all_declined_keeps_first_page() {
        let listing = three_pages();
        let mut prompter = prompter("n\n");

        let result = scan(&listing, &scan_args(false), &SearchConfig::default(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(listing.requested(), vec![1]);
        assert_eq!(result.pages_scanned, 1);
        assert_eq!(result.total_pages, Some(3));
        assert_eq!(ids(&result), vec![1]);
        assert!(written(&prompter).contains("Full scan skipped. Showing page 1 only."));
    }

    #[tokio::test]
    async fn test_scan_all_with_yes_skips_prompt() {
        let listing = three_pages();
        let mut prompter = prompter("");

        let result = scan(&listing, &scan_args(true), &SearchConfig::default(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(listing.requested(), vec![1, 2, 3]);
        assert_eq!(ids(&result), vec![1, 4]);
        assert!(written(&prompter).is_empty());
    }

    #[tokio::test]
    async fn test_scan_all_without_confirm_setting_skips_prompt() {
        let listing = three_pages();
        let mut prompter = prompter("");
        let settings = SearchConfig {
            confirm_autoscan: false,
            ..SearchConfig::default()
        };

        let result = scan(&listing, &scan_args(false), &settings, &mut prompter)
            .await
            .unwrap();

        assert_eq!(listing.requested(), vec![1, 2, 3]);
        assert_eq!(result.pages_scanned, 3);
        assert!(written(&prompter).is_empty());
    }

    #[tokio::test]
    async fn test_scan_all_single_page_does_not_ask() {
        let listing = FakeListing::default().page(1, vec![user(1, "Ada")], Some(1));
        let mut prompter = prompter("");

        let result = scan(&listing, &scan_args(false), &SearchConfig::default(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(listing.requested(), vec![1]);
        assert_eq!(ids(&result), vec![1]);
        assert!(written(&prompter).is_empty());
    }

    #[tokio::test]
    async fn test_scan_all_first_page_failure_is_error() {
        let listing = FakeListing::default().failing(1, "connection reset");
        let mut prompter = prompter("");

        let result = scan(&listing, &scan_args(false), &SearchConfig::default(), &mut prompter).await;

        assert!(matches!(result, Err(AppError::Search(_))));
        assert_eq!(listing.requested(), vec![1]);
    }

    #[test]
    fn test_zero_delay_disables_pacing() {
        let listing = FakeListing::default();

        let aggregator = paced(SearchAggregator::new(&listing), Duration::ZERO);
        assert_eq!(aggregator.pacing().delay_before(1), Duration::ZERO);

        let aggregator = paced(SearchAggregator::new(&listing), Duration::from_secs(2));
        assert_eq!(aggregator.pacing().delay_before(1), Duration::from_secs(2));
    }

    #[test]
    fn test_scan_delay_prefers_argument() {
        let settings = SearchConfig::default();
        let mut args = scan_args(true);

        args.delay = Some(1.5);
        assert_eq!(scan_delay(&args, &settings), Duration::from_millis(1_500));

        args.delay = None;
        assert_eq!(scan_delay(&args, &settings), Duration::from_millis(12_500));
    }

    fn result() -> SearchResult {
        SearchResult {
            matches: vec![Record::User(User {
                id: 1,
                display_name: Some("Ada".to_string()),
                slack_id: None,
                cookies: Some(4),
                project_ids: vec![],
            })],
            pages_scanned: 3,
            failures: vec![PageFailure {
                page: 2,
                message: "Server error (HTTP 502). Try again later.".to_string(),
            }],
            total_pages: Some(5),
            total_count: Some(100),
            cancelled: true,
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(&result()),
            "Scanned 3 of 5 pages • 1 matches • Total Results: 100"
        );

        let unknown = SearchResult {
            total_pages: None,
            total_count: None,
            ..result()
        };
        assert_eq!(summary_line(&unknown), "Scanned 3 page(s) • 1 matches");
    }

    #[test]
    fn test_results_table_for_users() {
        colored::control::set_override(false);

        let query = Query::new("ada", ResourceKind::User).unwrap();
        let rendered = results_table(&query, &result().matches).render();
        assert!(rendered.contains("Search Results for 'ada'"));
        assert!(rendered.contains("Display Name"));
        assert!(rendered.contains("Ada"));
    }

    #[test]
    fn test_results_table_for_projects() {
        colored::control::set_override(false);

        let query = Query::new("rust", ResourceKind::Project).unwrap();
        let matches = vec![Record::Project(Project {
            id: 9,
            title: Some("Rusty".to_string()),
            ..Project::default()
        })];
        let rendered = results_table(&query, &matches).render();
        assert!(rendered.contains("Repo URL"));
        assert!(rendered.contains("Rusty"));
    }

    #[test]
    fn test_no_matches_message() {
        let query = Query::new("  zed ", ResourceKind::Project).unwrap();
        assert_eq!(no_matches_message(&query), "No projects found matching 'zed'.");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_millis(12_500)), "13s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
