//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use surveydesk_core::{BookingStatus, Paginated, ReportStatus};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ───────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

pub fn paint_booking_status(status: BookingStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        BookingStatus::Pending => label.yellow().to_string(),
        BookingStatus::Confirmed => label.green().to_string(),
        BookingStatus::Completed => label.cyan().to_string(),
        BookingStatus::Cancelled => label.red().to_string(),
    }
}

pub fn paint_report_status(status: ReportStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        ReportStatus::Draft => label.dimmed().to_string(),
        ReportStatus::InProgress => label.yellow().to_string(),
        ReportStatus::Completed => label.green().to_string(),
        ReportStatus::Delivered => label.cyan().to_string(),
        ReportStatus::Unknown => label,
    }
}

// ── Render dispatchers ──────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via `serde_yaml`
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one page of a paginated list.
///
/// Structured formats keep the page envelope so scripts can follow
/// `page`/`total`; the table gets a one-line footer instead.
pub fn render_page<T, R>(
    format: &OutputFormat,
    page: &Paginated<T>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            if page.is_empty() {
                return "No results.".into();
            }
            let rows: Vec<R> = page.items.iter().map(to_row).collect();
            format!("{}\n{}", render_table(&rows), page_footer(page))
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => page.items.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

fn page_footer<T>(page: &Paginated<T>) -> String {
    let mut footer = format!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages().max(1),
        page.total
    );
    if page.has_next() {
        footer.push_str(&format!(" -- next: --page {}", page.page + 1));
    }
    footer
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Status line on stderr, suppressed by `--quiet`.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ───────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

/// `-` for missing optional values in tables.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: String,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn page(total: u64) -> Paginated<Item> {
        Paginated {
            items: vec![
                Item { id: "a".into() },
                Item { id: "b".into() },
            ],
            page: 1,
            page_size: 2,
            total,
        }
    }

    fn row(item: &Item) -> ItemRow {
        ItemRow {
            id: item.id.clone(),
        }
    }

    #[test]
    fn table_page_has_footer_with_next_hint() {
        let out = render_page(&OutputFormat::Table, &page(5), row, |i| i.id.clone());
        assert!(out.contains("Page 1 of 3 (5 total)"));
        assert!(out.contains("--page 2"));
    }

    #[test]
    fn last_page_has_no_next_hint() {
        let out = render_page(&OutputFormat::Table, &page(2), row, |i| i.id.clone());
        assert!(out.contains("Page 1 of 1"));
        assert!(!out.contains("next"));
    }

    #[test]
    fn json_page_keeps_envelope() {
        let out = render_page(&OutputFormat::JsonCompact, &page(5), row, |i| i.id.clone());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total"], 5);
        assert_eq!(value["items"][1]["id"], "b");
    }

    #[test]
    fn plain_lists_ids() {
        let out = render_page(&OutputFormat::Plain, &page(2), row, |i| i.id.clone());
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn uncolored_status_is_plain_label() {
        assert_eq!(paint_booking_status(BookingStatus::Confirmed, false), "confirmed");
        assert_eq!(paint_report_status(ReportStatus::InProgress, false), "in-progress");
    }
}
