//! Notification command handlers.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use surveydesk_core::{Dashboard, EntityId, Notification, Paginated};

use crate::cli::{NotificationsArgs, NotificationsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "When")]
    when: String,
}

impl NotificationRow {
    fn new(n: &Notification, color: bool) -> Self {
        let marker = if n.read { "" } else { "●" };
        Self {
            id: n.id.to_string(),
            unread: if color {
                marker.yellow().to_string()
            } else {
                marker.to_owned()
            },
            title: n.title.clone(),
            message: truncate(&n.message, 60),
            when: n
                .created_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Structured form of the notifications page.
#[derive(Serialize)]
struct NotificationsView<'a> {
    unread: u64,
    #[serde(flatten)]
    page: &'a Paginated<Notification>,
}

pub async fn handle(
    dashboard: &Dashboard,
    args: NotificationsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    let notifications = dashboard.notifications();
    match args.command {
        NotificationsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = dashboard.pages().notifications(&query).await;
            let view = NotificationsView {
                unread: page.unread,
                page: &page.list.items,
            };
            let rows = || {
                output::render_page(
                    ctx.format(),
                    &page.list.items,
                    |n| NotificationRow::new(n, ctx.color),
                    |n| n.id.to_string(),
                )
            };
            let out = match ctx.format() {
                OutputFormat::Table => format!("{} unread\n{}", page.unread, rows()),
                OutputFormat::Plain => rows(),
                format => output::render_single(format, &view, |_| String::new(), |_| String::new()),
            };
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        NotificationsCommand::Read { id } => {
            util::expect_success(
                notifications.mark_read(&EntityId::from(id.as_str())).await,
                "mark notification read",
            )?;
            output::print_status(&format!("Notification {id} marked read"), ctx.quiet());
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            util::expect_success(
                notifications.mark_all_read().await,
                "mark notifications read",
            )?;
            output::print_status("All notifications marked read", ctx.quiet());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_messages_are_truncated_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ñandú ñandú", 6), "ñandú…");
    }
}
