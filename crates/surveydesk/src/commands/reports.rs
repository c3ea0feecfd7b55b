//! Report command handlers.

use tabled::Tabled;

use surveydesk_core::{Dashboard, EntityId, Report};

use crate::cli::{ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct ReportRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Survey date")]
    survey_date: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl ReportRow {
    pub(super) fn new(r: &Report, color: bool) -> Self {
        Self {
            id: r.id.to_string(),
            title: r.title.clone(),
            status: output::paint_report_status(r.status, color),
            client: r.client_label().unwrap_or_else(|| "-".into()),
            survey_date: r
                .survey_date
                .map_or_else(|| "-".into(), |d| d.to_string()),
            location: output::or_dash(r.location.as_deref()),
        }
    }
}

fn detail(r: &Report) -> String {
    let mut lines = vec![
        format!("ID:          {}", r.id),
        format!("Title:       {}", r.title),
        format!("Status:      {}", r.status),
        format!(
            "Client:      {}",
            r.client_label().unwrap_or_else(|| "-".into())
        ),
        format!("Location:    {}", output::or_dash(r.location.as_deref())),
    ];
    if let Some(date) = r.survey_date {
        lines.push(format!("Survey date: {date}"));
    }
    if let Some(area) = r.area {
        lines.push(format!("Area:        {area:.2}"));
    }
    if let Some(ref notes) = r.notes {
        lines.push(format!("Notes:       {notes}"));
    }
    if let Some(created) = r.created_at {
        lines.push(format!("Created:     {}", created.format("%Y-%m-%d %H:%M")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ReportsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    let pages = dashboard.pages();
    match args.command {
        ReportsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = pages.reports(&query).await;
            let out = output::render_page(
                ctx.format(),
                &page.items,
                |r| ReportRow::new(r, ctx.color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        ReportsCommand::Get { id } => {
            let page = pages
                .report(&EntityId::from(id.as_str()))
                .await
                .into_result("report", &id)?;
            let out = output::render_single(ctx.format(), &page.report, detail, |r| {
                r.id.to_string()
            });
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
