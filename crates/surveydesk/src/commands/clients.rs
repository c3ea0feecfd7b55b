//! Client command handlers.

use serde::Serialize;
use tabled::Tabled;

use surveydesk_core::{Client, CreateClient, Dashboard, EntityId, Report};

use crate::cli::{ClientsArgs, ClientsCommand};
use crate::error::CliError;
use crate::output;

use super::reports::ReportRow;
use super::{CommandContext, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.full_name.clone(),
            email: output::or_dash(c.email.as_deref()),
            phone: output::or_dash(c.phone.as_deref()),
            company: output::or_dash(c.company.as_deref()),
        }
    }
}

fn detail(c: &Client) -> String {
    let mut lines = vec![
        format!("ID:       {}", c.id),
        format!("Name:     {}", c.full_name),
        format!("Email:    {}", output::or_dash(c.email.as_deref())),
        format!("Phone:    {}", output::or_dash(c.phone.as_deref())),
    ];
    if let Some(ref address) = c.address {
        lines.push(format!("Address:  {address}"));
    }
    if let Some(ref company) = c.company {
        lines.push(format!("Company:  {company}"));
    }
    if let Some(created) = c.created_at {
        lines.push(format!("Created:  {}", created.format("%Y-%m-%d")));
    }
    lines.join("\n")
}

/// Structured form of the client detail page.
#[derive(Serialize)]
struct ClientView<'a> {
    client: &'a Client,
    reports: &'a [Report],
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ClientsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = dashboard.pages().clients(&query).await;
            let out = output::render_page(
                ctx.format(),
                &page.items,
                |c| ClientRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        ClientsCommand::Get { id } => {
            let page = dashboard
                .pages()
                .client(&EntityId::from(id.as_str()))
                .await
                .into_result("client", &id)?;
            let view = ClientView {
                client: &page.client,
                reports: &page.reports,
            };
            let out = output::render_single(
                ctx.format(),
                &view,
                |v| {
                    let mut text = detail(v.client);
                    if v.reports.is_empty() {
                        text.push_str("\n\nNo reports yet.");
                    } else {
                        let rows: Vec<ReportRow> = v
                            .reports
                            .iter()
                            .map(|r| ReportRow::new(r, ctx.color))
                            .collect();
                        text.push_str("\n\nReports:\n");
                        text.push_str(&output::render_table(&rows));
                    }
                    text
                },
                |v| v.client.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        ClientsCommand::Create {
            name,
            email,
            phone,
            address,
            company,
        } => {
            if name.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "cannot be empty".into(),
                });
            }
            let request = CreateClient {
                full_name: name.trim().to_owned(),
                email,
                phone,
                address,
                company,
            };
            let created =
                util::expect_success(dashboard.clients().create(&request).await, "create client")?;
            output::print_status(&format!("Client created: {}", created.id), ctx.quiet());
            let out = output::render_single(ctx.format(), &created, detail, |c| c.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
