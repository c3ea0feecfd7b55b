//! Survey map command handlers.

use tabled::Tabled;

use surveydesk_core::{CreateMap, Dashboard, EntityId, SurveyMap};

use crate::cli::{MapsArgs, MapsCommand};
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

#[derive(Tabled)]
struct MapRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Points")]
    points: usize,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Client")]
    client: String,
}

impl From<&SurveyMap> for MapRow {
    fn from(m: &SurveyMap) -> Self {
        Self {
            id: m.id.to_string(),
            title: m.title.clone(),
            points: m.coordinates.len(),
            area: m.area.map_or_else(|| "-".into(), |a| format!("{a:.2}")),
            client: m
                .client_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        }
    }
}

fn detail(m: &SurveyMap) -> String {
    let mut lines = vec![
        format!("ID:          {}", m.id),
        format!("Title:       {}", m.title),
        format!("Description: {}", output::or_dash(m.description.as_deref())),
    ];
    if let Some(ref client) = m.client_id {
        lines.push(format!("Client:      {client}"));
    }
    if let Some(area) = m.area {
        lines.push(format!("Area:        {area:.2}"));
    }
    lines.push(format!("Points:      {}", m.coordinates.len()));
    for (i, point) in m.coordinates.iter().enumerate() {
        lines.push(format!("  {:>3}. {:.6}, {:.6}", i + 1, point.lat, point.lng));
    }
    lines.join("\n")
}

pub async fn handle(
    dashboard: &Dashboard,
    args: MapsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match args.command {
        MapsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = dashboard.pages().maps(&query).await;
            let out = output::render_page(
                ctx.format(),
                &page.items,
                |m| MapRow::from(m),
                |m| m.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        MapsCommand::Get { id } => {
            let map = dashboard
                .pages()
                .map(&EntityId::from(id.as_str()))
                .await
                .into_result("map", &id)?;
            let out = output::render_single(ctx.format(), &map, detail, |m| m.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        MapsCommand::Create {
            title,
            description,
            client,
            points,
        } => {
            let coordinates = points
                .iter()
                .map(|p| util::parse_point(p))
                .collect::<Result<Vec<_>, _>>()?;
            if coordinates.len() < 3 {
                return Err(CliError::Validation {
                    field: "point".into(),
                    reason: "a map needs at least 3 points".into(),
                });
            }
            let request = CreateMap {
                title,
                description,
                client_id: util::optional_id(client),
                coordinates,
            };
            let created = util::expect_success(dashboard.maps().create(&request).await, "create map")?;
            output::print_status(&format!("Map created: {}", created.id), ctx.quiet());
            let out = output::render_single(ctx.format(), &created, detail, |m| m.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        MapsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete map {id}? This cannot be undone."),
                "delete map",
                ctx.global.yes,
            )? {
                return Ok(());
            }
            util::expect_success(
                dashboard.maps().delete(&EntityId::from(id.as_str())).await,
                "delete map",
            )?;
            output::print_status(&format!("Map {id} deleted"), ctx.quiet());
            Ok(())
        }
    }
}
