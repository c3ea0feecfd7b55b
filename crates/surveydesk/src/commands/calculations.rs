//! Area calculation command handlers.

use std::collections::HashMap;

use tabled::Tabled;

use surveydesk_core::{Calculation, Client, CreateCalculation, Dashboard, EntityId};

use crate::cli::{CalculationsArgs, CalculationsCommand};
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

#[derive(Tabled)]
struct CalculationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Sides")]
    sides: usize,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Client")]
    client: String,
}

/// Client names from the picker, keyed by id.
fn client_names(clients: &[Client]) -> HashMap<&str, &str> {
    clients
        .iter()
        .map(|c| (c.id.as_str(), c.full_name.as_str()))
        .collect()
}

fn client_label(calc: &Calculation, names: &HashMap<&str, &str>) -> String {
    calc.client_id.as_ref().map_or_else(
        || "-".into(),
        |id| {
            names
                .get(id.as_str())
                .map_or_else(|| id.to_string(), |name| (*name).to_owned())
        },
    )
}

fn area_label(calc: &Calculation) -> String {
    match (calc.area, calc.unit.as_deref()) {
        (Some(area), Some(unit)) => format!("{area:.2} {unit}²"),
        (Some(area), None) => format!("{area:.2}"),
        (None, _) => "-".into(),
    }
}

fn detail(calc: &Calculation, names: &HashMap<&str, &str>) -> String {
    let sides = calc
        .sides
        .iter()
        .map(|s| format!("{s}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut lines = vec![
        format!("ID:      {}", calc.id),
        format!("Title:   {}", calc.title),
        format!("Client:  {}", client_label(calc, names)),
        format!("Sides:   {sides}"),
        format!("Area:    {}", area_label(calc)),
    ];
    if let Some(ref notes) = calc.notes {
        lines.push(format!("Notes:   {notes}"));
    }
    lines.join("\n")
}

pub async fn handle(
    dashboard: &Dashboard,
    args: CalculationsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match args.command {
        CalculationsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = dashboard.pages().calculations(&query).await;
            let names = client_names(&page.clients);
            let out = output::render_page(
                ctx.format(),
                &page.list.items,
                |c| CalculationRow {
                    id: c.id.to_string(),
                    title: c.title.clone(),
                    sides: c.sides.len(),
                    area: area_label(c),
                    client: client_label(c, &names),
                },
                |c| c.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        CalculationsCommand::Get { id } => {
            let page = dashboard
                .pages()
                .calculation(&EntityId::from(id.as_str()))
                .await
                .into_result("calculation", &id)?;
            let names = client_names(&page.clients);
            let out = output::render_single(
                ctx.format(),
                &page.calculation,
                |c| detail(c, &names),
                |c| c.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        CalculationsCommand::Create {
            title,
            client,
            sides,
            unit,
            notes,
        } => {
            if sides.len() < 3 {
                return Err(CliError::Validation {
                    field: "side".into(),
                    reason: "a calculation needs at least 3 sides".into(),
                });
            }
            if let Some(bad) = sides.iter().find(|s| !s.is_finite() || **s <= 0.0) {
                return Err(CliError::Validation {
                    field: "side".into(),
                    reason: format!("side lengths must be positive, got {bad}"),
                });
            }
            let request = CreateCalculation {
                title,
                client_id: util::optional_id(client),
                sides,
                unit,
                notes,
            };
            let created = util::expect_success(
                dashboard.calculations().create(&request).await,
                "create calculation",
            )?;
            output::print_status(&format!("Calculation saved: {}", created.id), ctx.quiet());
            let names = HashMap::new();
            let out = output::render_single(
                ctx.format(),
                &created,
                |c| detail(c, &names),
                |c| c.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        CalculationsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete calculation {id}? This cannot be undone."),
                "delete calculation",
                ctx.global.yes,
            )? {
                return Ok(());
            }
            util::expect_success(
                dashboard
                    .calculations()
                    .delete(&EntityId::from(id.as_str()))
                    .await,
                "delete calculation",
            )?;
            output::print_status(&format!("Calculation {id} deleted"), ctx.quiet());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn calc(client_id: Option<&str>, area: Option<f64>, unit: Option<&str>) -> Calculation {
        serde_json::from_value(serde_json::json!({
            "id": "k1",
            "title": "Plot 7",
            "clientId": client_id,
            "sides": [10.0, 20.0, 10.0, 20.0],
            "area": area,
            "unit": unit,
        }))
        .unwrap()
    }

    #[test]
    fn client_label_prefers_picker_name() {
        let clients: Vec<Client> = serde_json::from_value(serde_json::json!([
            { "id": "c1", "fullName": "Amina Otieno" }
        ]))
        .unwrap();
        let names = client_names(&clients);
        assert_eq!(client_label(&calc(Some("c1"), None, None), &names), "Amina Otieno");
        assert_eq!(client_label(&calc(Some("c2"), None, None), &names), "c2");
        assert_eq!(client_label(&calc(None, None, None), &names), "-");
    }

    #[test]
    fn area_label_carries_unit() {
        assert_eq!(area_label(&calc(None, Some(200.0), Some("m"))), "200.00 m²");
        assert_eq!(area_label(&calc(None, Some(1.5), None)), "1.50");
        assert_eq!(area_label(&calc(None, None, Some("m"))), "-");
    }
}
