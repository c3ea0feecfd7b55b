//! Blocked-date command handlers.

use chrono::Datelike;
use tabled::Tabled;

use surveydesk_core::{ApiResponse, BlockedDate, Dashboard};

use crate::cli::{AvailabilityArgs, AvailabilityCommand};
use crate::error::CliError;
use crate::output;

use super::bookings::calendar_params;
use super::{CommandContext, util};

#[derive(Tabled)]
struct BlockedRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&BlockedDate> for BlockedRow {
    fn from(b: &BlockedDate) -> Self {
        Self {
            date: b.date.format("%Y-%m-%d (%a)").to_string(),
            reason: output::or_dash(b.reason.as_deref()),
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: AvailabilityArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    let availability = dashboard.availability();
    match args.command {
        AvailabilityCommand::List(month) => {
            let params = calendar_params(&month);
            let blocked = util::expect_success(
                availability.blocked_dates(params.month, params.year).await,
                "load blocked dates",
            )?;
            let out = output::render_list(
                ctx.format(),
                &blocked,
                |b| BlockedRow::from(b),
                |b| b.date.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        AvailabilityCommand::Toggle { date, reason } => {
            util::expect_success(
                availability.toggle(date, reason).await,
                "toggle blocked date",
            )?;

            // The toggle dropped the cached month, so this read is fresh.
            let now_blocked = availability
                .blocked_dates(date.month(), date.year())
                .await
                .and_then(ApiResponse::into_data)
                .map(|days| days.iter().any(|b| b.date == date));
            let message = match now_blocked {
                Some(true) => format!("{date} is now blocked"),
                Some(false) => format!("{date} is open for bookings"),
                None => format!("{date} toggled"),
            };
            output::print_status(&message, ctx.quiet());
            Ok(())
        }
    }
}
