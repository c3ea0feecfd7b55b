//! Booking command handlers.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

use surveydesk_core::{
    BlockedDate, Booking, BookingStatus, CalendarPage, CalendarParams, Dashboard, EntityId,
};

use crate::cli::{BookingStatusArg, BookingsArgs, BookingsCommand, MonthArgs};
use crate::error::CliError;
use crate::output;

use super::{CommandContext, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BookingRow {
    fn new(b: &Booking, color: bool) -> Self {
        Self {
            id: b.id.to_string(),
            date: b.date.to_string(),
            slot: output::or_dash(b.time_slot.as_deref()),
            client: b.client_name.clone(),
            service: output::or_dash(b.service_type.as_deref()),
            status: output::paint_booking_status(b.status, color),
        }
    }
}

#[derive(Tabled)]
struct CalendarRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Blocked")]
    blocked: String,
    #[tabled(rename = "Bookings")]
    bookings: String,
}

fn detail(b: &Booking) -> String {
    let mut lines = vec![
        format!("ID:       {}", b.id),
        format!("Client:   {}", b.client_name),
        format!("Date:     {}", b.date),
        format!("Slot:     {}", output::or_dash(b.time_slot.as_deref())),
        format!("Status:   {}", b.status),
        format!("Service:  {}", output::or_dash(b.service_type.as_deref())),
    ];
    if let Some(ref email) = b.email {
        lines.push(format!("Email:    {email}"));
    }
    if let Some(ref phone) = b.phone {
        lines.push(format!("Phone:    {phone}"));
    }
    if let Some(ref location) = b.location {
        lines.push(format!("Location: {location}"));
    }
    if let Some(ref notes) = b.notes {
        lines.push(format!("Notes:    {notes}"));
    }
    lines.join("\n")
}

// ── Calendar ────────────────────────────────────────────────────────

/// Structured form of the calendar page.
#[derive(Serialize)]
struct CalendarView<'a> {
    month: u32,
    year: i32,
    bookings: &'a [Booking],
    blocked: &'a [BlockedDate],
}

pub(super) fn calendar_params(args: &MonthArgs) -> CalendarParams {
    let today = Local::now().date_naive();
    CalendarParams {
        month: args.month.unwrap_or_else(|| today.month()),
        year: args.year.unwrap_or_else(|| today.year()),
    }
}

/// Days of the month that have bookings or are blocked, in order.
fn calendar_rows(page: &CalendarPage, color: bool) -> Vec<CalendarRow> {
    let Some(first) = NaiveDate::from_ymd_opt(page.params.year, page.params.month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| page.params.contains(*d))
        .filter_map(|day| {
            let blocked = page.blocked.iter().find(|b| b.date == day);
            let bookings: Vec<String> = page
                .bookings_on(day)
                .map(|b| {
                    let slot = b.time_slot.as_deref().map_or_else(String::new, |s| format!(" @ {s}"));
                    format!(
                        "{}{slot} [{}]",
                        b.client_name,
                        output::paint_booking_status(b.status, color)
                    )
                })
                .collect();
            if blocked.is_none() && bookings.is_empty() {
                return None;
            }
            Some(CalendarRow {
                date: day.format("%a %d").to_string(),
                blocked: blocked.map_or_else(String::new, |b| {
                    b.reason.clone().unwrap_or_else(|| "yes".into())
                }),
                bookings: bookings.join("\n"),
            })
        })
        .collect()
}

fn render_calendar(page: &CalendarPage, ctx: &CommandContext<'_>) -> String {
    let view = CalendarView {
        month: page.params.month,
        year: page.params.year,
        bookings: &page.bookings,
        blocked: &page.blocked,
    };
    output::render_single(
        ctx.format(),
        &view,
        |_| {
            let title = NaiveDate::from_ymd_opt(page.params.year, page.params.month, 1)
                .map_or_else(String::new, |d| d.format("%B %Y").to_string());
            let rows = calendar_rows(page, ctx.color);
            if rows.is_empty() {
                format!("{title}\n\nNothing booked or blocked.")
            } else {
                format!("{title}\n{}", output::render_table(&rows))
            }
        },
        |v| {
            v.bookings
                .iter()
                .map(|b| b.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

fn status_of(arg: BookingStatusArg) -> BookingStatus {
    match arg {
        BookingStatusArg::Pending => BookingStatus::Pending,
        BookingStatusArg::Confirmed => BookingStatus::Confirmed,
        BookingStatusArg::Completed => BookingStatus::Completed,
        BookingStatusArg::Cancelled => BookingStatus::Cancelled,
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: BookingsArgs,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match args.command {
        BookingsCommand::List(list) => {
            let query = util::list_query(&list, ctx.run.page_size)?;
            let page = dashboard.pages().bookings(&query).await;
            let out = output::render_page(
                ctx.format(),
                &page.items,
                |b| BookingRow::new(b, ctx.color),
                |b| b.id.to_string(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        BookingsCommand::Get { id } => {
            let booking = dashboard
                .pages()
                .booking(&EntityId::from(id.as_str()))
                .await
                .into_result("booking", &id)?;
            let out = output::render_single(ctx.format(), &booking, detail, |b| b.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        BookingsCommand::Calendar(month) => {
            let page = dashboard.pages().calendar_for(calendar_params(&month)).await;
            output::print_output(&render_calendar(&page, ctx), ctx.quiet());
            Ok(())
        }

        BookingsCommand::SetStatus { id, status } => {
            let status = status_of(status);
            if status == BookingStatus::Cancelled
                && !util::confirm(
                    &format!("Cancel booking {id}? The client will be notified."),
                    "cancel booking",
                    ctx.global.yes,
                )?
            {
                return Ok(());
            }
            let updated = util::expect_success(
                dashboard
                    .bookings()
                    .update_status(&EntityId::from(id.as_str()), status)
                    .await,
                "update booking status",
            )?;
            output::print_status(&format!("Booking {id} is now {status}"), ctx.quiet());
            let out = output::render_single(ctx.format(), &updated, detail, |b| b.id.to_string());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
