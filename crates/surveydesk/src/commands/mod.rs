//! Command dispatch: bridges CLI args -> dashboard pages and services ->
//! output formatting.

pub mod availability;
pub mod bookings;
pub mod calculations;
pub mod clients;
pub mod config_cmd;
pub mod maps;
pub mod notifications;
pub mod profile;
pub mod reports;
pub mod util;

use surveydesk_core::Dashboard;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::RunContext;
use crate::error::CliError;
use crate::output;

/// Everything a handler needs besides the dashboard itself.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub global: &'a GlobalOpts,
    pub run: RunContext,
    pub color: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(global: &'a GlobalOpts, run: RunContext) -> Self {
        Self {
            color: output::should_color(&global.color),
            global,
            run,
        }
    }

    pub fn format(&self) -> &OutputFormat {
        &self.global.output
    }

    pub fn quiet(&self) -> bool {
        self.global.quiet
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    ctx: &CommandContext<'_>,
) -> Result<(), CliError> {
    match cmd {
        Command::Reports(args) => reports::handle(dashboard, args, ctx).await,
        Command::Clients(args) => clients::handle(dashboard, args, ctx).await,
        Command::Bookings(args) => bookings::handle(dashboard, args, ctx).await,
        Command::Availability(args) => availability::handle(dashboard, args, ctx).await,
        Command::Maps(args) => maps::handle(dashboard, args, ctx).await,
        Command::Calculations(args) => calculations::handle(dashboard, args, ctx).await,
        Command::Notifications(args) => notifications::handle(dashboard, args, ctx).await,
        Command::Profile(args) => profile::handle(dashboard, args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
