use crate::demo::{run_demo, DemoArgs};
use crate::inventory::{run_inventory, InventoryArgs};
use bto_core::config::AppConfig;
use bto_core::error::AppError;
use bto_core::telemetry;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "BTO Housing Console",
    about = "Exercise the BTO flat application lifecycle from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an end-to-end scenario and print the booking report (default command)
    Demo(DemoArgs),
    /// Load seed CSVs and print per-project unit and officer-slot counts
    Inventory(InventoryArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()))
    {
        Command::Demo(args) => run_demo(args, &config),
        Command::Inventory(args) => run_inventory(args, &config),
    }
}
