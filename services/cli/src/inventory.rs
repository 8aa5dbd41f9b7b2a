use crate::infra::{build_service, InMemoryAccountDirectory};
use bto_core::config::AppConfig;
use bto_core::error::AppError;
use bto_core::workflows::housing::SeedImporter;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct InventoryArgs {
    /// Accounts CSV (NRIC,Name,Age,MaritalStatus,Role). Overrides BTO_ACCOUNTS_CSV.
    #[arg(long)]
    pub(crate) accounts: Option<PathBuf>,
    /// Projects CSV. Overrides BTO_PROJECTS_CSV.
    #[arg(long)]
    pub(crate) projects: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_inventory(args: InventoryArgs, config: &AppConfig) -> Result<(), AppError> {
    let accounts = args
        .accounts
        .or_else(|| config.seed.accounts_csv.clone())
        .ok_or(AppError::MissingSeed("BTO_ACCOUNTS_CSV"))?;
    let projects = args
        .projects
        .or_else(|| config.seed.projects_csv.clone())
        .ok_or(AppError::MissingSeed("BTO_PROJECTS_CSV"))?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let snapshot = SeedImporter::from_paths(&accounts, Some(&projects))?;
    info!(
        accounts = snapshot.accounts.len(),
        projects = snapshot.projects.len(),
        "seed data loaded"
    );

    let service = build_service(
        InMemoryAccountDirectory::from_accounts(snapshot.accounts),
        today,
        config.eligibility,
    );
    for seed in snapshot.projects {
        service.create_project(&seed.manager, seed.draft)?;
    }

    println!("{}", serde_json::to_string_pretty(&service.inventory())?);
    Ok(())
}
