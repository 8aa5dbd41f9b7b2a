use crate::infra::{build_service, ConsoleService, InMemoryAccountDirectory};
use bto_core::config::AppConfig;
use bto_core::error::AppError;
use bto_core::workflows::housing::{
    Account, ApplicationId, BookingReportFilter, FlatType, MaritalStatus, ProjectDraft,
    ProjectId, Role, UserId,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use tracing::info;

const MANAGER: &str = "S5678901G";
const OFFICER: &str = "T2109876H";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the scenario date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Only report bookings by applicants with this marital status
    #[arg(long)]
    pub(crate) marital_status: Option<MaritalStatus>,
    /// Only report bookings of this flat type (2-Room or 3-Room)
    #[arg(long)]
    pub(crate) flat_type: Option<FlatType>,
    /// Youngest applicant age to include
    #[arg(long)]
    pub(crate) min_age: Option<u8>,
    /// Oldest applicant age to include
    #[arg(long)]
    pub(crate) max_age: Option<u8>,
    /// Only report bookings in the project with this name
    #[arg(long)]
    pub(crate) project_name: Option<String>,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs {
        today,
        marital_status,
        flat_type,
        min_age,
        max_age,
        project_name,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let directory = InMemoryAccountDirectory::from_accounts(demo_accounts());
    info!(accounts = directory.len(), %today, "starting housing demo");
    let service = build_service(directory, today, config.eligibility);

    let manager = user(MANAGER);
    let officer = user(OFFICER);
    let acacia = ProjectId("ACACIA".to_string());
    service.create_project(&manager, demo_project(&acacia, "Acacia Breeze", "Yishun", today))?;
    service.create_project(
        &manager,
        demo_project(
            &ProjectId("BEDOK".to_string()),
            "Bedok Vista",
            "Bedok",
            today + Duration::days(60),
        ),
    )?;

    let registration = service.register_officer(&officer, &acacia)?;
    service.approve_registration(&manager, &registration.id)?;
    println!("Officer {} now handles {}", officer, acacia);

    let john = apply_and_approve(&service, "S1234567A", &acacia, FlatType::TwoRoom)?;
    let sarah = apply_and_approve(&service, "T7654321B", &acacia, FlatType::ThreeRoom)?;
    let grace = apply_and_approve(&service, "S9876543C", &acacia, FlatType::ThreeRoom)?;

    for id in [&john, &sarah, &grace] {
        match service.book_application(&officer, id) {
            Ok(receipt) => println!(
                "Receipt {}: {} booked a {} flat at {}",
                receipt.receipt_id, receipt.applicant_name, receipt.flat_type, receipt.project_name
            ),
            Err(err) => println!("Booking {} skipped: {}", id, err),
        }
    }

    if service.request_withdrawal(&user("S1234567A"), &john)? {
        let withdrawn = service.process_withdrawal(&manager, &john)?;
        println!("Application {} is now {}", withdrawn.id, withdrawn.status());
    }

    let enquiry =
        service.submit_enquiry(&user("T7654321B"), &acacia, "When is key collection?")?;
    service.reply_enquiry(&officer, &enquiry.id, "Keys are issued from Q3 2028.")?;

    let filter = BookingReportFilter {
        marital_status,
        flat_type,
        min_age,
        max_age,
        project_name,
    };
    let report = service.booking_report(&filter)?;
    println!("Booking report ({} rows)", report.len());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn apply_and_approve(
    service: &ConsoleService,
    applicant: &str,
    project: &ProjectId,
    flat_type: FlatType,
) -> Result<ApplicationId, AppError> {
    let application = service.create_application(&user(applicant), project, flat_type)?;
    let decided = service.approve_application(&user(MANAGER), &application.id)?;
    println!(
        "Application {} by {} for {} -> {}",
        decided.id,
        decided.applicant,
        decided.flat_type,
        decided.status()
    );
    Ok(decided.id)
}

fn demo_project(id: &ProjectId, name: &str, neighborhood: &str, anchor: NaiveDate) -> ProjectDraft {
    ProjectDraft {
        id: id.clone(),
        name: name.to_string(),
        neighborhood: neighborhood.to_string(),
        two_room_units: 2,
        three_room_units: 1,
        opening_date: anchor - Duration::days(7),
        closing_date: anchor + Duration::days(30),
        officer_slots: 2,
        visible: true,
    }
}

fn demo_accounts() -> Vec<Account> {
    [
        ("S1234567A", "John", 35, MaritalStatus::Single, Role::Applicant),
        ("T7654321B", "Sarah", 40, MaritalStatus::Married, Role::Applicant),
        ("S9876543C", "Grace", 37, MaritalStatus::Married, Role::Applicant),
        (OFFICER, "Daniel", 36, MaritalStatus::Single, Role::Officer),
        (MANAGER, "Jessica", 26, MaritalStatus::Married, Role::Manager),
    ]
    .into_iter()
    .map(|(id, name, age, marital_status, role)| Account {
        id: user(id),
        name: name.to_string(),
        age,
        marital_status,
        role,
    })
    .collect()
}

fn user(id: &str) -> UserId {
    UserId(id.to_string())
}
