use super::common::*;
use crate::workflows::housing::domain::FlatType;
use crate::workflows::housing::{
    ApplicationStatus, AuthorizationError, EligibilityError, HousingServiceError, NotFound,
    StateError,
};

#[test]
fn new_application_starts_pending_and_holds_no_unit() {
    let service = seeded_service(2, 3);

    let application = service
        .create_application(&user(MARRIED_APPLICANT), &project_id(PROJECT), FlatType::ThreeRoom)
        .expect("eligible applicant applies");

    assert_eq!(application.status(), ApplicationStatus::Pending);
    assert_eq!(application.applied_on, today());
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::ThreeRoom), 3);
    assert_eq!(project.applications(), &[application.id.clone()]);
}

#[test]
fn second_active_application_is_refused() {
    let service = seeded_service(2, 3);
    let first = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);

    match service.create_application(
        &user(MARRIED_APPLICANT),
        &project_id(PROJECT),
        FlatType::ThreeRoom,
    ) {
        Err(HousingServiceError::State(StateError::ActiveApplication { existing, .. })) => {
            assert_eq!(existing, first);
        }
        other => panic!("expected active application error, got {other:?}"),
    }
}

#[test]
fn ineligible_applicant_is_refused() {
    let service = seeded_service(2, 3);

    assert!(matches!(
        service.create_application(&user(YOUNG_SINGLE), &project_id(PROJECT), FlatType::TwoRoom),
        Err(HousingServiceError::Eligibility(EligibilityError::UnderAge { .. }))
    ));
    assert!(matches!(
        service.create_application(&user(MANAGER), &project_id(PROJECT), FlatType::TwoRoom),
        Err(HousingServiceError::Eligibility(EligibilityError::RoleCannotApply(_)))
    ));
    assert!(service.application_for(&user(YOUNG_SINGLE)).is_none());
}

#[test]
fn unknown_applicant_and_project_are_not_found() {
    let service = seeded_service(2, 3);

    assert!(matches!(
        service.create_application(&user("S0000000Z"), &project_id(PROJECT), FlatType::TwoRoom),
        Err(HousingServiceError::NotFound(NotFound::Account(_)))
    ));
    assert!(matches!(
        service.create_application(
            &user(MARRIED_APPLICANT),
            &project_id("NOWHERE"),
            FlatType::TwoRoom
        ),
        Err(HousingServiceError::NotFound(NotFound::Project(_)))
    ));
}

#[test]
fn approval_reserves_a_unit() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::ThreeRoom);

    let approved = service
        .approve_application(&user(MANAGER), &id)
        .expect("manager approves");

    assert_eq!(approved.status(), ApplicationStatus::Successful);
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::ThreeRoom), 2);
    assert_eq!(project.units_available(FlatType::TwoRoom), 2);
}

#[test]
fn approval_when_sold_out_marks_unsuccessful_without_error() {
    let service = seeded_service(1, 0);
    let first = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    let second = apply(&service, SECOND_MARRIED_APPLICANT, FlatType::TwoRoom);

    service
        .approve_application(&user(MANAGER), &first)
        .expect("first approval");
    let outcome = service
        .approve_application(&user(MANAGER), &second)
        .expect("sold out is not an error");

    assert_eq!(outcome.status(), ApplicationStatus::Unsuccessful);
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 0);
}

#[test]
fn only_the_project_manager_decides() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);

    assert!(matches!(
        service.approve_application(&user(OTHER_MANAGER), &id),
        Err(HousingServiceError::Authorization(
            AuthorizationError::NotProjectManager { .. }
        ))
    ));
    assert_eq!(
        service.application(&id).expect("exists").status(),
        ApplicationStatus::Pending
    );
}

#[test]
fn rejection_is_only_legal_from_pending() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");

    assert!(matches!(
        service.reject_application(&user(MANAGER), &id),
        Err(HousingServiceError::State(StateError::Application {
            action: "reject",
            status: ApplicationStatus::Successful,
            ..
        }))
    ));
}

#[test]
fn unsuccessful_application_still_blocks_until_withdrawn() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    service
        .reject_application(&user(MANAGER), &id)
        .expect("reject");

    assert!(service
        .create_application(&user(MARRIED_APPLICANT), &project_id(PROJECT), FlatType::ThreeRoom)
        .is_err());

    assert!(service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("owner requests"));
    service
        .process_withdrawal(&user(MANAGER), &id)
        .expect("manager withdraws");
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 2);

    let retry = service
        .create_application(&user(MARRIED_APPLICANT), &project_id(PROJECT), FlatType::ThreeRoom)
        .expect("may reapply after withdrawal");
    assert_ne!(retry.id, id);
    assert_eq!(
        service.application_for(&user(MARRIED_APPLICANT)).map(|a| a.id),
        Some(retry.id)
    );
}

#[test]
fn approved_officer_books_and_issues_receipt() {
    let service = seeded_service(2, 3);
    approved_officer(&service);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::ThreeRoom);
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");

    let receipt = service
        .book_application(&user(OFFICER), &id)
        .expect("officer books");

    assert_eq!(receipt.application_id, id);
    assert_eq!(receipt.applicant_name, "Sarah");
    assert_eq!(receipt.applicant_age, 40);
    assert_eq!(receipt.flat_type, FlatType::ThreeRoom);
    assert_eq!(receipt.project_name, "ACACIA Residences");
    assert_eq!(receipt.issued_by, user(OFFICER));
    assert_eq!(receipt.booked_on, today());
    assert_eq!(
        service.application(&id).expect("exists").status(),
        ApplicationStatus::Booked
    );
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::ThreeRoom), 2);
}

#[test]
fn booking_requires_staff_and_successful_status() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::ThreeRoom);

    assert!(matches!(
        service.book_application(&user(SECOND_OFFICER), &id),
        Err(HousingServiceError::Authorization(
            AuthorizationError::NotProjectStaff { .. }
        ))
    ));
    assert!(matches!(
        service.book_application(&user(MANAGER), &id),
        Err(HousingServiceError::State(StateError::Application {
            action: "book",
            status: ApplicationStatus::Pending,
            ..
        }))
    ));
}

#[test]
fn failed_booking_leaves_no_gap_in_receipt_numbers() {
    let service = seeded_service(2, 3);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::ThreeRoom);

    assert!(service.book_application(&user(MANAGER), &id).is_err());
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");
    let receipt = service
        .book_application(&user(MANAGER), &id)
        .expect("manager books");

    assert_eq!(id.0, "APP-000001");
    assert_eq!(receipt.receipt_id, "RCT-000002");
}

#[test]
fn withdrawing_a_booked_flat_returns_the_unit() {
    let service = seeded_service(1, 0);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");
    service
        .book_application(&user(MANAGER), &id)
        .expect("manager books");

    assert!(service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("request"));
    assert_eq!(service.pending_withdrawals(&user(MANAGER)).len(), 1);
    let withdrawn = service
        .process_withdrawal(&user(MANAGER), &id)
        .expect("process");

    assert_eq!(withdrawn.status(), ApplicationStatus::Withdrawn);
    assert!(service.pending_withdrawals(&user(MANAGER)).is_empty());
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 1);
}

#[test]
fn withdrawing_an_approved_unbooked_application_returns_the_unit() {
    let service = seeded_service(1, 0);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 0);

    assert!(service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("request"));
    let withdrawn = service
        .process_withdrawal(&user(MANAGER), &id)
        .expect("process");

    assert_eq!(withdrawn.status(), ApplicationStatus::Withdrawn);
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 1);
}

#[test]
fn withdrawing_a_pending_application_leaves_stock_alone() {
    let service = seeded_service(1, 0);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);

    assert!(service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("request"));
    service
        .process_withdrawal(&user(MANAGER), &id)
        .expect("process");

    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 1);
}

#[test]
fn withdrawal_needs_a_request_from_the_owner() {
    let service = seeded_service(1, 0);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);

    assert!(matches!(
        service.process_withdrawal(&user(MANAGER), &id),
        Err(HousingServiceError::State(StateError::WithdrawalNotRequested(_)))
    ));
    assert!(matches!(
        service.request_withdrawal(&user(SECOND_MARRIED_APPLICANT), &id),
        Err(HousingServiceError::Authorization(AuthorizationError::NotOwner { .. }))
    ));
    assert!(service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("first request"));
    assert!(!service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("repeat request is a no-op"));
}

#[test]
fn declined_withdrawal_keeps_the_booking() {
    let service = seeded_service(1, 0);
    let id = apply(&service, MARRIED_APPLICANT, FlatType::TwoRoom);
    service
        .approve_application(&user(MANAGER), &id)
        .expect("approve");
    service
        .request_withdrawal(&user(MARRIED_APPLICANT), &id)
        .expect("request");

    let kept = service
        .reject_withdrawal(&user(MANAGER), &id)
        .expect("decline");

    assert_eq!(kept.status(), ApplicationStatus::Successful);
    assert!(!kept.withdrawal_requested());
    let project = service.project(&project_id(PROJECT)).expect("project exists");
    assert_eq!(project.units_available(FlatType::TwoRoom), 0);
}

#[test]
fn officer_cannot_apply_to_a_project_they_handle() {
    let service = seeded_service(2, 3);
    service
        .register_officer(&user(OFFICER), &project_id(PROJECT))
        .expect("register");

    assert!(matches!(
        service.create_application(&user(OFFICER), &project_id(PROJECT), FlatType::TwoRoom),
        Err(HousingServiceError::State(StateError::HandlingProject { .. }))
    ));
}
