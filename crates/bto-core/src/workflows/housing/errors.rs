use chrono::NaiveDate;

use super::application::ApplicationStatus;
use super::domain::{ApplicationId, EnquiryId, ProjectId, RegistrationId, Role, UserId};
use super::registration::RegistrationStatus;

/// An operation is not legal in the target's current status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("cannot {action} application {application} while it is {status}")]
    Application {
        application: ApplicationId,
        action: &'static str,
        status: ApplicationStatus,
    },
    #[error("withdrawal was never requested for application {0}")]
    WithdrawalNotRequested(ApplicationId),
    #[error("applicant {applicant} already holds application {existing}")]
    ActiveApplication {
        applicant: UserId,
        existing: ApplicationId,
    },
    #[error("officer {officer} is registered to handle project {project}")]
    HandlingProject { officer: UserId, project: ProjectId },
    #[error("cannot {action} registration {registration} while it is {status}")]
    Registration {
        registration: RegistrationId,
        action: &'static str,
        status: RegistrationStatus,
    },
    #[error("officer {officer} already has registration {existing} for project {project}")]
    DuplicateRegistration {
        officer: UserId,
        project: ProjectId,
        existing: RegistrationId,
    },
    #[error("project {project} is not open for registration on {today}")]
    RegistrationWindowClosed { project: ProjectId, today: NaiveDate },
    #[error("officer {officer} already handles project {conflicting} in an overlapping window")]
    OverlappingRegistration {
        officer: UserId,
        conflicting: ProjectId,
    },
    #[error("officer {officer} has applied for a flat in project {project}")]
    AppliedToProject { officer: UserId, project: ProjectId },
    #[error("project {project} still has {applications} application(s) awaiting withdrawal")]
    ProjectHasApplications {
        project: ProjectId,
        applications: usize,
    },
    #[error("enquiry {0} has already been replied to")]
    EnquiryReplied(EnquiryId),
}

/// The acting account lacks rights over the target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("{actor} is not the manager in charge of project {project}")]
    NotProjectManager { actor: UserId, project: ProjectId },
    #[error("{actor} is not an approved officer or the manager of project {project}")]
    NotProjectStaff { actor: UserId, project: ProjectId },
    #[error("{actor} does not own {target}")]
    NotOwner { actor: UserId, target: String },
    #[error("{actor} holds role {role}, which cannot {action}")]
    RoleNotPermitted {
        actor: UserId,
        role: Role,
        action: &'static str,
    },
}

/// A bounded resource has no capacity left for an operation that requires it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("project {project} has no officer slots remaining")]
    OfficerSlotsExhausted { project: ProjectId },
}

/// A referenced entity is unknown to the store or directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("account {0} not found")]
    Account(UserId),
    #[error("project {0} not found")]
    Project(ProjectId),
    #[error("application {0} not found")]
    Application(ApplicationId),
    #[error("registration {0} not found")]
    Registration(RegistrationId),
    #[error("enquiry {0} not found")]
    Enquiry(EnquiryId),
}

/// Caller supplied values that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("closing date {closing} precedes opening date {opening}")]
    InvertedWindow {
        opening: NaiveDate,
        closing: NaiveDate,
    },
    #[error("project {0} already exists")]
    DuplicateProject(ProjectId),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}
