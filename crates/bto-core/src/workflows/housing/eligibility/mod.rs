mod config;
mod rules;

pub use config::EligibilityConfig;

use chrono::NaiveDate;

use super::domain::{Account, FlatType, MaritalStatus, Project, ProjectId, Role};

/// Reason an applicant may not apply for a flat type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EligibilityError {
    #[error("accounts with role {0} cannot apply for flats")]
    RoleCannotApply(Role),
    #[error("project {0} is not open to the public")]
    ProjectHidden(ProjectId),
    #[error("project {project} is not accepting applications on {today}")]
    OutsideWindow { project: ProjectId, today: NaiveDate },
    #[error("{marital_status} applicants may not apply for {flat_type} flats")]
    FlatTypeRestricted {
        marital_status: MaritalStatus,
        flat_type: FlatType,
    },
    #[error("{marital_status} applicants must be at least {minimum} (age {age})")]
    UnderAge {
        marital_status: MaritalStatus,
        age: u8,
        minimum: u8,
    },
}

/// Stateless predicate deciding who may start an application.
#[derive(Debug, Clone, Default)]
pub struct EligibilityPolicy {
    config: EligibilityConfig,
}

impl EligibilityPolicy {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Evaluate the rules in order and report the first that fails.
    pub fn assess(
        &self,
        applicant: &Account,
        project: &Project,
        flat_type: FlatType,
        today: NaiveDate,
    ) -> Result<(), EligibilityError> {
        rules::role_may_apply(applicant)?;
        rules::project_open(project, today)?;
        rules::household_fits(applicant, flat_type, &self.config)
    }

    pub fn is_eligible(
        &self,
        applicant: &Account,
        project: &Project,
        flat_type: FlatType,
        today: NaiveDate,
    ) -> bool {
        self.assess(applicant, project, flat_type, today).is_ok()
    }

    /// Flat types in `project` the applicant could apply for today.
    pub fn eligible_flat_types(
        &self,
        applicant: &Account,
        project: &Project,
        today: NaiveDate,
    ) -> Vec<FlatType> {
        FlatType::ordered()
            .into_iter()
            .filter(|flat_type| self.is_eligible(applicant, project, *flat_type, today))
            .collect()
    }
}
