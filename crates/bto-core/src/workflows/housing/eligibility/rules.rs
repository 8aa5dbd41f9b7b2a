use chrono::NaiveDate;

use super::super::domain::{Account, FlatType, MaritalStatus, Project};
use super::config::EligibilityConfig;
use super::EligibilityError;

pub(crate) fn role_may_apply(applicant: &Account) -> Result<(), EligibilityError> {
    if applicant.role.can_apply() {
        Ok(())
    } else {
        Err(EligibilityError::RoleCannotApply(applicant.role))
    }
}

pub(crate) fn project_open(project: &Project, today: NaiveDate) -> Result<(), EligibilityError> {
    if !project.visible {
        return Err(EligibilityError::ProjectHidden(project.id.clone()));
    }
    if !project.window_contains(today) {
        return Err(EligibilityError::OutsideWindow {
            project: project.id.clone(),
            today,
        });
    }
    Ok(())
}

pub(crate) fn household_fits(
    applicant: &Account,
    flat_type: FlatType,
    config: &EligibilityConfig,
) -> Result<(), EligibilityError> {
    let minimum = match applicant.marital_status {
        MaritalStatus::Single => {
            if flat_type != FlatType::TwoRoom {
                return Err(EligibilityError::FlatTypeRestricted {
                    marital_status: applicant.marital_status,
                    flat_type,
                });
            }
            config.single_min_age
        }
        MaritalStatus::Married => config.married_min_age,
    };

    if applicant.age < minimum {
        return Err(EligibilityError::UnderAge {
            marital_status: applicant.marital_status,
            age: applicant.age,
            minimum,
        });
    }
    Ok(())
}
