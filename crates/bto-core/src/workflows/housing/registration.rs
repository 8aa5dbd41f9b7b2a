use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ProjectId, RegistrationId, UserId};
use super::errors::{CapacityError, StateError};
use super::inventory::OfficerSlots;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Pending and approved registrations both count against conflict-of-interest checks.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An officer's request to handle a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerRegistration {
    pub id: RegistrationId,
    pub officer: UserId,
    pub project: ProjectId,
    pub registered_on: NaiveDate,
    status: RegistrationStatus,
}

/// Failure raised while approving a registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl OfficerRegistration {
    pub(crate) fn new(
        id: RegistrationId,
        officer: UserId,
        project: ProjectId,
        registered_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            officer,
            project,
            registered_on,
            status: RegistrationStatus::Pending,
        }
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    /// Approve the registration, claiming one of the project's officer slots. The status
    /// stays `Pending` when no slot is left.
    pub fn approve(&mut self, slots: &mut OfficerSlots) -> Result<(), RegistrationError> {
        self.expect_pending("approve")?;
        if !slots.try_claim() {
            return Err(CapacityError::OfficerSlotsExhausted {
                project: self.project.clone(),
            }
            .into());
        }
        self.status = RegistrationStatus::Approved;
        Ok(())
    }

    pub fn reject(&mut self) -> Result<(), StateError> {
        self.expect_pending("reject")?;
        self.status = RegistrationStatus::Rejected;
        Ok(())
    }

    fn expect_pending(&self, action: &'static str) -> Result<(), StateError> {
        if self.status == RegistrationStatus::Pending {
            return Ok(());
        }
        Err(StateError::Registration {
            registration: self.id.clone(),
            action,
            status: self.status,
        })
    }
}
