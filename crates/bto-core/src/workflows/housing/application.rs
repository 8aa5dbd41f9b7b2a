//! Application lifecycle.
//!
//! ```text
//! PENDING ──approve──▶ SUCCESSFUL ──book──▶ BOOKED
//!    │  └──approve (sold out) / reject──▶ UNSUCCESSFUL
//!    └────── withdraw (after request, from any non-withdrawn state) ──▶ WITHDRAWN
//! ```
//!
//! A unit is reserved when the application is approved and returned when a SUCCESSFUL or
//! BOOKED application is withdrawn.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, FlatType, ProjectId, UserId};
use super::errors::StateError;
use super::inventory::UnitInventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Successful,
    Unsuccessful,
    Booked,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Unsuccessful => "unsuccessful",
            Self::Booked => "booked",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Statuses that hold a reserved unit.
    pub const fn holds_unit(self) -> bool {
        matches!(self, Self::Successful | Self::Booked)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An applicant's request for one flat type in one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant: UserId,
    pub project: ProjectId,
    pub flat_type: FlatType,
    pub applied_on: NaiveDate,
    status: ApplicationStatus,
    withdrawal_requested: bool,
}

/// What happened to inventory when an application was withdrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalEffect {
    UnitReleased,
    NoUnitHeld,
}

impl Application {
    pub(crate) fn new(
        id: ApplicationId,
        applicant: UserId,
        project: ProjectId,
        flat_type: FlatType,
        applied_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            applicant,
            project,
            flat_type,
            applied_on,
            status: ApplicationStatus::Pending,
            withdrawal_requested: false,
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn withdrawal_requested(&self) -> bool {
        self.withdrawal_requested
    }

    pub fn is_withdrawn(&self) -> bool {
        self.status == ApplicationStatus::Withdrawn
    }

    /// Approve a pending application against the project's inventory.
    ///
    /// Sold-out tiers resolve to `Unsuccessful` rather than an error.
    pub fn approve(&mut self, units: &mut UnitInventory) -> Result<ApplicationStatus, StateError> {
        self.expect_status(ApplicationStatus::Pending, "approve")?;
        self.status = if units.try_reserve(self.flat_type) {
            ApplicationStatus::Successful
        } else {
            ApplicationStatus::Unsuccessful
        };
        Ok(self.status)
    }

    pub fn reject(&mut self) -> Result<(), StateError> {
        self.expect_status(ApplicationStatus::Pending, "reject")?;
        self.status = ApplicationStatus::Unsuccessful;
        Ok(())
    }

    /// The unit was already reserved at approval, so booking only moves the status.
    pub fn book(&mut self) -> Result<(), StateError> {
        self.expect_status(ApplicationStatus::Successful, "book")?;
        self.status = ApplicationStatus::Booked;
        Ok(())
    }

    /// Flag the applicant's intent to withdraw. Returns `false` when the flag was already
    /// set or the application is already withdrawn.
    pub fn request_withdrawal(&mut self) -> bool {
        if self.withdrawal_requested || self.is_withdrawn() {
            return false;
        }
        self.withdrawal_requested = true;
        true
    }

    /// Complete a requested withdrawal, returning any reserved unit to `units`.
    pub fn withdraw(&mut self, units: &mut UnitInventory) -> Result<WithdrawalEffect, StateError> {
        if !self.withdrawal_requested {
            return Err(StateError::WithdrawalNotRequested(self.id.clone()));
        }
        if self.is_withdrawn() {
            return Err(self.illegal("withdraw"));
        }

        let effect = if self.status.holds_unit() {
            units.release(self.flat_type);
            WithdrawalEffect::UnitReleased
        } else {
            WithdrawalEffect::NoUnitHeld
        };
        self.status = ApplicationStatus::Withdrawn;
        Ok(effect)
    }

    /// Decline a pending withdrawal request, leaving the status untouched.
    pub fn reject_withdrawal(&mut self) -> Result<(), StateError> {
        if !self.withdrawal_requested || self.is_withdrawn() {
            return Err(StateError::WithdrawalNotRequested(self.id.clone()));
        }
        self.withdrawal_requested = false;
        Ok(())
    }

    fn expect_status(
        &self,
        expected: ApplicationStatus,
        action: &'static str,
    ) -> Result<(), StateError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> StateError {
        StateError::Application {
            application: self.id.clone(),
            action,
            status: self.status,
        }
    }
}
