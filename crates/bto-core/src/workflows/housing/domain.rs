use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::inventory::{OfficerSlots, UnitInventory};

/// Credential identifier (NRIC) for an account. Unique and immutable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for BTO projects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

/// Identifier wrapper for flat applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for officer registrations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// Identifier wrapper for enquiries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnquiryId(pub String);

macro_rules! display_identifier {
    ($($name:ident),+ $(,)?) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )+
    };
}

display_identifier!(UserId, ProjectId, ApplicationId, RegistrationId, EnquiryId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MaritalStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "married" => Ok(Self::Married),
            other => Err(UnknownVariant::new("marital status", other)),
        }
    }
}

/// Unit-size tier offered by a project. `TwoRoom` is the smaller tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatType {
    TwoRoom,
    ThreeRoom,
}

impl FlatType {
    pub const fn ordered() -> [Self; 2] {
        [Self::TwoRoom, Self::ThreeRoom]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoRoom => "2-Room",
            Self::ThreeRoom => "3-Room",
        }
    }
}

impl fmt::Display for FlatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FlatType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "2room" | "tworoom" => Ok(Self::TwoRoom),
            "3room" | "threeroom" => Ok(Self::ThreeRoom),
            _ => Err(UnknownVariant::new("flat type", value.trim())),
        }
    }
}

/// Capability set attached to an account. The role decides which operations the
/// account may invoke; every role shares the same base record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Officer,
    Manager,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Officer => "officer",
            Self::Manager => "manager",
        }
    }

    /// Officers keep every applicant capability.
    pub const fn can_apply(self) -> bool {
        matches!(self, Self::Applicant | Self::Officer)
    }

    pub const fn can_handle_projects(self) -> bool {
        matches!(self, Self::Officer)
    }

    pub const fn can_manage_projects(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "applicant" => Ok(Self::Applicant),
            "officer" | "hdbofficer" | "hdb_officer" => Ok(Self::Officer),
            "manager" | "hdbmanager" | "hdb_manager" => Ok(Self::Manager),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

/// Raised when a textual enum value cannot be mapped onto a domain variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Base account record shared by applicants, officers, and managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub name: String,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub role: Role,
}

/// A BTO project listing with its inventory and officer seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub neighborhood: String,
    pub opening_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub visible: bool,
    pub manager: UserId,
    pub(crate) units: UnitInventory,
    pub(crate) officer_slots: OfficerSlots,
    pub(crate) applications: Vec<ApplicationId>,
    pub(crate) enquiries: Vec<EnquiryId>,
    pub(crate) registrations: Vec<RegistrationId>,
}

impl Project {
    pub(crate) fn from_draft(draft: ProjectDraft, manager: UserId) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            neighborhood: draft.neighborhood,
            opening_date: draft.opening_date,
            closing_date: draft.closing_date,
            visible: draft.visible,
            manager,
            units: UnitInventory::new(draft.two_room_units, draft.three_room_units),
            officer_slots: OfficerSlots::new(draft.officer_slots),
            applications: Vec::new(),
            enquiries: Vec::new(),
            registrations: Vec::new(),
        }
    }

    /// Whether `today` falls inside the inclusive application window.
    pub fn window_contains(&self, today: NaiveDate) -> bool {
        self.opening_date <= today && today <= self.closing_date
    }

    pub fn window_overlaps(&self, other: &Project) -> bool {
        self.opening_date <= other.closing_date && other.opening_date <= self.closing_date
    }

    pub fn units_available(&self, flat_type: FlatType) -> u32 {
        self.units.available(flat_type)
    }

    pub fn officer_slots(&self) -> &OfficerSlots {
        &self.officer_slots
    }

    pub fn applications(&self) -> &[ApplicationId] {
        &self.applications
    }

    pub fn registrations(&self) -> &[RegistrationId] {
        &self.registrations
    }
}

/// Input for creating a project. The owning manager is taken from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub id: ProjectId,
    pub name: String,
    pub neighborhood: String,
    pub two_room_units: u32,
    pub three_room_units: u32,
    pub opening_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub officer_slots: u32,
    pub visible: bool,
}

/// Partial update applied by the owning manager. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub neighborhood: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub two_room_units: Option<u32>,
    pub three_room_units: Option<u32>,
}

/// Summary of a booked flat, issued by the officer at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReceipt {
    pub receipt_id: String,
    pub application_id: ApplicationId,
    pub applicant: UserId,
    pub applicant_name: String,
    pub applicant_age: u8,
    pub marital_status: MaritalStatus,
    pub flat_type: FlatType,
    pub project_id: ProjectId,
    pub project_name: String,
    pub neighborhood: String,
    pub booked_on: NaiveDate,
    pub issued_by: UserId,
}
