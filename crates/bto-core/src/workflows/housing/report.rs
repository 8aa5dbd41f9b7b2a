use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::application::Application;
use super::domain::{Account, ApplicationId, FlatType, MaritalStatus, Project, ProjectId, UserId};

/// Optional criteria narrowing the booking report. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReportFilter {
    pub marital_status: Option<MaritalStatus>,
    pub flat_type: Option<FlatType>,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub project_name: Option<String>,
}

impl BookingReportFilter {
    pub fn matches(&self, applicant: &Account, application: &Application, project: &Project) -> bool {
        if self
            .marital_status
            .is_some_and(|status| status != applicant.marital_status)
        {
            return false;
        }
        if self
            .flat_type
            .is_some_and(|flat_type| flat_type != application.flat_type)
        {
            return false;
        }
        if self.min_age.is_some_and(|min| applicant.age < min) {
            return false;
        }
        if self.max_age.is_some_and(|max| applicant.age > max) {
            return false;
        }
        text_matches(self.project_name.as_deref(), &project.name)
    }
}

/// Optional criteria narrowing project listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub flat_type: Option<FlatType>,
    pub project_name: Option<String>,
    pub neighborhood: Option<String>,
}

impl ProjectFilter {
    /// A flat type criterion needs at least one unit of that type still available.
    pub fn matches(&self, project: &Project) -> bool {
        if self
            .flat_type
            .is_some_and(|flat_type| project.units_available(flat_type) == 0)
        {
            return false;
        }
        text_matches(self.project_name.as_deref(), &project.name)
            && text_matches(self.neighborhood.as_deref(), &project.neighborhood)
    }

    pub(crate) fn admits(&self, flat_type: FlatType) -> bool {
        !matches!(self.flat_type, Some(wanted) if wanted != flat_type)
    }
}

// Blank criteria are ignored; comparison is case-insensitive.
fn text_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        Some(wanted) if !wanted.is_empty() => actual.eq_ignore_ascii_case(wanted),
        _ => true,
    }
}

/// One booked flat in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReportRow {
    pub application_id: ApplicationId,
    pub applicant: UserId,
    pub applicant_name: String,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub flat_type: FlatType,
    pub project_id: ProjectId,
    pub project_name: String,
    pub neighborhood: String,
    pub applied_on: NaiveDate,
}

impl BookingReportRow {
    pub(crate) fn new(applicant: &Account, application: &Application, project: &Project) -> Self {
        Self {
            application_id: application.id.clone(),
            applicant: applicant.id.clone(),
            applicant_name: applicant.name.clone(),
            age: applicant.age,
            marital_status: applicant.marital_status,
            flat_type: application.flat_type,
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            neighborhood: project.neighborhood.clone(),
            applied_on: application.applied_on,
        }
    }
}

/// Per-project stock snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryView {
    pub project_id: ProjectId,
    pub project_name: String,
    pub visible: bool,
    pub two_room_units: u32,
    pub three_room_units: u32,
    pub officer_slots_remaining: u32,
    pub officer_slots_allocated: u32,
}

impl From<&Project> for InventoryView {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            visible: project.visible,
            two_room_units: project.units_available(FlatType::TwoRoom),
            three_room_units: project.units_available(FlatType::ThreeRoom),
            officer_slots_remaining: project.officer_slots().remaining(),
            officer_slots_allocated: project.officer_slots().allocated(),
        }
    }
}

/// A project an applicant may apply to today, with the flat types open to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListing {
    pub project: Project,
    pub eligible_flat_types: Vec<FlatType>,
}
