//! BTO flat applications, officer allocation, and enquiries.
//!
//! Entities and their state machines live in their own modules; [`HousingService`] ties
//! them to the unit and officer-slot ledgers under a single store lock.

pub mod application;
pub mod domain;
pub mod eligibility;
pub mod enquiry;
pub mod errors;
pub mod inventory;
pub mod registration;
pub mod report;
pub mod repository;
pub mod seed;
pub mod service;
pub(crate) mod store;

#[cfg(test)]
mod tests;

pub use application::{Application, ApplicationStatus, WithdrawalEffect};
pub use domain::{
    Account, ApplicationId, BookingReceipt, EnquiryId, FlatType, MaritalStatus, Project,
    ProjectDraft, ProjectId, ProjectUpdate, RegistrationId, Role, UserId,
};
pub use eligibility::{EligibilityConfig, EligibilityError, EligibilityPolicy};
pub use enquiry::{Enquiry, EnquiryReply, EnquiryStatus};
pub use errors::{AuthorizationError, CapacityError, NotFound, StateError, ValidationError};
pub use inventory::{OfficerSlots, UnitInventory};
pub use registration::{OfficerRegistration, RegistrationError, RegistrationStatus};
pub use report::{
    BookingReportFilter, BookingReportRow, InventoryView, ProjectFilter, ProjectListing,
};
pub use repository::{AccountDirectory, Clock, DirectoryError, FixedClock, SystemClock};
pub use seed::{SeedImportError, SeedImporter, SeedProject, SeedSnapshot};
pub use service::{HousingService, HousingServiceError};
