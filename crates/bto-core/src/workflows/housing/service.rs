use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::application::{Application, ApplicationStatus, WithdrawalEffect};
use super::domain::{
    Account, ApplicationId, BookingReceipt, EnquiryId, FlatType, Project, ProjectDraft, ProjectId,
    ProjectUpdate, RegistrationId, UserId,
};
use super::eligibility::{EligibilityConfig, EligibilityError, EligibilityPolicy};
use super::enquiry::{Enquiry, EnquiryReply};
use super::errors::{
    require_text, AuthorizationError, CapacityError, NotFound, StateError, ValidationError,
};
use super::registration::{OfficerRegistration, RegistrationError, RegistrationStatus};
use super::report::{
    BookingReportFilter, BookingReportRow, InventoryView, ProjectFilter, ProjectListing,
};
use super::repository::{AccountDirectory, Clock, DirectoryError};
use super::store::HousingStore;

/// Facade over the housing store exposing every lifecycle operation.
///
/// Each call takes the store lock once and holds it until the call returns, so inventory
/// and officer-slot check-then-decrement steps, and the one-application-per-applicant
/// rule, are atomic with respect to every other call on the same service.
pub struct HousingService<D, C> {
    directory: Arc<D>,
    clock: Arc<C>,
    policy: EligibilityPolicy,
    store: Mutex<HousingStore>,
}

impl<D, C> HousingService<D, C>
where
    D: AccountDirectory + 'static,
    C: Clock + 'static,
{
    pub fn new(directory: Arc<D>, clock: Arc<C>, config: EligibilityConfig) -> Self {
        Self {
            directory,
            clock,
            policy: EligibilityPolicy::new(config),
            store: Mutex::new(HousingStore::new()),
        }
    }

    // Projects

    pub fn create_project(
        &self,
        manager_id: &UserId,
        draft: ProjectDraft,
    ) -> Result<Project, HousingServiceError> {
        let manager = self.account(manager_id)?;
        require_role(&manager, manager.role.can_manage_projects(), "create projects")?;
        require_text("project id", &draft.id.0)?;
        require_text("project name", &draft.name)?;
        require_window(draft.opening_date, draft.closing_date)?;

        let project = Project::from_draft(draft, manager.id.clone());
        let mut store = self.store();
        if !store.insert_project(project.clone()) {
            return Err(ValidationError::DuplicateProject(project.id).into());
        }

        info!(project = %project.id, manager = %manager.id, "project created");
        Ok(project)
    }

    pub fn update_project(
        &self,
        manager_id: &UserId,
        project_id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let project = store.project_mut(project_id)?;
        require_manager_of(&manager, project)?;

        let opening = update.opening_date.unwrap_or(project.opening_date);
        let closing = update.closing_date.unwrap_or(project.closing_date);
        require_window(opening, closing)?;
        if let Some(name) = &update.name {
            require_text("project name", name)?;
        }

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(neighborhood) = update.neighborhood {
            project.neighborhood = neighborhood;
        }
        project.opening_date = opening;
        project.closing_date = closing;
        if let Some(units) = update.two_room_units {
            project.units.set(FlatType::TwoRoom, units);
        }
        if let Some(units) = update.three_room_units {
            project.units.set(FlatType::ThreeRoom, units);
        }

        info!(project = %project.id, "project updated");
        Ok(project.clone())
    }

    /// Remove a project from the store. Refused while any application on it has not been
    /// withdrawn; registrations and enquiries keep their records.
    pub fn delete_project(
        &self,
        manager_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<Project, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        require_manager_of(&manager, store.project(project_id)?)?;

        let applications = store.live_applications_on(project_id);
        if applications > 0 {
            warn!(project = %project_id, applications, "project deletion refused");
            return Err(StateError::ProjectHasApplications {
                project: project_id.clone(),
                applications,
            }
            .into());
        }
        let removed = store.remove_project(project_id)?;

        info!(project = %removed.id, "project deleted");
        Ok(removed)
    }

    pub fn set_project_visibility(
        &self,
        manager_id: &UserId,
        project_id: &ProjectId,
        visible: bool,
    ) -> Result<Project, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let project = store.project_mut(project_id)?;
        require_manager_of(&manager, project)?;
        project.visible = visible;

        info!(project = %project.id, visible, "project visibility changed");
        Ok(project.clone())
    }

    /// Hand a project over to another manager. Only the current manager may do so.
    pub fn reassign_manager(
        &self,
        manager_id: &UserId,
        project_id: &ProjectId,
        new_manager_id: &UserId,
    ) -> Result<Project, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let successor = self.account(new_manager_id)?;
        require_role(
            &successor,
            successor.role.can_manage_projects(),
            "take charge of projects",
        )?;

        let mut store = self.store();
        let project = store.project_mut(project_id)?;
        require_manager_of(&manager, project)?;
        project.manager = successor.id;

        info!(project = %project.id, manager = %project.manager, "project reassigned");
        Ok(project.clone())
    }

    // Applications

    pub fn create_application(
        &self,
        applicant_id: &UserId,
        project_id: &ProjectId,
        flat_type: FlatType,
    ) -> Result<Application, HousingServiceError> {
        let applicant = self.account(applicant_id)?;
        let today = self.clock.today();
        let mut store = self.store();

        if let Some(existing) = store.active_application_for(&applicant.id) {
            debug!(applicant = %applicant.id, existing = %existing.id, "duplicate application refused");
            return Err(StateError::ActiveApplication {
                applicant: applicant.id.clone(),
                existing: existing.id.clone(),
            }
            .into());
        }

        let handling = store.registrations_by(&applicant.id).into_iter().any(|registration| {
            &registration.project == project_id && registration.status().is_active()
        });
        if handling {
            return Err(StateError::HandlingProject {
                officer: applicant.id.clone(),
                project: project_id.clone(),
            }
            .into());
        }

        let project = store.project(project_id)?;
        if let Err(reason) = self.policy.assess(&applicant, project, flat_type, today) {
            debug!(applicant = %applicant.id, project = %project_id, %reason, "application ineligible");
            return Err(reason.into());
        }

        let id = store.next_application_id();
        let application = Application::new(
            id,
            applicant.id.clone(),
            project_id.clone(),
            flat_type,
            today,
        );
        let stored = store.insert_application(application)?.clone();

        info!(
            application = %stored.id,
            applicant = %stored.applicant,
            project = %stored.project,
            flat_type = %stored.flat_type,
            "application created"
        );
        Ok(stored)
    }

    /// Approve a pending application. A sold-out flat type leaves the application
    /// `Unsuccessful` and is reported through the returned status, not as an error.
    pub fn approve_application(
        &self,
        manager_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Application, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (application, project) = store.application_with_project(application_id)?;
        require_manager_of(&manager, project)?;

        match application.approve(&mut project.units)? {
            ApplicationStatus::Unsuccessful => warn!(
                application = %application.id,
                project = %project.id,
                flat_type = %application.flat_type,
                "no units left; application unsuccessful"
            ),
            status => info!(
                application = %application.id,
                %status,
                remaining = project.units.available(application.flat_type),
                "application approved"
            ),
        }
        Ok(application.clone())
    }

    pub fn reject_application(
        &self,
        manager_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Application, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (application, project) = store.application_with_project(application_id)?;
        require_manager_of(&manager, project)?;
        application.reject()?;

        info!(application = %application.id, "application rejected");
        Ok(application.clone())
    }

    /// Book the flat for a successful application and issue the receipt.
    pub fn book_application(
        &self,
        staff_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<BookingReceipt, HousingServiceError> {
        let staff = self.account(staff_id)?;
        let today = self.clock.today();
        // Directory lookups stay outside the store lock.
        let applicant_id = self.store().application(application_id)?.applicant.clone();
        let applicant = self.account(&applicant_id)?;

        let mut store = self.store();
        let project_id = store.application(application_id)?.project.clone();
        require_project_staff(&store, &staff, &project_id)?;

        store.application_mut(application_id)?.book()?;
        let receipt_id = store.next_receipt_id();
        let (application, project) = store.application_with_project(application_id)?;

        info!(application = %application.id, officer = %staff.id, "flat booked");
        Ok(BookingReceipt {
            receipt_id,
            application_id: application.id.clone(),
            applicant: applicant.id,
            applicant_name: applicant.name,
            applicant_age: applicant.age,
            marital_status: applicant.marital_status,
            flat_type: application.flat_type,
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            neighborhood: project.neighborhood.clone(),
            booked_on: today,
            issued_by: staff.id,
        })
    }

    /// Record the applicant's wish to withdraw. Returns `false` if a request is already
    /// pending or the application is withdrawn.
    pub fn request_withdrawal(
        &self,
        applicant_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<bool, HousingServiceError> {
        let mut store = self.store();
        let application = store.application_mut(application_id)?;
        require_owner(applicant_id, &application.applicant, &application.id)?;

        let accepted = application.request_withdrawal();
        if accepted {
            info!(application = %application.id, "withdrawal requested");
        } else {
            debug!(application = %application.id, "withdrawal request ignored");
        }
        Ok(accepted)
    }

    /// Complete a requested withdrawal, returning any reserved unit to the project.
    pub fn process_withdrawal(
        &self,
        manager_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Application, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (application, project) = store.application_with_project(application_id)?;
        require_manager_of(&manager, project)?;

        let unit_released =
            application.withdraw(&mut project.units)? == WithdrawalEffect::UnitReleased;
        info!(application = %application.id, unit_released, "application withdrawn");
        Ok(application.clone())
    }

    pub fn reject_withdrawal(
        &self,
        manager_id: &UserId,
        application_id: &ApplicationId,
    ) -> Result<Application, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (application, project) = store.application_with_project(application_id)?;
        require_manager_of(&manager, project)?;
        application.reject_withdrawal()?;

        info!(application = %application.id, "withdrawal request declined");
        Ok(application.clone())
    }

    // Officer registrations

    pub fn register_officer(
        &self,
        officer_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<OfficerRegistration, HousingServiceError> {
        let officer = self.account(officer_id)?;
        require_role(
            &officer,
            officer.role.can_handle_projects(),
            "register to handle projects",
        )?;
        let today = self.clock.today();
        let mut store = self.store();

        let project = store.project(project_id)?;
        if !project.window_contains(today) {
            return Err(StateError::RegistrationWindowClosed {
                project: project_id.clone(),
                today,
            }
            .into());
        }

        for existing in store.registrations_by(&officer.id) {
            if !existing.status().is_active() {
                continue;
            }
            if &existing.project == project_id {
                return Err(StateError::DuplicateRegistration {
                    officer: officer.id.clone(),
                    project: project_id.clone(),
                    existing: existing.id.clone(),
                }
                .into());
            }
            let overlapping = store
                .project(&existing.project)
                .is_ok_and(|other| other.window_overlaps(project));
            if overlapping {
                return Err(StateError::OverlappingRegistration {
                    officer: officer.id.clone(),
                    conflicting: existing.project.clone(),
                }
                .into());
            }
        }

        if store
            .active_application_for(&officer.id)
            .is_some_and(|application| &application.project == project_id)
        {
            return Err(StateError::AppliedToProject {
                officer: officer.id.clone(),
                project: project_id.clone(),
            }
            .into());
        }

        let id = store.next_registration_id();
        let registration = OfficerRegistration::new(id, officer.id.clone(), project_id.clone(), today);
        let stored = store.insert_registration(registration)?.clone();

        info!(registration = %stored.id, officer = %stored.officer, project = %stored.project, "officer registered");
        Ok(stored)
    }

    pub fn approve_registration(
        &self,
        manager_id: &UserId,
        registration_id: &RegistrationId,
    ) -> Result<OfficerRegistration, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (registration, project) = store.registration_with_project(registration_id)?;
        require_manager_of(&manager, project)?;

        if let Err(err) = registration.approve(&mut project.officer_slots) {
            warn!(registration = %registration.id, error = %err, "registration approval refused");
            return Err(err.into());
        }

        info!(
            registration = %registration.id,
            slots_remaining = project.officer_slots.remaining(),
            "registration approved"
        );
        Ok(registration.clone())
    }

    pub fn reject_registration(
        &self,
        manager_id: &UserId,
        registration_id: &RegistrationId,
    ) -> Result<OfficerRegistration, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let mut store = self.store();
        let (registration, project) = store.registration_with_project(registration_id)?;
        require_manager_of(&manager, project)?;
        registration.reject()?;

        info!(registration = %registration.id, "registration rejected");
        Ok(registration.clone())
    }

    // Enquiries

    pub fn submit_enquiry(
        &self,
        applicant_id: &UserId,
        project_id: &ProjectId,
        text: &str,
    ) -> Result<Enquiry, HousingServiceError> {
        let applicant = self.account(applicant_id)?;
        require_role(&applicant, applicant.role.can_apply(), "submit enquiries")?;
        require_text("enquiry", text)?;
        let today = self.clock.today();
        let mut store = self.store();
        store.project(project_id)?;

        let id = store.next_enquiry_id();
        let enquiry = Enquiry::new(
            id,
            applicant.id.clone(),
            project_id.clone(),
            text.trim().to_string(),
            today,
        );
        let stored = store.insert_enquiry(enquiry)?.clone();

        info!(enquiry = %stored.id, project = %stored.project, "enquiry submitted");
        Ok(stored)
    }

    pub fn edit_enquiry(
        &self,
        applicant_id: &UserId,
        enquiry_id: &EnquiryId,
        text: &str,
    ) -> Result<Enquiry, HousingServiceError> {
        require_text("enquiry", text)?;
        let mut store = self.store();
        let enquiry = store.enquiry_mut(enquiry_id)?;
        require_owner(applicant_id, &enquiry.applicant, &enquiry.id)?;
        enquiry.edit(text.trim().to_string())?;

        debug!(enquiry = %enquiry.id, "enquiry edited");
        Ok(enquiry.clone())
    }

    /// Answer an enquiry as the project's manager or one of its approved officers.
    pub fn reply_enquiry(
        &self,
        replier_id: &UserId,
        enquiry_id: &EnquiryId,
        text: &str,
    ) -> Result<Enquiry, HousingServiceError> {
        let replier = self.account(replier_id)?;
        require_text("reply", text)?;
        let today = self.clock.today();
        let mut store = self.store();

        let project_id = store.enquiry(enquiry_id)?.project.clone();
        require_project_staff(&store, &replier, &project_id)?;

        let enquiry = store.enquiry_mut(enquiry_id)?;
        enquiry.answer(EnquiryReply {
            text: text.trim().to_string(),
            replied_by: replier.id.clone(),
            replied_on: today,
        })?;

        info!(enquiry = %enquiry.id, replier = %replier.id, "enquiry replied");
        Ok(enquiry.clone())
    }

    /// Delete an enquiry regardless of its status.
    pub fn delete_enquiry(
        &self,
        applicant_id: &UserId,
        enquiry_id: &EnquiryId,
    ) -> Result<Enquiry, HousingServiceError> {
        let mut store = self.store();
        let enquiry = store.enquiry(enquiry_id)?;
        require_owner(applicant_id, &enquiry.applicant, &enquiry.id)?;
        let removed = store.remove_enquiry(enquiry_id)?;

        debug!(enquiry = %removed.id, "enquiry deleted");
        Ok(removed)
    }

    // Queries

    pub fn project(&self, project_id: &ProjectId) -> Result<Project, HousingServiceError> {
        Ok(self.store().project(project_id)?.clone())
    }

    pub fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, HousingServiceError> {
        Ok(self.store().application(application_id)?.clone())
    }

    /// The applicant's current non-withdrawn application, if any.
    pub fn application_for(&self, applicant_id: &UserId) -> Option<Application> {
        self.store().active_application_for(applicant_id).cloned()
    }

    /// Visible, open projects the applicant is eligible for today, narrowed by `filter`.
    pub fn open_projects_for(
        &self,
        applicant_id: &UserId,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectListing>, HousingServiceError> {
        let applicant = self.account(applicant_id)?;
        let today = self.clock.today();
        let store = self.store();

        Ok(store
            .projects()
            .filter(|project| filter.matches(project))
            .filter_map(|project| {
                let mut eligible_flat_types =
                    self.policy.eligible_flat_types(&applicant, project, today);
                eligible_flat_types.retain(|flat_type| filter.admits(*flat_type));
                (!eligible_flat_types.is_empty()).then(|| ProjectListing {
                    project: project.clone(),
                    eligible_flat_types,
                })
            })
            .collect())
    }

    pub fn projects_managed_by(&self, manager_id: &UserId) -> Vec<Project> {
        self.store()
            .projects()
            .filter(|project| &project.manager == manager_id)
            .cloned()
            .collect()
    }

    pub fn registrations_for_project(
        &self,
        manager_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<Vec<OfficerRegistration>, HousingServiceError> {
        let manager = self.account(manager_id)?;
        let store = self.store();
        let project = store.project(project_id)?;
        require_manager_of(&manager, project)?;

        Ok(project
            .registrations()
            .iter()
            .filter_map(|id| store.registration(id).ok())
            .cloned()
            .collect())
    }

    /// Officers with an approved registration on the project.
    pub fn officers_handling(&self, project_id: &ProjectId) -> Vec<UserId> {
        self.store()
            .registrations()
            .filter(|registration| {
                &registration.project == project_id
                    && registration.status() == RegistrationStatus::Approved
            })
            .map(|registration| registration.officer.clone())
            .collect()
    }

    /// Applications awaiting a withdrawal decision across the manager's projects.
    pub fn pending_withdrawals(&self, manager_id: &UserId) -> Vec<Application> {
        let store = self.store();
        store
            .applications()
            .filter(|application| application.withdrawal_requested() && !application.is_withdrawn())
            .filter(|application| {
                store
                    .project(&application.project)
                    .is_ok_and(|project| &project.manager == manager_id)
            })
            .cloned()
            .collect()
    }

    pub fn enquiries_for_project(&self, project_id: &ProjectId) -> Vec<Enquiry> {
        self.store()
            .enquiries_for(project_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn enquiries_by_applicant(&self, applicant_id: &UserId) -> Vec<Enquiry> {
        self.store()
            .enquiries_by(applicant_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Booked flats matching `filter`, in application order.
    pub fn booking_report(
        &self,
        filter: &BookingReportFilter,
    ) -> Result<Vec<BookingReportRow>, HousingServiceError> {
        let store = self.store();
        let booked: Vec<(Application, Project)> = store
            .applications()
            .filter(|application| application.status() == ApplicationStatus::Booked)
            .filter_map(|application| {
                let project = store.project(&application.project).ok()?;
                Some((application.clone(), project.clone()))
            })
            .collect();
        drop(store);

        let mut rows = Vec::new();
        for (application, project) in &booked {
            let applicant = self.account(&application.applicant)?;
            if filter.matches(&applicant, application, project) {
                rows.push(BookingReportRow::new(&applicant, application, project));
            }
        }
        Ok(rows)
    }

    pub fn inventory(&self) -> Vec<InventoryView> {
        self.store().projects().map(InventoryView::from).collect()
    }

    fn store(&self) -> MutexGuard<'_, HousingStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn account(&self, id: &UserId) -> Result<Account, HousingServiceError> {
        self.directory
            .find(id)?
            .ok_or_else(|| NotFound::Account(id.clone()).into())
    }
}

fn require_role(
    account: &Account,
    permitted: bool,
    action: &'static str,
) -> Result<(), AuthorizationError> {
    if permitted {
        return Ok(());
    }
    Err(AuthorizationError::RoleNotPermitted {
        actor: account.id.clone(),
        role: account.role,
        action,
    })
}

fn require_manager_of(actor: &Account, project: &Project) -> Result<(), AuthorizationError> {
    if project.manager == actor.id {
        return Ok(());
    }
    Err(AuthorizationError::NotProjectManager {
        actor: actor.id.clone(),
        project: project.id.clone(),
    })
}

/// The project's manager, or an officer whose registration on it was approved.
fn require_project_staff(
    store: &HousingStore,
    actor: &Account,
    project_id: &ProjectId,
) -> Result<(), HousingServiceError> {
    let project = store.project(project_id)?;
    if project.manager == actor.id {
        return Ok(());
    }

    let approved_officer = store.registrations_by(&actor.id).into_iter().any(|registration| {
        &registration.project == project_id
            && registration.status() == RegistrationStatus::Approved
    });
    if approved_officer {
        return Ok(());
    }

    Err(AuthorizationError::NotProjectStaff {
        actor: actor.id.clone(),
        project: project_id.clone(),
    }
    .into())
}

fn require_owner(
    actor: &UserId,
    owner: &UserId,
    target: &impl std::fmt::Display,
) -> Result<(), AuthorizationError> {
    if actor == owner {
        return Ok(());
    }
    Err(AuthorizationError::NotOwner {
        actor: actor.clone(),
        target: target.to_string(),
    })
}

fn require_window(opening: NaiveDate, closing: NaiveDate) -> Result<(), ValidationError> {
    if closing < opening {
        return Err(ValidationError::InvertedWindow { opening, closing });
    }
    Ok(())
}

/// Error raised by the housing service.
#[derive(Debug, thiserror::Error)]
pub enum HousingServiceError {
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl From<RegistrationError> for HousingServiceError {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::State(err) => Self::State(err),
            RegistrationError::Capacity(err) => Self::Capacity(err),
        }
    }
}
