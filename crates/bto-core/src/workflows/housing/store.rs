use std::collections::{BTreeMap, HashMap};

use super::application::Application;
use super::domain::{ApplicationId, EnquiryId, Project, ProjectId, RegistrationId, UserId};
use super::enquiry::Enquiry;
use super::errors::NotFound;
use super::registration::OfficerRegistration;

/// In-memory graph of projects and everything attached to them.
///
/// The store is a plain owned value: whoever constructs it decides its lifetime, and the
/// [`HousingService`](super::service::HousingService) serializes access to it.
#[derive(Debug, Default)]
pub struct HousingStore {
    projects: BTreeMap<ProjectId, Project>,
    applications: BTreeMap<ApplicationId, Application>,
    registrations: BTreeMap<RegistrationId, OfficerRegistration>,
    enquiries: BTreeMap<EnquiryId, Enquiry>,
    applications_by_applicant: HashMap<UserId, Vec<ApplicationId>>,
    enquiries_by_applicant: HashMap<UserId, Vec<EnquiryId>>,
    sequence: u64,
}

impl HousingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    pub(crate) fn next_application_id(&mut self) -> ApplicationId {
        ApplicationId(format!("APP-{:06}", self.next_sequence()))
    }

    pub(crate) fn next_registration_id(&mut self) -> RegistrationId {
        RegistrationId(format!("REG-{:06}", self.next_sequence()))
    }

    pub(crate) fn next_enquiry_id(&mut self) -> EnquiryId {
        EnquiryId(format!("ENQ-{:06}", self.next_sequence()))
    }

    pub(crate) fn next_receipt_id(&mut self) -> String {
        format!("RCT-{:06}", self.next_sequence())
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project(&self, id: &ProjectId) -> Result<&Project, NotFound> {
        self.projects
            .get(id)
            .ok_or_else(|| NotFound::Project(id.clone()))
    }

    pub(crate) fn project_mut(&mut self, id: &ProjectId) -> Result<&mut Project, NotFound> {
        self.projects
            .get_mut(id)
            .ok_or_else(|| NotFound::Project(id.clone()))
    }

    /// Insert a project, replacing nothing. Returns `false` if the id is taken.
    pub(crate) fn insert_project(&mut self, project: Project) -> bool {
        if self.projects.contains_key(&project.id) {
            return false;
        }
        self.projects.insert(project.id.clone(), project);
        true
    }

    /// Detach a project. Withdrawn applications, registrations, and enquiries keep their
    /// records but can no longer reach it.
    pub(crate) fn remove_project(&mut self, id: &ProjectId) -> Result<Project, NotFound> {
        self.projects
            .remove(id)
            .ok_or_else(|| NotFound::Project(id.clone()))
    }

    pub fn applications(&self) -> impl Iterator<Item = &Application> {
        self.applications.values()
    }

    pub fn application(&self, id: &ApplicationId) -> Result<&Application, NotFound> {
        self.applications
            .get(id)
            .ok_or_else(|| NotFound::Application(id.clone()))
    }

    pub(crate) fn application_mut(
        &mut self,
        id: &ApplicationId,
    ) -> Result<&mut Application, NotFound> {
        self.applications
            .get_mut(id)
            .ok_or_else(|| NotFound::Application(id.clone()))
    }

    /// Borrow an application together with the project that owns its inventory.
    pub(crate) fn application_with_project(
        &mut self,
        id: &ApplicationId,
    ) -> Result<(&mut Application, &mut Project), NotFound> {
        let application = self
            .applications
            .get_mut(id)
            .ok_or_else(|| NotFound::Application(id.clone()))?;
        let project = self
            .projects
            .get_mut(&application.project)
            .ok_or_else(|| NotFound::Project(application.project.clone()))?;
        Ok((application, project))
    }

    /// Applications on the project that have not been withdrawn.
    pub fn live_applications_on(&self, project: &ProjectId) -> usize {
        self.projects
            .get(project)
            .map(|project| {
                project
                    .applications
                    .iter()
                    .filter_map(|id| self.applications.get(id))
                    .filter(|application| !application.is_withdrawn())
                    .count()
            })
            .unwrap_or_default()
    }

    /// The applicant's application that has not been withdrawn, if any.
    pub fn active_application_for(&self, applicant: &UserId) -> Option<&Application> {
        self.applications_by_applicant
            .get(applicant)?
            .iter()
            .filter_map(|id| self.applications.get(id))
            .find(|application| !application.is_withdrawn())
    }

    pub(crate) fn insert_application(
        &mut self,
        application: Application,
    ) -> Result<&Application, NotFound> {
        let project = self
            .projects
            .get_mut(&application.project)
            .ok_or_else(|| NotFound::Project(application.project.clone()))?;
        project.applications.push(application.id.clone());
        self.applications_by_applicant
            .entry(application.applicant.clone())
            .or_default()
            .push(application.id.clone());

        let id = application.id.clone();
        Ok(&*self.applications.entry(id).or_insert(application))
    }

    pub fn registrations(&self) -> impl Iterator<Item = &OfficerRegistration> {
        self.registrations.values()
    }

    pub fn registration(&self, id: &RegistrationId) -> Result<&OfficerRegistration, NotFound> {
        self.registrations
            .get(id)
            .ok_or_else(|| NotFound::Registration(id.clone()))
    }

    pub(crate) fn registration_with_project(
        &mut self,
        id: &RegistrationId,
    ) -> Result<(&mut OfficerRegistration, &mut Project), NotFound> {
        let registration = self
            .registrations
            .get_mut(id)
            .ok_or_else(|| NotFound::Registration(id.clone()))?;
        let project = self
            .projects
            .get_mut(&registration.project)
            .ok_or_else(|| NotFound::Project(registration.project.clone()))?;
        Ok((registration, project))
    }

    pub fn registrations_by(&self, officer: &UserId) -> Vec<&OfficerRegistration> {
        self.registrations
            .values()
            .filter(|registration| &registration.officer == officer)
            .collect()
    }

    pub(crate) fn insert_registration(
        &mut self,
        registration: OfficerRegistration,
    ) -> Result<&OfficerRegistration, NotFound> {
        let project = self
            .projects
            .get_mut(&registration.project)
            .ok_or_else(|| NotFound::Project(registration.project.clone()))?;
        project.registrations.push(registration.id.clone());

        let id = registration.id.clone();
        Ok(&*self.registrations.entry(id).or_insert(registration))
    }

    pub fn enquiry(&self, id: &EnquiryId) -> Result<&Enquiry, NotFound> {
        self.enquiries
            .get(id)
            .ok_or_else(|| NotFound::Enquiry(id.clone()))
    }

    pub(crate) fn enquiry_mut(&mut self, id: &EnquiryId) -> Result<&mut Enquiry, NotFound> {
        self.enquiries
            .get_mut(id)
            .ok_or_else(|| NotFound::Enquiry(id.clone()))
    }

    pub fn enquiries_by(&self, applicant: &UserId) -> Vec<&Enquiry> {
        self.enquiries_by_applicant
            .get(applicant)
            .map(|ids| ids.iter().filter_map(|id| self.enquiries.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn enquiries_for(&self, project: &ProjectId) -> Vec<&Enquiry> {
        self.projects
            .get(project)
            .map(|project| {
                project
                    .enquiries
                    .iter()
                    .filter_map(|id| self.enquiries.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn insert_enquiry(&mut self, enquiry: Enquiry) -> Result<&Enquiry, NotFound> {
        let project = self
            .projects
            .get_mut(&enquiry.project)
            .ok_or_else(|| NotFound::Project(enquiry.project.clone()))?;
        project.enquiries.push(enquiry.id.clone());
        self.enquiries_by_applicant
            .entry(enquiry.applicant.clone())
            .or_default()
            .push(enquiry.id.clone());

        let id = enquiry.id.clone();
        Ok(&*self.enquiries.entry(id).or_insert(enquiry))
    }

    /// Remove an enquiry from the store and from both owning indexes.
    pub(crate) fn remove_enquiry(&mut self, id: &EnquiryId) -> Result<Enquiry, NotFound> {
        let enquiry = self
            .enquiries
            .remove(id)
            .ok_or_else(|| NotFound::Enquiry(id.clone()))?;
        if let Some(project) = self.projects.get_mut(&enquiry.project) {
            project.enquiries.retain(|existing| existing != id);
        }
        if let Some(ids) = self.enquiries_by_applicant.get_mut(&enquiry.applicant) {
            ids.retain(|existing| existing != id);
        }
        Ok(enquiry)
    }
}
