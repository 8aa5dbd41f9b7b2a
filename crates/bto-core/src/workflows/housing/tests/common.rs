use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;

use crate::workflows::housing::domain::{
    Account, ApplicationId, FlatType, MaritalStatus, ProjectDraft, ProjectId, RegistrationId,
    Role, UserId,
};
use crate::workflows::housing::repository::{AccountDirectory, DirectoryError, FixedClock};
use crate::workflows::housing::{EligibilityConfig, HousingService};

pub(super) const SINGLE_APPLICANT: &str = "S1234567A";
pub(super) const MARRIED_APPLICANT: &str = "T7654321B";
pub(super) const SECOND_MARRIED_APPLICANT: &str = "S9876543C";
pub(super) const YOUNG_SINGLE: &str = "S2345678D";
pub(super) const OFFICER: &str = "T2109876H";
pub(super) const SECOND_OFFICER: &str = "T3333333K";
pub(super) const MANAGER: &str = "S5678901G";
pub(super) const OTHER_MANAGER: &str = "S8765432F";
pub(super) const PROJECT: &str = "ACACIA";

pub(super) type TestService = HousingService<MemoryDirectory, FixedClock>;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 3, 2)
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn project_id(id: &str) -> ProjectId {
    ProjectId(id.to_string())
}

pub(super) fn account(
    id: &str,
    name: &str,
    age: u8,
    marital_status: MaritalStatus,
    role: Role,
) -> Account {
    Account {
        id: user(id),
        name: name.to_string(),
        age,
        marital_status,
        role,
    }
}

pub(super) fn accounts() -> Vec<Account> {
    vec![
        account(SINGLE_APPLICANT, "John", 35, MaritalStatus::Single, Role::Applicant),
        account(MARRIED_APPLICANT, "Sarah", 40, MaritalStatus::Married, Role::Applicant),
        account(SECOND_MARRIED_APPLICANT, "Grace", 37, MaritalStatus::Married, Role::Applicant),
        account(YOUNG_SINGLE, "Kevin", 30, MaritalStatus::Single, Role::Applicant),
        account(OFFICER, "Daniel", 36, MaritalStatus::Single, Role::Officer),
        account(SECOND_OFFICER, "Olivia", 29, MaritalStatus::Married, Role::Officer),
        account(MANAGER, "Jessica", 26, MaritalStatus::Married, Role::Manager),
        account(OTHER_MANAGER, "Rachel", 45, MaritalStatus::Single, Role::Manager),
    ]
}

/// Project open from mid February to late March 2026 around [`today`].
pub(super) fn project_draft(id: &str, two_room_units: u32, three_room_units: u32) -> ProjectDraft {
    ProjectDraft {
        id: project_id(id),
        name: format!("{id} Residences"),
        neighborhood: "Yishun".to_string(),
        two_room_units,
        three_room_units,
        opening_date: date(2026, 2, 15),
        closing_date: date(2026, 3, 20),
        officer_slots: 2,
        visible: true,
    }
}

pub(super) fn build_service() -> (TestService, Arc<MemoryDirectory>) {
    let directory = Arc::new(MemoryDirectory::with_accounts(accounts()));
    let service = HousingService::new(
        directory.clone(),
        Arc::new(FixedClock(today())),
        EligibilityConfig::default(),
    );
    (service, directory)
}

/// Service with [`PROJECT`] created by [`MANAGER`] holding the given stock.
pub(super) fn seeded_service(two_room_units: u32, three_room_units: u32) -> TestService {
    let (service, _) = build_service();
    service
        .create_project(
            &user(MANAGER),
            project_draft(PROJECT, two_room_units, three_room_units),
        )
        .expect("manager creates project");
    service
}

pub(super) fn apply(service: &TestService, applicant: &str, flat_type: FlatType) -> ApplicationId {
    service
        .create_application(&user(applicant), &project_id(PROJECT), flat_type)
        .expect("application accepted")
        .id
}

/// Register [`OFFICER`] on [`PROJECT`] and have the manager approve it.
pub(super) fn approved_officer(service: &TestService) -> RegistrationId {
    let registration = service
        .register_officer(&user(OFFICER), &project_id(PROJECT))
        .expect("officer registers");
    service
        .approve_registration(&user(MANAGER), &registration.id)
        .expect("manager approves registration");
    registration.id
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    accounts: Arc<Mutex<HashMap<UserId, Account>>>,
}

impl MemoryDirectory {
    pub(super) fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let directory = Self::default();
        for account in accounts {
            directory.insert(account);
        }
        directory
    }

    pub(super) fn insert(&self, account: Account) {
        self.accounts
            .lock()
            .expect("directory mutex poisoned")
            .insert(account.id.clone(), account);
    }
}

impl AccountDirectory for MemoryDirectory {
    fn find(&self, id: &UserId) -> Result<Option<Account>, DirectoryError> {
        let guard = self.accounts.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableDirectory;

impl AccountDirectory for UnavailableDirectory {
    fn find(&self, _id: &UserId) -> Result<Option<Account>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}

/// Directory that, on every lookup, asks another thread to read the service it is
/// attached to and counts the lookups where that read could not finish.
pub(super) struct ContendedDirectory {
    accounts: MemoryDirectory,
    service: OnceLock<Weak<HousingService<ContendedDirectory, FixedClock>>>,
    blocked_lookups: AtomicUsize,
}

impl ContendedDirectory {
    pub(super) fn new() -> Self {
        Self {
            accounts: MemoryDirectory::with_accounts(accounts()),
            service: OnceLock::new(),
            blocked_lookups: AtomicUsize::new(0),
        }
    }

    pub(super) fn attach(&self, service: &Arc<HousingService<ContendedDirectory, FixedClock>>) {
        assert!(self.service.set(Arc::downgrade(service)).is_ok());
    }

    pub(super) fn blocked_lookups(&self) -> usize {
        self.blocked_lookups.load(Ordering::SeqCst)
    }
}

impl AccountDirectory for ContendedDirectory {
    fn find(&self, id: &UserId) -> Result<Option<Account>, DirectoryError> {
        if let Some(service) = self.service.get().and_then(Weak::upgrade) {
            let (sender, receiver) = mpsc::channel();
            thread::spawn(move || {
                let _ = sender.send(service.inventory().len());
            });
            if receiver.recv_timeout(Duration::from_secs(2)).is_err() {
                self.blocked_lookups.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.accounts.find(id)
    }
}
