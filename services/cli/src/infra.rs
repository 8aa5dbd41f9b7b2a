use bto_core::workflows::housing::{
    Account, AccountDirectory, DirectoryError, EligibilityConfig, FixedClock, HousingService,
    UserId,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type ConsoleService = HousingService<InMemoryAccountDirectory, FixedClock>;

/// Read-only account lookup built once from seed data.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountDirectory {
    accounts: HashMap<UserId, Account>,
}

impl InMemoryAccountDirectory {
    pub(crate) fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.id.clone(), account))
                .collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.accounts.len()
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn find(&self, id: &UserId) -> Result<Option<Account>, DirectoryError> {
        Ok(self.accounts.get(id).cloned())
    }
}

pub(crate) fn build_service(
    directory: InMemoryAccountDirectory,
    today: NaiveDate,
    eligibility: EligibilityConfig,
) -> ConsoleService {
    HousingService::new(Arc::new(directory), Arc::new(FixedClock(today)), eligibility)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
