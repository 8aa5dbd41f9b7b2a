//! CSV seed data for accounts and projects.

mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Account, MaritalStatus, ProjectDraft, ProjectId, Role, UserId};
use parser::{AccountRow, ProjectRow};

#[derive(Debug)]
pub enum SeedImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Field {
        line: u64,
        field: &'static str,
        value: String,
    },
    Duplicate {
        line: u64,
        id: String,
    },
}

impl std::fmt::Display for SeedImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedImportError::Io(err) => write!(f, "failed to read seed file: {}", err),
            SeedImportError::Csv(err) => write!(f, "invalid seed CSV data: {}", err),
            SeedImportError::Field { line, field, value } => {
                write!(f, "line {}: invalid {} '{}'", line, field, value)
            }
            SeedImportError::Duplicate { line, id } => {
                write!(f, "line {}: duplicate id '{}'", line, id)
            }
        }
    }
}

impl std::error::Error for SeedImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedImportError::Io(err) => Some(err),
            SeedImportError::Csv(err) => Some(err),
            SeedImportError::Field { .. } | SeedImportError::Duplicate { .. } => None,
        }
    }
}

impl From<std::io::Error> for SeedImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SeedImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A project row paired with the manager who owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedProject {
    pub manager: UserId,
    pub draft: ProjectDraft,
}

/// Everything read from the seed files, ready to hand to a directory and service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSnapshot {
    pub accounts: Vec<Account>,
    pub projects: Vec<SeedProject>,
}

pub struct SeedImporter;

impl SeedImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        accounts: P,
        projects: Option<Q>,
    ) -> Result<SeedSnapshot, SeedImportError> {
        let accounts = Self::accounts_from_reader(std::fs::File::open(accounts)?)?;
        let projects = match projects {
            Some(path) => Self::projects_from_reader(std::fs::File::open(path)?)?,
            None => Vec::new(),
        };
        Ok(SeedSnapshot { accounts, projects })
    }

    /// Read `NRIC,Name,Age,MaritalStatus,Role` rows. A missing role means applicant.
    pub fn accounts_from_reader<R: Read>(reader: R) -> Result<Vec<Account>, SeedImportError> {
        let mut seen = HashSet::new();
        let mut accounts = Vec::new();

        for (line, row) in parser::parse_rows::<_, AccountRow>(reader)? {
            let account = account_from_row(line, row)?;
            if !seen.insert(account.id.clone()) {
                return Err(SeedImportError::Duplicate {
                    line,
                    id: account.id.0,
                });
            }
            accounts.push(account);
        }

        Ok(accounts)
    }

    /// Read project rows. Dates accept `YYYY-MM-DD` or `D/M/YYYY`; `Visible` defaults on.
    pub fn projects_from_reader<R: Read>(reader: R) -> Result<Vec<SeedProject>, SeedImportError> {
        let mut seen = HashSet::new();
        let mut projects = Vec::new();

        for (line, row) in parser::parse_rows::<_, ProjectRow>(reader)? {
            let project = project_from_row(line, row)?;
            if !seen.insert(project.draft.id.clone()) {
                return Err(SeedImportError::Duplicate {
                    line,
                    id: project.draft.id.0,
                });
            }
            projects.push(project);
        }

        Ok(projects)
    }
}

fn account_from_row(line: u64, row: AccountRow) -> Result<Account, SeedImportError> {
    let marital_status: MaritalStatus =
        row.marital_status
            .parse()
            .map_err(|_| SeedImportError::Field {
                line,
                field: "marital status",
                value: row.marital_status.clone(),
            })?;
    let role = match row.role {
        Some(raw) => raw.parse::<Role>().map_err(|_| SeedImportError::Field {
            line,
            field: "role",
            value: raw.clone(),
        })?,
        None => Role::Applicant,
    };
    let id = row.nric.trim().to_ascii_uppercase();
    if id.is_empty() {
        return Err(SeedImportError::Field {
            line,
            field: "NRIC",
            value: row.nric,
        });
    }

    Ok(Account {
        name: if row.name.is_empty() { id.clone() } else { row.name },
        id: UserId(id),
        age: row.age,
        marital_status,
        role,
    })
}

fn project_from_row(line: u64, row: ProjectRow) -> Result<SeedProject, SeedImportError> {
    let date = |field: &'static str, raw: &str| {
        parser::parse_date(raw).ok_or_else(|| SeedImportError::Field {
            line,
            field,
            value: raw.to_string(),
        })
    };
    let opening_date = date("opening date", &row.opening_date)?;
    let closing_date = date("closing date", &row.closing_date)?;
    let visible =
        parser::parse_flag(row.visible.as_deref()).ok_or_else(|| SeedImportError::Field {
            line,
            field: "visibility",
            value: row.visible.clone().unwrap_or_default(),
        })?;

    Ok(SeedProject {
        manager: UserId(row.manager.trim().to_ascii_uppercase()),
        draft: ProjectDraft {
            id: ProjectId(row.project_id),
            name: row.name,
            neighborhood: row.neighborhood,
            two_room_units: row.two_room_units,
            three_room_units: row.three_room_units,
            opening_date,
            closing_date,
            officer_slots: row.officer_slots,
            visible,
        },
    })
}
