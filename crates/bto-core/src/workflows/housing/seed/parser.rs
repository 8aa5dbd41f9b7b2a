use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct AccountRow {
    #[serde(rename = "NRIC")]
    pub(crate) nric: String,
    #[serde(rename = "Name", default)]
    pub(crate) name: String,
    #[serde(rename = "Age")]
    pub(crate) age: u8,
    #[serde(rename = "MaritalStatus")]
    pub(crate) marital_status: String,
    #[serde(rename = "Role", default, deserialize_with = "empty_string_as_none")]
    pub(crate) role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRow {
    #[serde(rename = "ProjectID")]
    pub(crate) project_id: String,
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Neighborhood")]
    pub(crate) neighborhood: String,
    #[serde(rename = "TwoRoomUnits")]
    pub(crate) two_room_units: u32,
    #[serde(rename = "ThreeRoomUnits")]
    pub(crate) three_room_units: u32,
    #[serde(rename = "OpeningDate")]
    pub(crate) opening_date: String,
    #[serde(rename = "ClosingDate")]
    pub(crate) closing_date: String,
    #[serde(rename = "Manager")]
    pub(crate) manager: String,
    #[serde(rename = "OfficerSlots")]
    pub(crate) officer_slots: u32,
    #[serde(rename = "Visible", default, deserialize_with = "empty_string_as_none")]
    pub(crate) visible: Option<String>,
}

pub(crate) fn parse_rows<R, T>(reader: R) -> Result<Vec<(u64, T)>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        rows.push((line, record.deserialize(Some(&headers))?));
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts ISO dates and the day-first `d/m/yyyy` form used by the housing board's sheets.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Some(true),
        Some(raw) => match raw.as_str() {
            "true" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" => Some(false),
            _ => None,
        },
    }
}
