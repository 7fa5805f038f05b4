use crate::modules::results::ResultSet;
use crate::modules::run::{RunProgress, RunSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A GitHub user object, kept as received so every original field survives
/// into the enriched record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectData(pub Map<String, Value>);

impl SubjectData {
    pub fn login(&self) -> Option<&str> {
        self.0.get("login").and_then(Value::as_str)
    }

    pub fn followers(&self) -> u64 {
        self.0.get("followers").and_then(Value::as_u64).unwrap_or(0)
    }

    /// Free-form location, `None` when absent or blank
    pub fn location(&self) -> Option<&str> {
        self.0
            .get("location")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    /// `events_url` as published, possibly still a URI template
    pub fn events_url(&self) -> Option<&str> {
        self.0.get("events_url").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDto {
    pub login: String,
    /// API URL of the account, used as the task subject
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkDto {
    pub full_name: Option<String>,
    pub owner: AccountDto,
}

/// Stargazer listings return the account object directly
pub type StargazerDto = AccountDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimAddress {
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominatimPlace {
    /// Nominatim returns coordinates as strings
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

/// Body POSTed to the results backend at finalize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub run_id: Option<Uuid>,
    pub repository: String,
    pub settings: RunSettings,
    pub progress: RunProgress,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
    pub results: ResultSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Accepts both numeric and string ids from the backend
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}
