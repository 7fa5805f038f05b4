use crate::modules::backlog::TaskCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flags derived from a subject's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlags {
    pub event_count: usize,
    pub is_real_user: bool,
    pub is_active_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// The fetched subject with derived fields merged on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedUser {
    /// Original subject fields, kept verbatim
    #[serde(flatten)]
    pub subject: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    pub event_count: usize,
    pub is_real_user: bool,
    pub is_active_user: bool,
}

impl EnrichedUser {
    pub fn merge(subject: Map<String, Value>, flags: UserFlags, geo: Option<GeoLocation>) -> Self {
        let (country, lat, lon) = match geo {
            Some(geo) => (geo.country, Some(geo.lat), Some(geo.lon)),
            None => (None, None, None),
        };

        Self {
            subject,
            country,
            lat,
            lon,
            event_count: flags.event_count,
            is_real_user: flags.is_real_user,
            is_active_user: flags.is_active_user,
        }
    }

    pub fn login(&self) -> Option<&str> {
        self.subject.get("login").and_then(Value::as_str)
    }
}

/// Category -> subject URL -> record. Keys matter, insertion order does not:
/// overlapping enrichments land out of dequeue order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(BTreeMap<TaskCategory, BTreeMap<String, EnrichedUser>>);

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any previous record for the same key
    pub fn insert(&mut self, category: TaskCategory, subject_url: String, record: EnrichedUser) {
        self.0.entry(category).or_default().insert(subject_url, record);
    }

    pub fn get(&self, category: TaskCategory, subject_url: &str) -> Option<&EnrichedUser> {
        self.0.get(&category).and_then(|records| records.get(subject_url))
    }

    pub fn category(&self, category: TaskCategory) -> Option<&BTreeMap<String, EnrichedUser>> {
        self.0.get(&category)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, &String, &EnrichedUser)> {
        self.0.iter().flat_map(|(category, records)| {
            records.iter().map(move |(url, record)| (*category, url, record))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subject(login: &str) -> Map<String, Value> {
        match json!({"login": login, "followers": 2, "location": "Oslo"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = EnrichedUser::merge(
            subject("octocat"),
            UserFlags {
                event_count: 4,
                is_real_user: true,
                is_active_user: false,
            },
            Some(GeoLocation {
                country: Some("Norway".to_string()),
                lat: 59.91,
                lon: 10.75,
            }),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["login"], "octocat");
        assert_eq!(json["eventCount"], 4);
        assert_eq!(json["isRealUser"], true);
        assert_eq!(json["country"], "Norway");

        let back: EnrichedUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_geo_fields_omitted_without_location() {
        let record = EnrichedUser::merge(subject("ghost"), UserFlags::default(), None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("lat").is_none());
        assert!(json.get("country").is_none());
    }

    #[test]
    fn test_insert_overwrites_same_key() {
        let mut results = ResultSet::new();
        let url = "https://api.github.com/users/octocat".to_string();
        results.insert(
            TaskCategory::Fork,
            url.clone(),
            EnrichedUser::merge(subject("old"), UserFlags::default(), None),
        );
        results.insert(
            TaskCategory::Fork,
            url.clone(),
            EnrichedUser::merge(subject("new"), UserFlags::default(), None),
        );
        results.insert(
            TaskCategory::Stargazer,
            url.clone(),
            EnrichedUser::merge(subject("star"), UserFlags::default(), None),
        );

        assert_eq!(results.len(), 2);
        assert_eq!(
            results.get(TaskCategory::Fork, &url).unwrap().login(),
            Some("new")
        );
    }

    #[test]
    fn test_categories_serialize_as_keys() {
        let mut results = ResultSet::new();
        results.insert(
            TaskCategory::Stargazer,
            "u".to_string(),
            EnrichedUser::merge(subject("a"), UserFlags::default(), None),
        );
        let json = serde_json::to_value(&results).unwrap();
        assert!(json["STARGAZER"]["u"].is_object());
    }
}
