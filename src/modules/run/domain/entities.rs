/// Domain entities for a single inspection run
///
/// `RunState` is the record observers poll: it is written by the processor and
/// read (and deactivated) by whoever controls the run.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStage {
    #[default]
    Idle,
    FetchingUsers,
    Done,
    Error,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStage::Idle => write!(f, "idle"),
            RunStage::FetchingUsers => write!(f, "fetching_users"),
            RunStage::Done => write!(f, "done"),
            RunStage::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for RunStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(RunStage::Idle),
            "fetching_users" => Ok(RunStage::FetchingUsers),
            "done" => Ok(RunStage::Done),
            "error" => Ok(RunStage::Error),
            _ => Err(format!("Invalid run stage: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunSettings {
    /// `owner/name` of the inspected repository
    pub repository: String,
    pub geocode_enabled: bool,
    pub include_forks: bool,
    pub include_stargazers: bool,
    /// Upper bound on listing pages fetched per category
    pub max_pages: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            repository: String::new(),
            geocode_enabled: false,
            include_forks: true,
            include_stargazers: true,
            max_pages: 10,
        }
    }
}

impl RunSettings {
    pub fn for_repository(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }

    pub fn with_geocoding(mut self, enabled: bool) -> Self {
        self.geocode_enabled = enabled;
        self
    }
}

/// Dispatched-so-far over total. Counts tasks handed to enrichment, not
/// tasks whose enrichment has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunProgress {
    pub current: usize,
    pub max: usize,
}

impl RunProgress {
    pub fn new(current: usize, max: usize) -> Self {
        Self { current, max }
    }

    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f64 / self.max as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunState {
    pub run_id: Option<Uuid>,
    pub active: bool,
    pub stage: RunStage,
    pub settings: RunSettings,
    pub progress: RunProgress,
    pub result_id: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunState {
    /// A freshly requested run: IDLE but already marked active
    pub fn requested(settings: RunSettings) -> Self {
        Self {
            run_id: Some(Uuid::new_v4()),
            active: true,
            stage: RunStage::Idle,
            settings,
            ..Default::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.stage, RunStage::Done | RunStage::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trips_through_str() {
        for stage in [
            RunStage::Idle,
            RunStage::FetchingUsers,
            RunStage::Done,
            RunStage::Error,
        ] {
            assert_eq!(stage.to_string().parse::<RunStage>().unwrap(), stage);
        }
        assert!("paused".parse::<RunStage>().is_err());
    }

    #[test]
    fn test_default_state_is_idle_and_inactive() {
        let state = RunState::default();
        assert_eq!(state.stage, RunStage::Idle);
        assert!(!state.active);
        assert!(state.run_id.is_none());
    }

    #[test]
    fn test_requested_state_is_active() {
        let state = RunState::requested(RunSettings::for_repository("rust-lang/rust"));
        assert!(state.active);
        assert_eq!(state.stage, RunStage::Idle);
        assert!(state.run_id.is_some());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: RunSettings =
            serde_json::from_value(serde_json::json!({"repository": "a/b", "geocodeEnabled": true}))
                .unwrap();
        assert!(settings.geocode_enabled);
        assert!(settings.include_forks);
        assert_eq!(settings.max_pages, 10);
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(RunProgress::new(0, 0).ratio(), 0.0);
        assert_eq!(RunProgress::new(5, 20).ratio(), 0.25);
    }
}
