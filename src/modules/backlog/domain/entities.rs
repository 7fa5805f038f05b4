/// Domain entities for the enrichment backlog
use serde::{Deserialize, Serialize};

/// Where a subject was found in the inspected repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    Fork,
    Stargazer,
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskCategory::Fork => write!(f, "FORK"),
            TaskCategory::Stargazer => write!(f, "STARGAZER"),
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FORK" | "FORKS" => Ok(TaskCategory::Fork),
            "STARGAZER" | "STARGAZERS" => Ok(TaskCategory::Stargazer),
            _ => Err(format!("Invalid task category: {}", s)),
        }
    }
}

/// One subject awaiting enrichment. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub category: TaskCategory,
    #[serde(rename = "subjectURL")]
    pub subject_url: String,
}

impl Task {
    pub fn new(category: TaskCategory, subject_url: impl Into<String>) -> Self {
        Self {
            category,
            subject_url: subject_url.into(),
        }
    }

    pub fn fork(subject_url: impl Into<String>) -> Self {
        Self::new(TaskCategory::Fork, subject_url)
    }

    pub fn stargazer(subject_url: impl Into<String>) -> Self {
        Self::new(TaskCategory::Stargazer, subject_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(TaskCategory::Fork.to_string(), "FORK");
        assert_eq!(TaskCategory::Stargazer.to_string(), "STARGAZER");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("fork".parse::<TaskCategory>().unwrap(), TaskCategory::Fork);
        assert_eq!(
            "Stargazers".parse::<TaskCategory>().unwrap(),
            TaskCategory::Stargazer
        );
        assert!("watcher".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn test_task_wire_shape() {
        let task = Task::fork("https://api.github.com/users/octocat");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["category"], "FORK");
        assert_eq!(json["subjectURL"], "https://api.github.com/users/octocat");
    }
}
