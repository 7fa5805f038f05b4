/// Test data factories using builder pattern
///
/// Subjects are GitHub user objects as the API returns them; only the
/// fields the enrichment reads are filled in.
use chrono::{Duration, Utc};
use forklens_lib::modules::backlog::Task;
use forklens_lib::modules::provider::{AccountDto, ForkDto, GithubEvent, SubjectData};
use serde_json::{json, Value};

pub const API: &str = "https://api.github.test";

pub fn user_url(login: &str) -> String {
    format!("{}/users/{}", API, login)
}

pub fn events_url(login: &str) -> String {
    format!("{}/events", user_url(login))
}

pub struct SubjectFactory {
    login: String,
    followers: u64,
    location: Option<String>,
    with_events_url: bool,
}

impl SubjectFactory {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            followers: 0,
            location: None,
            with_events_url: true,
        }
    }

    /// A subject for an arbitrary API URL, login taken from its last segment
    pub fn for_url(url: &str) -> Self {
        let login = url.rsplit('/').next().unwrap_or("ghost");
        Self::new(login)
    }

    pub fn with_followers(mut self, followers: u64) -> Self {
        self.followers = followers;
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn without_events_url(mut self) -> Self {
        self.with_events_url = false;
        self
    }

    pub fn build(self) -> SubjectData {
        let mut value = json!({
            "login": self.login,
            "url": user_url(&self.login),
            "followers": self.followers,
            "location": self.location,
            "type": "User",
        });
        if self.with_events_url {
            value["events_url"] = Value::String(format!("{}{{/privacy}}", events_url(&self.login)));
        }
        serde_json::from_value(value).unwrap()
    }
}

/// `count` events, the newest `age_days` old
pub fn events(count: usize, age_days: i64) -> Vec<GithubEvent> {
    (0..count)
        .map(|i| GithubEvent {
            id: Some(format!("evt-{}", i)),
            event_type: Some("PushEvent".to_string()),
            created_at: Some(Utc::now() - Duration::days(age_days + i as i64)),
        })
        .collect()
}

pub fn account(login: &str) -> AccountDto {
    AccountDto {
        login: login.to_string(),
        url: user_url(login),
    }
}

pub fn fork(owner: &str, repo: &str) -> ForkDto {
    ForkDto {
        full_name: Some(format!("{}/{}", owner, repo)),
        owner: account(owner),
    }
}

pub fn fork_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| Task::fork(user_url(&format!("forker-{}", i))))
        .collect()
}

pub fn stargazer_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| Task::stargazer(user_url(&format!("stargazer-{}", i))))
        .collect()
}
