/// InspectionService - entry point of a run
///
/// Lists the repository's forks and stargazers, turns every account into an
/// enrichment task and hands the backlog to the queue processor.
use crate::modules::backlog::{Task, TaskCategory};
use crate::modules::inspection::domain::repository_name::RepositoryName;
use crate::modules::processor::{QueueProcessor, StartOutcome};
use crate::modules::provider::infrastructure::github::PAGE_SIZE;
use crate::modules::provider::GithubApi;
use crate::modules::results::ResultStore;
use crate::modules::run::{RunSettings, RunState, RunStore};
use crate::shared::errors::{AppError, AppResult, FetchError};
use crate::shared::utils::logger::TimedOperation;
use crate::{log_debug, log_info, log_warn};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionSummary {
    pub repository: String,
    pub forks: usize,
    pub stargazers: usize,
    pub outcome: StartOutcome,
}

impl InspectionSummary {
    pub fn total(&self) -> usize {
        self.forks + self.stargazers
    }
}

pub struct InspectionService {
    github: Arc<dyn GithubApi>,
    processor: QueueProcessor,
    run_store: Arc<dyn RunStore>,
    result_store: Arc<dyn ResultStore>,
}

impl InspectionService {
    pub fn new(
        github: Arc<dyn GithubApi>,
        processor: QueueProcessor,
        run_store: Arc<dyn RunStore>,
        result_store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            github,
            processor,
            run_store,
            result_store,
        }
    }

    /// Populate the backlog for `repository` and start processing it.
    ///
    /// `settings.repository` is overwritten with the normalized name.
    pub async fn inspect(
        &self,
        repository: &str,
        mut settings: RunSettings,
    ) -> AppResult<InspectionSummary> {
        let repository = RepositoryName::parse(repository)?;
        settings.repository = repository.to_string();

        if self.processor.is_running().await || self.run_store.get().await?.active {
            return Err(AppError::InvalidInput(format!(
                "A run is already active; cancel it before inspecting {}",
                repository
            )));
        }

        let timer = TimedOperation::new("populate backlog");
        self.processor.reset_backlog().await?;
        self.result_store.refresh().await?;
        self.run_store
            .set(&RunState::requested(settings.clone()))
            .await?;

        let tasks = match self.collect_tasks(&repository, &settings).await {
            Ok(tasks) => tasks,
            Err(e) => {
                // Population failed before anything was queued: release the run
                log_warn!("Listing {} failed: {}", repository, e);
                self.run_store.reset().await?;
                return Err(e.into());
            }
        };

        let forks = tasks
            .iter()
            .filter(|task| task.category == TaskCategory::Fork)
            .count();
        let stargazers = tasks.len() - forks;
        self.processor.enqueue(tasks).await;
        timer.finish_with_info(&format!(
            "{}: {} forks, {} stargazers",
            repository, forks, stargazers
        ));

        let outcome = self.processor.start(settings).await?;
        log_info!(
            "Inspection of {} queued {} tasks ({:?})",
            repository,
            forks + stargazers,
            outcome
        );

        Ok(InspectionSummary {
            repository: repository.to_string(),
            forks,
            stargazers,
            outcome,
        })
    }

    async fn collect_tasks(
        &self,
        repository: &RepositoryName,
        settings: &RunSettings,
    ) -> Result<Vec<Task>, FetchError> {
        let name = repository.to_string();
        let mut tasks = Vec::new();

        if settings.include_forks {
            let mut seen = HashSet::new();
            for page in 1..=settings.max_pages {
                let forks = self.github.list_forks(&name, page).await?;
                let last_page = forks.len() < PAGE_SIZE as usize;
                for fork in forks {
                    if seen.insert(fork.owner.url.clone()) {
                        tasks.push(Task::fork(fork.owner.url));
                    }
                }
                log_debug!("{} forks page {}: {} owners so far", name, page, seen.len());
                if last_page {
                    break;
                }
            }
        }

        if settings.include_stargazers {
            let mut seen = HashSet::new();
            for page in 1..=settings.max_pages {
                let stargazers = self.github.list_stargazers(&name, page).await?;
                let last_page = stargazers.len() < PAGE_SIZE as usize;
                for account in stargazers {
                    if seen.insert(account.url.clone()) {
                        tasks.push(Task::stargazer(account.url));
                    }
                }
                log_debug!("{} stargazers page {}: {} so far", name, page, seen.len());
                if last_page {
                    break;
                }
            }
        }

        Ok(tasks)
    }
}
