use anyhow::Context;
use clap::{Parser, Subcommand};
use forklens_lib::modules::processor::ResumeOutcome;
use forklens_lib::modules::run::{RunSettings, RunState};
use forklens_lib::shared::utils::logger::init_logger;
use forklens_lib::shared::AppConfig;
use forklens_lib::{AppServices, AppStores};

#[derive(Parser, Debug)]
#[command(name = "forklens", about = "Enrich a repository's forks and stargazers")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List forks and stargazers of owner/repo and process them
    Inspect {
        repository: String,
        /// Geocode user locations (slower pacing)
        #[arg(long)]
        geocode: bool,
        #[arg(long)]
        no_forks: bool,
        #[arg(long)]
        no_stargazers: bool,
        /// Listing pages of 100 fetched per category
        #[arg(long, default_value_t = 10)]
        max_pages: u32,
    },
    /// Continue an interrupted run from its last snapshot
    Resume,
    /// Deactivate the current run; its processor stops on the next tick
    Cancel,
    /// Show the current run and recent history
    Status {
        #[arg(long, default_value_t = 5)]
        history: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();
    let config = AppConfig::from_env().context("loading configuration")?;
    let stores = AppStores::from_config(&config).context("opening storage")?;

    match args.cmd {
        Cmd::Inspect {
            repository,
            geocode,
            no_forks,
            no_stargazers,
            max_pages,
        } => {
            let services = AppServices::from_config(&config, stores)?;
            let settings = RunSettings {
                include_forks: !no_forks,
                include_stargazers: !no_stargazers,
                max_pages,
                ..RunSettings::for_repository(repository.clone()).with_geocoding(geocode)
            };

            let summary = services
                .inspection
                .inspect(&repository, settings)
                .await
                .with_context(|| format!("inspecting {}", repository))?;
            println!(
                "{}: queued {} forks and {} stargazers",
                summary.repository, summary.forks, summary.stargazers
            );

            wait_for_run(&services).await?;
        }
        Cmd::Resume => {
            let services = AppServices::from_config(&config, stores)?;
            match services.processor.continue_from_run().await? {
                ResumeOutcome::Resumed if services.processor.is_running().await => {
                    let progress = services.processor.progress().await?;
                    println!("Resumed at {}/{}", progress.current, progress.max);
                    wait_for_run(&services).await?;
                }
                ResumeOutcome::Resumed => println!("Restored a run that is no longer active"),
                ResumeOutcome::Fresh => println!("Nothing to resume"),
                ResumeOutcome::Discarded => println!("Discarded the snapshot of a cancelled run"),
                ResumeOutcome::AlreadyRunning => println!("Already running"),
            }
        }
        Cmd::Cancel => {
            if !stores.durable {
                anyhow::bail!("cancel needs DATABASE_URL: in-memory runs live in their own process");
            }
            let mut state = stores.run_store.get().await?;
            if !state.active {
                println!("No active run");
                return Ok(());
            }
            state.active = false;
            stores.run_store.set(&state).await?;
            println!("Run for {} deactivated", state.settings.repository);
        }
        Cmd::Status { history } => {
            let state = stores.run_store.get().await?;
            print_state("current", &state);
            for entry in stores.history.list(history).await? {
                print_state("history", &entry);
            }
        }
    }

    Ok(())
}

/// Block until the run finalizes. Ctrl-C leaves the snapshot for `resume`.
async fn wait_for_run(services: &AppServices) -> anyhow::Result<()> {
    tokio::select! {
        _ = services.processor.wait_until_idle() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for ctrl-c")?;
            println!("Interrupted; run `forklens resume` to continue");
            return Ok(());
        }
    }

    if let Some(last) = services.stores.history.list(1).await?.into_iter().next() {
        print_state("finished", &last);
    }
    Ok(())
}

fn print_state(label: &str, state: &RunState) {
    if state.run_id.is_none() && !state.active {
        println!("[{}] idle", label);
        return;
    }

    let outcome = if state.is_terminal() {
        let result = state.result_id.as_ref().map(|id| format!(" result={}", id));
        let error = state.error.as_ref().map(|e| format!(" error={}", e));
        format!("{}{}", result.unwrap_or_default(), error.unwrap_or_default())
    } else {
        String::new()
    };

    println!(
        "[{}] {} stage={} active={} progress={}/{} ({:.0}%){}",
        label,
        state.settings.repository,
        state.stage,
        state.active,
        state.progress.current,
        state.progress.max,
        state.progress.ratio() * 100.0,
        outcome,
    );
}
