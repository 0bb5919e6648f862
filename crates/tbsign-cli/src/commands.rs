//! Command handlers: wire the stores, client, and orchestrator together
//! and render outcomes to the terminal.

use tbsign_batch::{startup_check, Orchestrator, RunObserver, RunState};
use tbsign_client::TiebaClient;
use tbsign_core::{day, AppConfig, CheckInOutcome};
use tbsign_store::{ProgressStore, SettingsStore, PROGRESS_FILE, SETTINGS_FILE};

use crate::ConfigAction;

/// Renders orchestrator callbacks as terminal lines.
struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_state_change(&self, state: RunState) {
        println!("-- {state}");
    }

    fn on_progress(&self, index: usize, total: usize, forum: &str, outcome: &CheckInOutcome) {
        println!("[{}/{total}] {forum}: {}", index + 1, describe(outcome));
    }
}

fn describe(outcome: &CheckInOutcome) -> String {
    match outcome {
        CheckInOutcome::Success {
            gain,
            rank,
            continued,
            total,
            missed,
        } => format!(
            "+{gain} exp, rank {rank} (streak {continued}, total {total}, missed {missed})"
        ),
        CheckInOutcome::Failure {
            message,
            retryable: true,
        } => format!("{message} (retry with `tbsign retry <forum>`)"),
        CheckInOutcome::Failure { message, .. } => message.clone(),
    }
}

fn open_settings(config: &AppConfig) -> anyhow::Result<SettingsStore> {
    Ok(SettingsStore::open(config.data_dir.join(SETTINGS_FILE))?)
}

fn open_progress(config: &AppConfig) -> anyhow::Result<ProgressStore> {
    Ok(ProgressStore::open(config.data_dir.join(PROGRESS_FILE))?)
}

fn open_client(config: &AppConfig) -> anyhow::Result<TiebaClient> {
    Ok(TiebaClient::with_base_urls(
        &config.cookie,
        config.request_timeout_secs,
        &config.web_base_url,
        &config.api_base_url,
    )?)
}

/// Runs a full pass. With `gated`, consults the automatic-run gate first
/// and reports instead of running when no run is due.
pub async fn run(config: &AppConfig, gated: bool) -> anyhow::Result<()> {
    let settings_store = open_settings(config)?;
    let mut progress = open_progress(config)?;
    let settings = settings_store.settings().clone();

    if gated {
        let check = startup_check(&settings, &progress, &config.username, day::today());
        if check.incomplete_previous_run {
            println!("previous run did not complete (crash or concurrent run)");
        }
        if !check.should_run {
            if settings.auto_run {
                println!("today's run already started; nothing to do");
            } else {
                println!("automatic runs are disabled; use `tbsign run`");
            }
            return Ok(());
        }
    }

    let client = open_client(config)?;
    let mut orchestrator = Orchestrator::new(&client, &mut progress, &settings, &config.username);

    // Ctrl-C stops the run before its next forum; the in-flight request
    // still completes.
    let abort = orchestrator.abort_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("abort requested; stopping before the next forum");
            abort.trigger();
        }
    });

    let report = orchestrator.run(&ConsoleObserver).await?;
    if report.aborted {
        println!(
            "aborted after {} of {} forums ({} ok, {} failed)",
            report.success + report.failed,
            report.total,
            report.success,
            report.failed
        );
    } else {
        println!("done: {} ok, {} failed", report.success, report.failed);
    }
    Ok(())
}

pub async fn retry(config: &AppConfig, forum: &str) -> anyhow::Result<()> {
    let mut progress = open_progress(config)?;
    let client = open_client(config)?;
    let settings = open_settings(config)?.settings().clone();

    let mut orchestrator = Orchestrator::new(&client, &mut progress, &settings, &config.username);
    let outcome = orchestrator.retry(forum).await?;
    println!("{forum}: {}", describe(&outcome));
    Ok(())
}

pub fn status(config: &AppConfig) -> anyhow::Result<()> {
    let progress = open_progress(config)?;
    let today = day::today();

    if progress.has_incomplete_run(&config.username) {
        println!("previous run did not complete (crash or concurrent run)");
    }

    let mut success = 0usize;
    let mut failed = 0usize;
    for (forum, outcome) in progress.outcomes_for_day(&config.username, today) {
        if outcome.is_success() {
            success += 1;
        } else {
            failed += 1;
        }
        println!("{forum}: {}", describe(outcome));
    }
    println!("today: {success} ok, {failed} failed");
    Ok(())
}

pub fn config(config: &AppConfig, action: &ConfigAction) -> anyhow::Result<()> {
    let mut store = open_settings(config)?;
    match action {
        ConfigAction::Show => {
            let s = store.settings();
            println!("interval_ms: {}", s.interval_ms);
            println!("auto_run:    {}", s.auto_run);
            println!("widget_pos:  {}%, {}%", s.widget_pos.0, s.widget_pos.1);
            println!("blacklist:   {:?}", s.blacklist);
        }
        ConfigAction::SetInterval { ms } => {
            anyhow::ensure!(*ms > 0, "interval must be positive");
            store.update(|s| s.interval_ms = *ms)?;
        }
        ConfigAction::SetAutoRun { enabled } => store.update(|s| s.auto_run = *enabled)?,
        ConfigAction::SetWidgetPos { x, y } => store.update(|s| s.widget_pos = (*x, *y))?,
        ConfigAction::BlacklistAdd { forum } => {
            if !store.blacklist_add(forum)? {
                println!("{forum} is already blacklisted");
            }
        }
        ConfigAction::BlacklistRemove { forum } => {
            if !store.blacklist_remove(forum)? {
                println!("{forum} was not blacklisted");
            }
        }
    }
    Ok(())
}
