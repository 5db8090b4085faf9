//! pomotask - a terminal Pomodoro timer with task accounting
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - a longer break after every 4 pomodoros
//!
//! Finished pomodoros and focus time are credited to the task you pick.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use pomotask::cli::{Cli, Commands, Display, RunArgs, SettingsArgs, SettingsCommand, TaskCommand};
use pomotask::session::{Session, SessionCommand, SessionEvent, SettingChange, UnknownCommand};
use pomotask::settings::SettingsManager;
use pomotask::storage::JsonStorage;
use pomotask::tasks::TaskManager;
use pomotask::timer::Timer;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with the status line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Run(args) => {
            let storage = open_storage(cli.data_file)?;
            run_session(storage, args).await?;
        }
        Commands::Task { action } => {
            let storage = open_storage(cli.data_file)?;
            execute_task(&storage, action)?;
        }
        Commands::Settings { action } => {
            let storage = open_storage(cli.data_file)?;
            execute_settings(&storage, action)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn open_storage(data_file: Option<PathBuf>) -> Result<JsonStorage> {
    let path = match data_file {
        Some(path) => path,
        None => JsonStorage::default_path()?,
    };
    tracing::debug!(path = %path.display(), "using data file");
    Ok(JsonStorage::new(path)?)
}

// ============================================================================
// Task commands
// ============================================================================

fn execute_task(storage: &JsonStorage, action: TaskCommand) -> Result<()> {
    let mut tasks = TaskManager::with_tasks(storage.load_tasks()?);

    match action {
        TaskCommand::Add {
            description,
            pomodoros,
        } => {
            let task = tasks.add_task(&description, pomodoros)?.clone();
            storage.save_tasks(tasks.tasks())?;
            Display::show_task_added(&task);
        }
        TaskCommand::List { hide_completed } => {
            if hide_completed {
                tasks.toggle_show_completed();
            }
            Display::show_task_list(&tasks.filtered_tasks());
        }
        TaskCommand::Done { id } => {
            let id = tasks.resolve(&id)?;
            tasks.toggle_complete(&id);
            storage.save_tasks(tasks.tasks())?;
            if let Some(task) = tasks.get(&id) {
                Display::show_task_toggled(task);
            }
        }
        TaskCommand::Delete { id } => {
            let id = tasks.resolve(&id)?;
            if let Some(task) = tasks.delete_task(&id) {
                storage.save_tasks(tasks.tasks())?;
                Display::show_task_deleted(&task);
            }
        }
    }

    Ok(())
}

// ============================================================================
// Settings commands
// ============================================================================

fn execute_settings(storage: &JsonStorage, action: SettingsCommand) -> Result<()> {
    let manager = SettingsManager::new(storage.load_settings());

    match action {
        SettingsCommand::Show => {}
        SettingsCommand::Set(args) => {
            if args.is_empty() {
                bail!("nothing to change; pass at least one of --focus, --short-break, --long-break, --auto-start-breaks");
            }
            apply_settings(&manager, &args);
            storage.save_settings(&manager.current())?;
        }
    }

    Display::show_settings(&manager.current());
    Ok(())
}

fn apply_settings(manager: &SettingsManager, args: &SettingsArgs) {
    let changes = [
        args.focus.map(SettingChange::FocusMinutes),
        args.short_break.map(SettingChange::ShortBreakMinutes),
        args.long_break.map(SettingChange::LongBreakMinutes),
        args.auto_start_breaks.map(SettingChange::AutoStartBreaks),
    ];
    for change in changes.into_iter().flatten() {
        change.apply(manager);
    }
}

// ============================================================================
// Interactive session
// ============================================================================

async fn run_session(storage: JsonStorage, args: RunArgs) -> Result<()> {
    let settings = SettingsManager::new(storage.load_settings());
    let tasks = TaskManager::with_tasks(storage.load_tasks()?);
    let timer = Timer::new(settings.current()).with_pomodoros_per_cycle(args.cycle);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let mut session = Session::with_timer(timer, tasks, settings, storage, event_tx);
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();
    let render = tokio::spawn(render_events(event_rx, notice_rx));

    if let Some(prefix) = &args.task {
        session
            .select_task(prefix)
            .with_context(|| format!("cannot select task '{prefix}'"))?;
    }
    if args.start {
        session.start()?;
    }

    Display::show_session_help();
    spawn_input_reader(command_tx.clone(), notice_tx);
    spawn_interrupt_handler(command_tx);

    session.run(command_rx).await?;
    drop(session);
    render.await.context("renderer task failed")?;
    println!();
    Ok(())
}

/// Reads stdin lines on a plain thread so a pending read never blocks shutdown.
///
/// Lines that do not parse are handed to the renderer on `notices`.
fn spawn_input_reader(
    tx: mpsc::UnboundedSender<SessionCommand>,
    notices: mpsc::UnboundedSender<UnknownCommand>,
) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let command = match SessionCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    if notices.send(e).is_err() {
                        return;
                    }
                    continue;
                }
            };
            if tx.send(command).is_err() {
                return;
            }
        }
        let _ = tx.send(SessionCommand::Quit);
    });
}

fn spawn_interrupt_handler(tx: mpsc::UnboundedSender<SessionCommand>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(SessionCommand::Quit);
        }
    });
}

/// Sole writer of session output; returns once the session drops its sender.
async fn render_events(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    mut notices: mpsc::UnboundedReceiver<UnknownCommand>,
) {
    let mut task_label: Option<String> = None;

    loop {
        let event = tokio::select! {
            biased;

            Some(unknown) = notices.recv() => SessionEvent::Rejected(unknown.to_string()),
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        match &event {
            SessionEvent::Tick(snapshot) => {
                Display::show_status_line(snapshot, task_label.as_deref());
            }
            SessionEvent::TaskSelected { description, .. } => {
                task_label = Some(description.clone());
                Display::show_session_event(&event);
            }
            SessionEvent::TaskCleared => {
                task_label = None;
                Display::show_session_event(&event);
            }
            _ => Display::show_session_event(&event),
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
