use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pomodoro_timer::alerts::notifier::{
    BackgroundNotifier, ConsoleNotifier, DesktopNotifier, FallbackNotifier,
};
use pomodoro_timer::alerts::sounder::{RodioSounder, SilentSounder, load_system_sound};
use pomodoro_timer::config::Args;
use pomodoro_timer::console::console::{run_console, spawn_stdin_reader};
use pomodoro_timer::display::terminal::TerminalDisplay;
use pomodoro_timer::pomodoro::collaborators::{Collaborators, Notifier, Sounder};
use pomodoro_timer::pomodoro::duration::format_hms;
use pomodoro_timer::{IntervalTimer, PomodoroMode, spawn_timer};

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("invalid log filter: {}", args.log_level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match args.log {
        Some(ref path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn build_notifier(args: &Args) -> anyhow::Result<Box<dyn Notifier>> {
    if args.no_notify {
        return Ok(Box::new(ConsoleNotifier));
    }
    let desktop = FallbackNotifier::new(DesktopNotifier, ConsoleNotifier);
    let background =
        BackgroundNotifier::spawn(desktop).context("starting notification worker")?;
    Ok(Box::new(background))
}

fn build_sounder(args: &Args) -> Box<dyn Sounder> {
    if args.no_sound {
        return Box::new(SilentSounder);
    }
    match load_system_sound(args.sound.as_deref()) {
        Some(path) => Box::new(RodioSounder::new(path)),
        None => Box::new(SilentSounder),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.timer_config()?;
    println!("🍅 Pomodoro Timer");
    println!("======================================================");
    println!(
        "Intervals: {} work / {} short break / {} long break",
        format_hms(config.duration_for(PomodoroMode::Work)),
        format_hms(config.duration_for(PomodoroMode::ShortBreak)),
        format_hms(config.duration_for(PomodoroMode::LongBreak))
    );
    println!("Type 'help' for commands, 'start' to begin. Ctrl+C to quit.\n");

    let collaborators = Collaborators {
        display: Box::new(TerminalDisplay::new(args.format)),
        notifier: build_notifier(&args)?,
        sounder: build_sounder(&args),
    };
    let mut timer = IntervalTimer::new(config, collaborators);
    timer.redraw();
    let (handle, task) = spawn_timer(timer);

    if args.autostart {
        handle.start().await?;
    }

    let lines = spawn_stdin_reader().context("starting input reader")?;
    tokio::select! {
        result = run_console(handle.clone(), lines, args.format) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    handle.shutdown()?;
    let timer = task.await.context("timer task failed")?;

    println!("\n--- Session Summary ---");
    println!("Pomodoros completed: {}", timer.completed_work_count());
    println!(
        "Stopped in {} {} with {} left",
        timer.current_mode().emoji(),
        timer.current_mode().as_str(),
        format_hms(timer.remaining_seconds())
    );
    println!("-----------------------");
    Ok(())
}
