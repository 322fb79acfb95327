use clap::Parser;
use colored::control as color_control;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod domain;
mod registry;
mod services;

use cli::{Cli, Commands};
use commands::{handle_admin_commands, handle_runtime_commands};
use domain::errors::CommandRemovedError;
use domain::models::{
    ColorChoice, LifecycleReport, ListItem, LoginReport, LoginResponse, MetaCache, Settings,
    Severity,
};
use registry::{CommandHandler, CommandNode, CommandTree, Context, Streams};
use services::compose::{wrap, Guarded, Phase};
use services::metadata::{sync, SyncReport};
use services::output::{print_one, print_out};
use services::render::{render_removed, severity, AnsiPaint, Paint, PlainPaint};
use services::storage::{cleanup, load_meta_cache, load_settings, meta_cache_path, save_meta_cache};

/// Exit status of a command blocked after its removal date.
const EXIT_COMMAND_REMOVED: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse()
        .lift_tree_globals()
        .unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    // Admin commands repair local state, so they run before settings load.
    match handle_admin_commands(&cli) {
        Ok(true) => return ExitCode::SUCCESS,
        Ok(false) => {}
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    }

    let settings = match load_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let paint = select_paint(&cli, settings.color);

    match run(&cli, &settings, paint.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<CommandRemovedError>() {
            Some(removed) => {
                eprint!("{}", paint.paint(&render_removed(removed), Severity::Urgent));
                ExitCode::from(EXIT_COMMAND_REMOVED)
            }
            None => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli, settings: &Settings, paint: &dyn Paint) -> anyhow::Result<()> {
    // The only clock read of the invocation.
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let session = commands::Session::open(settings, today)?;
    handle_runtime_commands(cli, &session, paint)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn select_paint(cli: &Cli, choice: ColorChoice) -> Box<dyn Paint> {
    let disabled =
        cli.no_color || std::env::var_os("NO_COLOR").is_some() || choice == ColorChoice::Never;
    if disabled {
        color_control::set_override(false);
        return Box::new(PlainPaint);
    }
    if choice == ColorChoice::Always || std::io::stderr().is_terminal() {
        color_control::set_override(true);
        return Box::new(AnsiPaint);
    }
    Box::new(PlainPaint)
}
