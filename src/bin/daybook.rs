use anyhow::Result;
use chrono::NaiveDate;
use daybook::cli::{self, CliArgs, Command};
use daybook::config::Config;
use daybook::context::{AppContext, SharedContext, StandardContext};
use daybook::controller::DiaryController;
use daybook::diary;
use log::LevelFilter;
use serde::Serialize;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Serialize)]
struct DayExport {
    date: NaiveDate,
    entries: Vec<String>,
}

fn init_logging(ctx: &dyn AppContext, verbose: bool) {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = ctx.get_log_file_path()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(&path)
    {
        loggers.push(WriteLogger::new(
            LevelFilter::Info,
            simplelog::Config::default(),
            file,
        ));
    }

    // Only fails if a logger is already installed.
    let _ = CombinedLogger::init(loggers);
}

async fn run(args: CliArgs) -> Result<bool> {
    let ctx: SharedContext = Arc::new(StandardContext::new(args.root));
    init_logging(ctx.as_ref(), args.verbose);

    let config = Config::load_or_init(ctx.as_ref());
    let controller = DiaryController::new(ctx, config);

    match args.command {
        Command::Help => cli::print_help("daybook"),
        Command::List(date) => {
            let date = date.unwrap_or_else(diary::today);
            let entries = controller.entries(date).await;
            if entries.is_empty() {
                println!("No entries for {}", date);
            }
            for entry in entries {
                println!("{}\n", entry);
            }
        }
        Command::Write { date, text } => {
            let date = date.unwrap_or_else(diary::today);
            if !controller.add_entry(date, &text).await {
                eprintln!("Failed to save entry for {}", date);
                return Ok(false);
            }
        }
        Command::Clear(date) => {
            if !controller.clear(date).await {
                eprintln!("Failed to clear {}", date);
                return Ok(false);
            }
        }
        Command::Days => {
            for date in controller.written_dates().await {
                println!("{}", date);
            }
        }
        Command::Usage(date) => {
            let date = date.unwrap_or_else(diary::today);
            match controller.usage_minutes(date).await {
                Some(minutes) => println!("{}: {} min", date, minutes),
                None => println!("{}: no data", date),
            }
        }
        Command::Export => {
            let mut days = Vec::new();
            for date in controller.written_dates().await {
                days.push(DayExport {
                    date,
                    entries: controller.entries(date).await,
                });
            }
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    let raw: Vec<String> = env::args().skip(1).collect();

    let args = match cli::parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'daybook --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    if args.command == Command::Help {
        cli::print_help("daybook");
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
