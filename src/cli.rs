// File: ./src/cli.rs
//! Command-line argument parsing and help text for the `daybook` binary.
use anyhow::{Result, bail};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Entries for a date (today when `None`), newest first.
    List(Option<NaiveDate>),
    Write { date: Option<NaiveDate>, text: String },
    Clear(NaiveDate),
    Days,
    Usage(Option<NaiveDate>),
    Export,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Parses arguments without the program name.
///
/// Options are only recognized before the command; everything after it is
/// passed to the command untouched.
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;

    let mut idx = 0;
    while let Some(arg) = args.get(idx) {
        match arg.as_str() {
            "-r" | "--root" => {
                let Some(path) = args.get(idx + 1) else {
                    bail!("--root requires a path");
                };
                root = Some(PathBuf::from(path));
                idx += 2;
            }
            "-v" | "--verbose" => {
                verbose = true;
                idx += 1;
            }
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    command: Command::Help,
                });
            }
            _ => break,
        }
    }

    let rest: Vec<&str> = args[idx..].iter().map(String::as_str).collect();

    let command = match rest.as_slice() {
        [] | ["list"] => Command::List(None),
        ["list", date] => Command::List(Some(parse_date(date)?)),
        ["write", "--date"] => bail!("--date requires a date"),
        ["write", "--date", date, words @ ..] => Command::Write {
            date: Some(parse_date(date)?),
            text: words.join(" "),
        },
        ["write", words @ ..] => Command::Write {
            date: None,
            text: words.join(" "),
        },
        ["clear", date] => Command::Clear(parse_date(date)?),
        ["clear"] => bail!("clear requires a date"),
        ["days"] => Command::Days,
        ["usage"] => Command::Usage(None),
        ["usage", date] => Command::Usage(Some(parse_date(date)?)),
        ["export"] => Command::Export,
        [other, ..] => bail!("Unknown command or arguments: '{}'", other),
    };

    if let Command::Write { text, .. } = &command
        && text.trim().is_empty()
    {
        bail!("write requires some text");
    }

    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Daybook v{} - A small daily journal with cached phone-usage stats",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] <command>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    list [YYYY-MM-DD]                 Show entries, newest first (default: today)");
    println!("    write [--date YYYY-MM-DD] <text>  Append a timestamped entry");
    println!("    clear <YYYY-MM-DD>                Remove every entry for a date");
    println!("    days                              List dates that have entries");
    println!("    usage [YYYY-MM-DD]                Show cached phone usage in minutes");
    println!("    export                            Dump all entries as JSON to stdout");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Log debug output to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} write Long walk by the river", binary_name);
    println!("    {} write --date 2025-01-16 Forgot to note the concert", binary_name);
    println!("    {} export > backup.json", binary_name);
}
