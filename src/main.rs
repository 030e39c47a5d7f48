mod debug_report;

use chrono::{NaiveDateTime, Utc};
use parvaz::{AliasTable, Context, Options, RawPost, extract_verbose_with};
use std::fs::File;
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let table = match load_table(&config) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let post = RawPost {
        message_id: 0,
        posted_at: Utc::now(),
        text: config.input.clone(),
        source_ref: None,
    };
    let ctx = match config.reference_time {
        Some(reference_time) => Context { reference_time },
        None => Context { reference_time: Utc::now().naive_utc() },
    };
    let opts = Options::default();
    let (record, trace) = extract_verbose_with(&post, &table, &ctx, &opts);

    if config.json {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to serialize record: {err}");
                std::process::exit(1);
            }
        }
    } else {
        debug_report::print_run(&config.input, &record, &trace, config.color);
    }
}

struct CliConfig {
    input: String,
    aliases: Option<String>,
    degraded: bool,
    reference_time: Option<NaiveDateTime>,
    json: bool,
    color: bool,
}

fn load_table(config: &CliConfig) -> Result<AliasTable, String> {
    if config.degraded {
        return Ok(AliasTable::degraded());
    }
    match &config.aliases {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| format!("failed to open alias table '{path}': {err}"))?;
            AliasTable::from_json_reader(file)
                .map_err(|err| format!("failed to load alias table '{path}': {err}"))
        }
        None => Ok(AliasTable::builtin()),
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut aliases: Option<String> = None;
    let mut degraded = false;
    let mut reference_time: Option<NaiveDateTime> = None;
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("parvaz {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--json" => json = true,
            "--degraded" => degraded = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--reference" => {
                let value = args.next().ok_or_else(|| "error: --reference expects a value".to_string())?;
                reference_time = Some(parse_reference(&value)?);
            }
            "--aliases" => {
                let value = args.next().ok_or_else(|| "error: --aliases expects a path".to_string())?;
                aliases = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--reference=") => {
                let value = arg.trim_start_matches("--reference=");
                reference_time = Some(parse_reference(value)?);
            }
            _ if arg.starts_with("--aliases=") => {
                aliases = Some(arg.trim_start_matches("--aliases=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    if degraded && aliases.is_some() {
        return Err("error: --degraded and --aliases are mutually exclusive".to_string());
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, aliases, degraded, reference_time, json, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "parvaz {version}

Structured trip extraction from free-text travel posts.

Usage:
  parvaz [OPTIONS] [--] <input...>
  parvaz [OPTIONS] --input <text>

Options:
  -i, --input <text>         Post text to extract from. If omitted, reads
                             remaining args or stdin when no args are provided.
  --aliases <path>           City alias table (JSON). Default: bundled table.
  --degraded                 Run with an empty alias table (no city codes).
  --reference <timestamp>    Reference time in YYYY-MM-DDTHH:MM:SS.
                             Default: the current time.
  --json                     Print the record as JSON instead of a report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Internal error (unreadable alias table, serialization failure).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
