use std::env;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use sighting_parser::{MessageParser, ParserConfig, SightingRecord};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract sighting reports from chat messages", long_about = None)]
struct Cli {
    /// Parser config (TOML); falls back to SIGHTING_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a message from a file (or stdin) into sighting records
    Parse(ParseArgs),
    /// Resolve a relative duration such as "14m 9s" to an absolute time
    Duration {
        text: String,
    },
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// File holding the message; reads stdin when omitted
    file: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let parser = build_parser(cli.config)?;

    match cli.command {
        Command::Parse(args) => handle_parse(&parser, args),
        Command::Duration { text } => {
            let expiration = parser.parse_duration(&text);
            println!("{}", expiration.to_rfc3339_opts(SecondsFormat::Secs, true));
            Ok(())
        }
    }
}

fn build_parser(config_path: Option<PathBuf>) -> Result<MessageParser> {
    let config_path = config_path.or_else(|| env::var_os("SIGHTING_CONFIG").map(PathBuf::from));
    let config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "Loading parser config");
            ParserConfig::load(&path)
                .with_context(|| format!("Failed to load config from '{}'", path.display()))?
        }
        None => ParserConfig::default(),
    };
    MessageParser::new(&config).context("Invalid parser config")
}

fn read_message(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file '{}'", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read message from stdin"),
    }
}

fn handle_parse(parser: &MessageParser, args: ParseArgs) -> Result<()> {
    let message = read_message(args.file.as_deref())?;
    let records = parser.parse_message(&message);
    info!(records = records.len(), "Parsed message");

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Table => println!("{}", render_table(&records)),
    }
    Ok(())
}

fn render_table(records: &[SightingRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Latitude", "Longitude", "IV", "Expires"]);
    for record in records {
        table.add_row(vec![
            record.subject.to_string(),
            record.latitude.to_string(),
            record.longitude.to_string(),
            record.quality.to_string(),
            record
                .expiration
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ]);
    }
    table
}
