//! Command-line interface for govsheet
//!
//! Converts the governance spreadsheets into the JSON documents used by the graph UI.
//!
//! Usage:
//!   govsheet activities `<input>` `<output>`     - Activities sheet → objective hierarchy
//!   govsheet tools `<input>` `<output>`          - Tools sheet → tool records
//!   govsheet objectives `<input>` `<output>`     - Objectives sheet → objective records
//!     [--by-id `<path>`]                         - also write them keyed by id
//!   govsheet columns                         - List accepted column headers and readers
//!
//! Global options: `--config <file>` layers a TOML file over the defaults (otherwise
//! `./govsheet.toml` is used when present), `--sort-by-id` / `--keep-order` override the
//! output order, `-v` / `-vv` raise log verbosity (logs go to stderr, `RUST_LOG` wins).

use clap::{Arg, ArgAction, ArgMatches, Command};
use govsheet::columns::ColumnSpec;
use govsheet::registry::SourceRegistry;
use govsheet::source::TableSource;
use govsheet::{ConversionKind, ConversionReport, Converter, ConvertError, Loader, Settings};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some((name @ ("activities" | "tools" | "objectives"), sub_matches)) => {
            handle_convert_command(name, sub_matches);
        }
        Some(("columns", sub_matches)) => {
            handle_columns_command(sub_matches);
        }
        _ => unreachable!(),
    }
}

fn cli() -> Command {
    Command::new("govsheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts governance framework spreadsheets into normalized JSON")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("sort-by-id")
                .long("sort-by-id")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("keep-order")
                .help("Sort output by id"),
        )
        .arg(
            Arg::new("keep-order")
                .long("keep-order")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Keep the sheet's row order in the output"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(conversion_command("activities").about(
            "Convert the activities sheet into the objective → practice → activity hierarchy",
        ))
        .subcommand(conversion_command("tools").about("Convert the tools sheet into tool records"))
        .subcommand(
            conversion_command("objectives")
                .about("Convert the objectives sheet into objective records")
                .arg(
                    Arg::new("by-id")
                        .long("by-id")
                        .help("Also write the records as an object keyed by id"),
                ),
        )
        .subcommand(
            Command::new("columns")
                .about("List the column headers and input formats accepted by each conversion"),
        )
}

fn conversion_command(name: &'static str) -> Command {
    Command::new(name)
        .arg(
            Arg::new("input")
                .help("Spreadsheet to read (xlsx, xls, ods, csv, tsv)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("JSON file to write")
                .required(true)
                .index(2),
        )
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Handle the activities / tools / objectives commands
fn handle_convert_command(name: &str, matches: &ArgMatches) {
    let settings = load_settings(name, matches).unwrap_or_else(|e| exit_with(e));
    let input = Path::new(required(matches, "input"));
    let output = Path::new(required(matches, "output"));

    let converter = Converter::new(settings);
    let result: Result<ConversionReport, ConvertError> = match name {
        "activities" => converter.activities(input, output),
        "tools" => converter.tools(input, output),
        _ => {
            let by_id = matches.get_one::<String>("by-id").map(Path::new);
            converter.objectives(input, output, by_id)
        }
    };

    match result {
        Ok(report) => println!("{}", report),
        Err(e) => exit_with(e),
    }
}

/// Handle the columns command
fn handle_columns_command(matches: &ArgMatches) {
    let settings = load_settings("columns", matches).unwrap_or_else(|e| exit_with(e));

    println!("Accepted column headers (accents, case and spacing are ignored):\n");
    print_specs("activities", &settings.hierarchy.columns.specs());
    print_specs("tools", &settings.tools.columns.specs());
    print_specs("objectives", &settings.objectives.columns.specs());

    println!("Input readers:\n");
    let registry = SourceRegistry::with_defaults();
    for name in registry.list_sources() {
        if let Some(source) = registry.get(&name) {
            println!(
                "  {} (.{}): {}",
                source.name(),
                source.extensions().join(", ."),
                source.description()
            );
        }
    }
}

fn print_specs(title: &str, specs: &[ColumnSpec]) {
    println!("  {}", title);
    for spec in specs {
        let marker = if spec.required { "" } else { " (optional)" };
        println!("    {}{}: {}", spec.canonical, marker, spec.synonyms.join(" | "));
    }
    println!();
}

fn conversion_kind(name: &str) -> Option<ConversionKind> {
    match name {
        "activities" => Some(ConversionKind::Activities),
        "tools" => Some(ConversionKind::Tools),
        "objectives" => Some(ConversionKind::Objectives),
        _ => None,
    }
}

fn load_settings(name: &str, matches: &ArgMatches) -> Result<Settings, ConvertError> {
    let config = matches.get_one::<String>("config").map(Path::new);
    let mut loader = Loader::new().with_user_config(config);

    let sort_by_id = if matches.get_flag("sort-by-id") {
        Some(true)
    } else if matches.get_flag("keep-order") {
        Some(false)
    } else {
        None
    };

    if let (Some(kind), Some(sort_by_id)) = (conversion_kind(name), sort_by_id) {
        loader = loader.with_sort_by_id(kind, sort_by_id)?;
    }

    Ok(loader.build()?)
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_else(|| unreachable!("clap enforces required argument `{id}`"))
}

fn exit_with(error: ConvertError) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}
