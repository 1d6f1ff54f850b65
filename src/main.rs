//! tidycsv - clean up a CSV file and report on what is in it

mod config;
mod report;

use anyhow::{Context, Result, bail};
use std::env;
use std::io::{Read, Write};
use std::path::PathBuf;
use tidycsv_core::storage::{parse_csv, read_csv, serialize_csv, write_csv};
use tidycsv_core::{CleanError, Grid, Pipeline, Stage, detect_column_types, generate_insights};
use tidycsv_engine::stats::data_summary;
use tracing::{debug, warn};

use report::{InsightsSection, Report, typed_columns};

fn print_usage() {
    eprintln!("Usage: tidycsv [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    CSV file to clean (stdin when absent or \"-\")");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>       Write cleaned CSV to FILE (default stdout)");
    eprintln!("  -c, --config <FILE>       Load stage switches from a TOML file");
    eprintln!("  --enable <STAGE>          Enable a stage (can be repeated)");
    eprintln!("  --disable <STAGE>         Disable a stage (can be repeated)");
    eprintln!("  --strict                  Re-detect column types after column removal");
    eprintln!("  --types                   Print detected column types");
    eprintln!("  --stats                   Print per-column statistics");
    eprintln!("  --insights                Print insights");
    eprintln!("  --json                    Print reports as JSON");
    eprintln!("  --list-stages             Print stage names in pipeline order");
    eprintln!("  -v, --verbose             Debug logging (RUST_LOG overrides)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    enable: Vec<Stage>,
    disable: Vec<Stage>,
    strict: bool,
    types: bool,
    stats: bool,
    insights: bool,
    json: bool,
    list_stages: bool,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => cli.help = true,
            "-o" | "--output" => cli.output = Some(PathBuf::from(value_for(args, &mut i, "--output")?)),
            "-c" | "--config" => cli.config = Some(PathBuf::from(value_for(args, &mut i, "--config")?)),
            "--enable" => cli.enable.push(value_for(args, &mut i, "--enable")?.parse()?),
            "--disable" => cli.disable.push(value_for(args, &mut i, "--disable")?.parse()?),
            "--strict" => cli.strict = true,
            "--types" => cli.types = true,
            "--stats" => cli.stats = true,
            "--insights" => cli.insights = true,
            "--json" => cli.json = true,
            "--list-stages" => cli.list_stages = true,
            "-v" | "--verbose" => cli.verbose = true,
            "-" => set_input(&mut cli, "-")?,
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => set_input(&mut cli, arg)?,
        }
        i += 1;
    }
    Ok(cli)
}

fn value_for<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value),
        None => bail!("{} requires a value", flag),
    }
}

fn set_input(cli: &mut CliArgs, arg: &str) -> Result<()> {
    if cli.input.is_some() {
        bail!("Unexpected argument: {}", arg);
    }
    cli.input = Some(PathBuf::from(arg));
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: Option<&PathBuf>) -> Result<Grid> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            read_csv(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
            let grid = parse_csv(content);
            if grid.is_empty() {
                return Err(CleanError::EmptyCsv).context("Failed to read stdin");
            }
            Ok(grid)
        }
    }
}

fn run(cli: CliArgs) -> Result<()> {
    if cli.list_stages {
        let mut stdout = std::io::stdout().lock();
        for stage in Stage::ALL {
            writeln!(stdout, "{:<22} {}", stage.name(), stage.description())?;
        }
        return Ok(());
    }

    let (mut options, warnings) = config::load_options(cli.config.as_deref());
    for warning in warnings {
        warn!("{}", warning);
    }
    for &stage in &cli.enable {
        options.set(stage, true);
    }
    for &stage in &cli.disable {
        options.set(stage, false);
    }
    if cli.strict {
        options.recompute_types = true;
    }

    let grid = read_input(cli.input.as_ref())?;
    debug!(rows = grid.len(), "read input");

    let cleaned = Pipeline::new(options).run(&grid);

    match &cli.output {
        Some(path) => write_csv(path, &cleaned)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", serialize_csv(&cleaned))?;
        }
    }

    let types = detect_column_types(&cleaned);
    let report = Report {
        types: cli.types.then(|| typed_columns(&cleaned, &types)),
        stats: cli.stats.then(|| data_summary(&cleaned)),
        insights: cli
            .insights
            .then(|| InsightsSection::new(generate_insights(&cleaned, &types))),
    };
    if report.is_empty() {
        return Ok(());
    }

    let rendered = if cli.json {
        report.to_json()?
    } else {
        report.to_text()
    };
    // Keep stdout pure CSV unless the data went to a file.
    if cli.output.is_some() {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end())?;
    } else {
        eprintln!("{}", rendered.trim_end());
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
