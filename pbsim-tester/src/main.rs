mod logic;
mod scenarios;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use pbsim_game::{ConfigTable, LeagueBenchmarks};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use logic::{RunSettings, ScenarioResult, resolve_seed_inputs, run_scenario};
use scenarios::{expand_scenarios, get_scenario, list_scenarios};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "pbsim-tester", version = "0.1.0")]
#[command(about = "Calibration harness for the pbsim engine")]
#[command(long_about = "Simulates seeded leagues of generated rosters and checks league rates \
                        against benchmark targets")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "league")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; accepts 0x hex and a..b / a..=b ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games simulated per scenario and seed
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Regulation innings per game
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u8).range(1..=30))]
    innings: u8,

    /// JSON object of play-balance overrides applied on top of the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON benchmark table replacing the built-in league targets
    #[arg(long)]
    benchmarks: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit with status 1 when any benchmark misses its tolerance
    #[arg(long)]
    enforce_targets: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    if shows_progress(&args) {
        announce_banner();
    }

    let start_time = Instant::now();
    let cfg = load_config(args.config.as_deref())?;
    let benchmarks = load_benchmarks(args.benchmarks.as_deref())?;
    log::info!(
        "config fingerprint {:016x} ({} overrides), {} benchmarks",
        cfg.fingerprint(),
        cfg.overrides().count(),
        benchmarks.len()
    );

    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;
    let settings = RunSettings {
        games: args.games,
        innings: args.innings,
        verbose: args.verbose,
    };

    let mut results: Vec<ScenarioResult> = Vec::new();
    for scenario_name in expand_scenarios(&split_csv(&args.scenarios)) {
        let Some(scenario) = get_scenario(&scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        for seed_info in &seed_infos {
            if shows_progress(&args) {
                println!(
                    "🏟️  {} seed {} - {} games",
                    scenario.key.bright_yellow(),
                    seed_info.seed,
                    settings.games
                );
            }
            results.push(run_scenario(
                &cfg,
                &benchmarks,
                &scenario,
                seed_info,
                &settings,
            )?);
        }
    }
    if results.is_empty() {
        bail!("No known scenarios in: {}", args.scenarios);
    }

    write_reports(&args, &results, start_time)?;

    if args.enforce_targets && results.iter().any(|r| !r.passed) {
        for result in results.iter().filter(|r| !r.passed) {
            for miss in result.misses() {
                eprintln!(
                    "❌ {} seed {}: {} = {:.3} (target {:.3} ± {:.3})",
                    result.scenario_name,
                    result.seed,
                    miss.metric,
                    miss.actual,
                    miss.target,
                    miss.tolerance
                );
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

/// Progress lines go to stdout only when they cannot corrupt a
/// machine-readable report written there.
fn shows_progress(args: &Args) -> bool {
    args.output.is_some() || args.report == "console"
}

fn announce_banner() {
    println!("{}", "🎮 pbsim Calibration Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<Arc<ConfigTable>> {
    let Some(path) = path else {
        return Ok(Arc::new(ConfigTable::defaults()));
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config overrides {}", path.display()))?;
    let table = ConfigTable::from_json(&raw)
        .with_context(|| format!("invalid config overrides in {}", path.display()))?;
    Ok(Arc::new(table))
}

fn load_benchmarks(path: Option<&Path>) -> Result<LeagueBenchmarks> {
    let Some(path) = path else {
        return Ok(LeagueBenchmarks::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read benchmarks {}", path.display()))?;
    LeagueBenchmarks::from_json(&raw)
        .with_context(|| format!("invalid benchmark table in {}", path.display()))
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(
            &mut output_target,
            results,
            chrono::Utc::now(),
        )?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
