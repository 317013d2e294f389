use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

pub fn generate_console_report(
    writer: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Calibration Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();
    let failed_runs = total_runs - passed_runs;
    let total_games: u64 = results.iter().map(|r| r.games_played).sum();

    writeln!(writer, "Scenario runs: {total_runs}")?;
    writeln!(writer, "Games simulated: {total_games}")?;
    writeln!(writer, "On target: {}", passed_runs.to_string().green())?;
    writeln!(writer, "Off target: {}", failed_runs.to_string().red())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            writer,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            writer,
            "   Games: {}  PA: {}  extra innings: {}  walk-offs: {}  ties: {}",
            result.games_played,
            result.plate_appearances,
            result.extra_inning_games,
            result.walk_offs,
            result.tied_games
        )?;
        writeln!(
            writer,
            "   Benchmarks: {}/{} within tolerance, {:.0} draws per game, {:?}",
            result.checks_passed(),
            result.checks.len(),
            result.average_draws,
            result.duration
        )?;

        for check in &result.checks {
            let line = format!(
                "{:32} {:>8.3}  target {:>7.3} ± {:.3}  ({:+.3})",
                check.metric,
                check.actual,
                check.target,
                check.tolerance,
                check.delta()
            );
            if check.passed() {
                writeln!(writer, "     • {line}")?;
            } else {
                writeln!(writer, "     • {}", line.red())?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

pub fn generate_json_report(writer: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    writer: &mut dyn Write,
    results: &[ScenarioResult],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    writeln!(writer, "# pbsim Calibration Results\n")?;
    writeln!(
        writer,
        "_Generated {}_\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Scenario runs**: {total_runs}")?;
    writeln!(writer, "- **On target**: {passed_runs}")?;
    writeln!(writer, "- **Off target**: {}", total_runs - passed_runs)?;
    if total_runs > 0 {
        #[allow(clippy::cast_precision_loss)]
        let success_rate = (passed_runs as f64 / total_runs as f64) * 100.0;
        writeln!(writer, "- **Success rate**: {success_rate:.1}%")?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            writer,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            writer,
            "- **Games**: {} ({} plate appearances)",
            result.games_played, result.plate_appearances
        )?;
        writeln!(
            writer,
            "- **Extra innings / walk-offs / ties**: {} / {} / {}\n",
            result.extra_inning_games, result.walk_offs, result.tied_games
        )?;
        writeln!(writer, "| Metric | Actual | Target | Tolerance | Status |")?;
        writeln!(writer, "|---|---:|---:|---:|:---:|")?;
        for check in &result.checks {
            let mark = if check.passed() { "✅" } else { "❌" };
            writeln!(
                writer,
                "| {} | {:.3} | {:.3} | {:.3} | {mark} |",
                check.metric, check.actual, check.target, check.tolerance
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

pub fn generate_csv_report(writer: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(
        writer,
        "scenario,seed,games,metric,actual,target,tolerance,delta,passed"
    )?;
    for result in results {
        for check in &result.checks {
            writeln!(
                writer,
                "{},{},{},{},{:.6},{:.6},{:.6},{:.6},{}",
                result.scenario_name,
                result.seed,
                result.games_played,
                check.metric,
                check.actual,
                check.target,
                check.tolerance,
                check.delta(),
                check.passed()
            )?;
        }
    }
    Ok(())
}
