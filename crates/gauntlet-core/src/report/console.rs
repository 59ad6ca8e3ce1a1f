//! Final tabular summary: per-tier tables, overall rollup, and a failure
//! listing with each failed trial's last recorded output.

use std::time::Duration;

use crate::engine::stats::RunSummary;
use crate::engine::CaseResults;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";

fn tier_name(tier: u32) -> &'static str {
    match tier {
        1 => "BASICS",
        2 => "SIMPLE ALGORITHMS",
        3 => "INTERMEDIATE",
        4 => "HARD",
        5 => "EXPERT",
        6 => "CHALLENGING",
        _ => "UNNAMED",
    }
}

fn fmt_duration(d: Duration) -> String {
    if d >= Duration::from_secs(10) {
        format!("{}s", d.as_secs())
    } else if d >= Duration::from_secs(1) {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}

/// Prints the end-of-run report to stdout.
pub fn print_summary(model: &str, results: &[CaseResults], summary: &RunSummary) {
    let name_width = summary
        .cases
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let table_width = 3 + name_width + 2 + 5 + 2 + 5 + 2 + 5 + 2 + 10 + 2 + 10;

    println!("\n{CYAN}{}{RESET}", "═".repeat(table_width));
    println!("{BOLD}{CYAN}EVAL RESULTS — model: {model}{RESET}");
    println!("{CYAN}{}{RESET}", "═".repeat(table_width));
    println!(
        "{DIM}   {:<name_width$}  {:>5}  {:>5}  {:>5}  {:>10}  {:>10}{RESET}",
        "NAME", "PASS", "SCORE", "TRIES", "LLM", "TOOL"
    );

    for tier in &summary.tiers {
        println!("\n{BOLD}{CYAN}TIER {}: {}{RESET}", tier.tier, tier_name(tier.tier));

        let mut rows: Vec<_> = summary.cases.iter().filter(|c| c.tier == tier.tier).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        for cs in rows {
            let (mark, color) = if cs.runs > 0 && cs.passed == cs.runs {
                ("✔", GREEN)
            } else if cs.passed == 0 {
                ("✘", RED)
            } else {
                ("~", YELLOW)
            };
            println!(
                " {color}{mark}{RESET} {:<name_width$}  {DIM}{:>5}  {:>5.2}  {:>5.1}  {:>10}  {:>10}{RESET}",
                cs.name,
                format!("{}/{}", cs.passed, cs.runs),
                cs.avg_score,
                cs.avg_attempts,
                fmt_duration(cs.llm_time),
                fmt_duration(cs.tool_time),
            );
        }

        println!(
            "   {DIM}Tier score: {:.2} ({}/{} passed){RESET}",
            tier.avg_score, tier.passed, tier.runs
        );
    }

    let overall = &summary.overall;
    println!("\n{CYAN}{}{RESET}", "─".repeat(table_width));
    println!(
        "{BOLD}{CYAN}OVERALL: {:.2} ({}/{} passed)  tokens: {} in, {} out{RESET}",
        overall.avg_score, overall.passed, overall.runs, overall.tokens_in, overall.tokens_out
    );
    println!("{CYAN}{}{RESET}", "─".repeat(table_width));

    print_failures(results);
}

/// Lists every failed trial with its final raw output, to aid diagnosis.
fn print_failures(results: &[CaseResults]) {
    for cr in results {
        for (run_idx, run) in cr.runs.iter().enumerate() {
            if run.passed {
                continue;
            }
            println!(
                "\n{BOLD}{RED}FAILED: {} (run {}, {} attempts){RESET}",
                cr.case.name,
                run_idx + 1,
                run.attempts
            );
            match run.outputs.last() {
                Some(out) => println!("{DIM}Last output:{RESET}\n{out}"),
                None => println!("{DIM}(no tool output recorded){RESET}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_by_magnitude() {
        assert_eq!(fmt_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(fmt_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(fmt_duration(Duration::from_secs(42)), "42s");
    }

    #[test]
    fn tier_names_cover_the_catalog_range() {
        assert_eq!(tier_name(1), "BASICS");
        assert_eq!(tier_name(4), "HARD");
        assert_eq!(tier_name(99), "UNNAMED");
    }
}
