//! Integration tests for the tournament results processor
//!
//! Tests the full stack: tournament files on disk, aggregation, comparison,
//! focusing, short names and the `trp` binary

use std::path::{Path, PathBuf};
use std::process::Command;

use approx::assert_relative_eq;
use tempfile::TempDir;
use trp_core::{aggregate, compare, shorten, Focus, RateMetric, ReportError, WinRateTable};
use trp_tournament::{load_results, TournamentFile};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const RANDOM: &str = "ai.RandomBiasedAI";
const WORKER: &str = "ai.abstraction.WorkerRush(AStarPathFinding)";
const LIGHT: &str = "ai.abstraction.LightRush(AStarPathFinding)";

/// A round robin on one map; `light_beats_worker` decides the last game
fn tournament(light_beats_worker: bool) -> String {
    let last_winner = if light_beats_worker { 1 } else { 0 };
    format!(
        "RoundRobinTournament
AIs
{RANDOM}
{WORKER}
{LIGHT}
maps
maps/8x8/basesWorkers8x8A.xml
iterations\t1
maxGameLength\t3000
timeBudget\t100
iteration\tmap\tai1\tai2\ttime\twinner\tcrashed\ttimedout
0\t0\t0\t1\t900\t1\t-1\t-1
0\t0\t0\t2\t950\t1\t-1\t-1
0\t0\t1\t1\t3000\t-1\t-1\t-1
0\t0\t1\t2\t1200\t{last_winner}\t-1\t-1
"
    )
}

/// `before/tournament.csv` and `after/tournament.csv` in a fresh folder
fn results_dirs() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let before = tmp.path().join("before");
    let after = tmp.path().join("after");
    for (dir, light_wins) in [(&before, false), (&after, true)] {
        std::fs::create_dir(dir).unwrap();
        std::fs::write(dir.join("tournament.csv"), tournament(light_wins)).unwrap();
    }
    (tmp, before, after)
}

fn load(path: &Path) -> WinRateTable {
    aggregate(&load_results(path).unwrap(), None)
}

fn trp(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_trp"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

// ============================================================================
// LIBRARY FLOW
// ============================================================================

#[test]
fn test_load_skips_self_play() {
    let (_tmp, before, _) = results_dirs();
    let records = load_results(&before.join("tournament.csv")).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.map() == "basesWorkers8x8A"));
    assert!(records.iter().all(|r| r.bot_a() != r.bot_b()));
}

#[test]
fn test_parse_keeps_header_values() {
    let file = TournamentFile::parse(&tournament(false)).unwrap();
    assert_eq!(file.config().iterations, 1);
    assert_eq!(file.config().max_game_length, 3000);
    assert_eq!(file.games().len(), 4);
    assert!(file.wins().is_none());
}

#[test]
fn test_aggregate_and_compare() {
    let (_tmp, before, after) = results_dirs();
    let before = load(&before);
    let after = load(&after);

    let worker = before.bot_record("basesWorkers8x8A", WORKER).unwrap();
    assert_eq!(worker.games, 2);
    assert_relative_eq!(worker.win_rate().unwrap(), 1.0);

    let deltas = compare(&before, &after);
    let worker = deltas.bot_delta("basesWorkers8x8A", WORKER, RateMetric::WinRate).unwrap();
    let light = deltas.bot_delta("basesWorkers8x8A", LIGHT, RateMetric::WinRate).unwrap();
    assert_relative_eq!(worker.value().unwrap(), -0.5);
    assert_relative_eq!(light.value().unwrap(), 0.5);

    let random = deltas.overall_delta(RANDOM, RateMetric::WinRate).unwrap();
    assert_relative_eq!(random.value().unwrap(), 0.0);
}

#[test]
fn test_focus_after_compare() {
    let (_tmp, before, after) = results_dirs();
    let (before, after) = (load(&before), load(&after));

    let focused = compare(&before, &after).focus(LIGHT).unwrap();
    let against_worker = focused
        .delta("basesWorkers8x8A", LIGHT, WORKER, RateMetric::WinRate)
        .unwrap();
    assert_relative_eq!(against_worker.percentage_points().unwrap(), 100.0);
    assert!(focused.entry("basesWorkers8x8A", RANDOM, WORKER).is_none());

    let direct = compare(&before.focus(LIGHT).unwrap(), &after.focus(LIGHT).unwrap())
        .focus(LIGHT)
        .unwrap();
    assert_eq!(direct, focused);

    assert_eq!(
        before.focus("ai.PassiveAI"),
        Err(ReportError::UnknownBot("ai.PassiveAI".to_string()))
    );
}

#[test]
fn test_short_names_for_loaded_bots() {
    let (_tmp, before, _) = results_dirs();
    let table = load(&before);
    let bots: Vec<&str> = table.bots().collect();
    let names = shorten(&bots).unwrap();

    assert_eq!(names.get(WORKER), Some("WorkerRush"));
    assert_eq!(names.get(LIGHT), Some("LightRush"));
    assert_eq!(names.resolve("RandomBiasedAI"), Some(RANDOM));
}

// ============================================================================
// BINARY
// ============================================================================

#[test]
fn test_show_command() {
    let (_tmp, before, _) = results_dirs();
    let out = trp(&["show", before.to_str().unwrap()]);
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("basesWorkers8x8A"));
    let worker_line = stdout.lines().find(|l| l.starts_with("WorkerRush")).unwrap();
    assert!(worker_line.contains("100.0"));
}

#[test]
fn test_compare_command_json() {
    let (_tmp, before, after) = results_dirs();
    let out = trp(&[
        "compare",
        before.to_str().unwrap(),
        after.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert!(out.status.success());

    let tables: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let rows = tables[0]["rows"].as_array().unwrap();
    let worker = rows.iter().find(|r| r[0] == "WorkerRush").unwrap();
    assert_eq!(worker[3], "-50.0");
}

#[test]
fn test_focus_command_by_short_name() {
    let (_tmp, before, after) = results_dirs();
    let out = trp(&[
        "focus",
        before.to_str().unwrap(),
        "LightRush",
        "--against",
        after.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert!(out.status.success());

    let tables: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(tables[0]["title"], "LightRush (Win Rate change)");
    let rows = tables[0]["rows"].as_array().unwrap();
    let worker = rows.iter().find(|r| r[0] == "WorkerRush").unwrap();
    assert_eq!(worker[1], "+100.0");
}

#[test]
fn test_focus_unknown_bot_fails() {
    let (_tmp, before, _) = results_dirs();
    let out = trp(&["focus", before.to_str().unwrap(), "PassiveAI"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("PassiveAI"));
}
