use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use splat_core::{
    CommandTable, ErrorInfo, ResultRow, ScriptCatalog, ScriptText, SplatError, ToolReply,
    ToolSession,
};
use splat_sweep::{run_sweep, SweepOpts};
use tempfile::tempdir;

/// Deterministic in-memory synthesis tool. The live design state is the
/// list of commands applied since the last load; metrics are a pure
/// function of that list.
struct StubSession {
    state: Vec<String>,
    script_runs: BTreeMap<String, u32>,
    fail_script: Option<(String, u32)>,
}

impl StubSession {
    fn new() -> Self {
        Self {
            state: Vec::new(),
            script_runs: BTreeMap::new(),
            fail_script: None,
        }
    }

    fn failing_on(script_body: &str, nth_run: u32) -> Self {
        let mut stub = Self::new();
        stub.fail_script = Some((script_body.to_string(), nth_run));
        stub
    }

    fn metrics_line(&self) -> String {
        let n = self.state.len() as u64;
        let gates = 1000 - 13 * n;
        let area = 500.0 - 7.0 * n as f64;
        let delay = 100.0 - 3.0 * n as f64;
        format!("WireLoad = \"none\"  Gates = {gates} ( 1.0 %)  Area = {area:.2}  Delay = {delay:.2} ps\n")
    }
}

impl ToolSession for StubSession {
    fn reset(&mut self) -> Result<(), SplatError> {
        self.state.clear();
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<ToolReply, SplatError> {
        let text = fs::read_to_string(path).map_err(|err| {
            SplatError::MissingFile(
                ErrorInfo::new("stub.load", "artifact missing")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        self.state = text.lines().map(str::to_string).collect();
        Ok(ToolReply::ok(""))
    }

    fn save(&mut self, path: &Path) -> Result<ToolReply, SplatError> {
        fs::write(path, self.state.join("\n")).map_err(|err| {
            SplatError::Registry(
                ErrorInfo::new("stub.save", "artifact write failed").with_hint(err.to_string()),
            )
        })?;
        Ok(ToolReply::ok(""))
    }

    fn run_script(&mut self, script: &ScriptText) -> Result<ToolReply, SplatError> {
        let body = script.as_str().to_string();
        let runs = self.script_runs.entry(body.clone()).or_insert(0);
        *runs += 1;
        if let Some((fail_body, nth)) = &self.fail_script {
            if *fail_body == body && *runs == *nth {
                return Ok(ToolReply {
                    status: 1,
                    output: "stub fault injected".to_string(),
                });
            }
        }
        self.state.push(body);
        Ok(ToolReply::ok(""))
    }

    fn timing_report(&mut self) -> Result<ToolReply, SplatError> {
        Ok(ToolReply::ok(self.metrics_line()))
    }

    fn invoke(&mut self, verb: &str, args: &str) -> Result<ToolReply, SplatError> {
        CommandTable::builtin().validate(verb, args)?;
        Ok(ToolReply::ok(""))
    }
}

fn catalog() -> ScriptCatalog {
    let script = |text: &str| ScriptText::new(text).expect("script");
    ScriptCatalog::new(
        vec![
            ("area1".to_string(), script("strash;dch;amap")),
            ("delay1".to_string(), script("strash;dch;map -B 0.9")),
        ],
        script("init;balance"),
        script("buffer -c;topo"),
    )
    .expect("catalog")
}

fn seeded_workspace() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let seed = dir.path().join("input.blif");
    fs::write(&seed, "seed netlist").expect("seed");
    (dir, seed)
}

fn strip_time(rows: &[ResultRow]) -> Vec<ResultRow> {
    rows.iter()
        .cloned()
        .map(|mut row| {
            row.cpu_time = 0.0;
            row
        })
        .collect()
}

#[test]
fn sweep_produces_one_row_per_script_iteration() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(3);
    let mut session = StubSession::new();
    let report = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect("sweep");

    assert!(report.failures.is_empty());
    assert_eq!(report.table.len(), 6);
    let identities: Vec<(String, u32)> = report
        .table
        .rows()
        .iter()
        .map(|row| (row.script_name.clone(), row.iteration))
        .collect();
    assert_eq!(
        identities,
        [
            ("area1".to_string(), 1),
            ("area1".to_string(), 2),
            ("area1".to_string(), 3),
            ("delay1".to_string(), 1),
            ("delay1".to_string(), 2),
            ("delay1".to_string(), 3),
        ]
    );
    for row in report.table.rows() {
        assert_eq!(row.design_id, "adder");
        assert_eq!(
            row.artifact_name,
            format!("{}_{}.blif", row.script_name, row.iteration)
        );
        assert!(dir.path().join(&row.artifact_name).exists());
    }
}

#[test]
fn iterations_chain_through_the_checkpoint() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(3);
    let mut session = StubSession::new();
    let report = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect("sweep");

    // Each iteration rebuilds on the previous checkpoint, so the stub's
    // state strictly grows and gate counts strictly fall within a script.
    let area1: Vec<u64> = report
        .table
        .rows()
        .iter()
        .filter(|row| row.script_name == "area1")
        .map(|row| row.gates)
        .collect();
    assert!(area1.windows(2).all(|w| w[1] < w[0]), "gates: {area1:?}");

    // cpu_time is cumulative within a script and resets between scripts.
    for script in ["area1", "delay1"] {
        let times: Vec<f64> = report
            .table
            .rows()
            .iter()
            .filter(|row| row.script_name == script)
            .map(|row| row.cpu_time)
            .collect();
        assert!(times.windows(2).all(|w| w[1] >= w[0]), "times: {times:?}");
    }
}

#[test]
fn finalize_reaches_metrics_but_never_the_checkpoint() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(3);
    let mut session = StubSession::new();
    let report = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect("sweep");

    // State at the timing report is seed + init + i chained bodies +
    // finalize, so n = i + 3 and gates = 1000 - 13 * (i + 3). A checkpoint
    // written after the finalize hook would instead compound it into later
    // iterations (948, 922, 896).
    let area1: Vec<u64> = report
        .table
        .rows()
        .iter()
        .filter(|row| row.script_name == "area1")
        .map(|row| row.gates)
        .collect();
    assert_eq!(area1, [948, 935, 922]);

    // The checkpoint chains script bodies only; the finalize body must
    // never land in it.
    let checkpoint =
        fs::read_to_string(dir.path().join("design.blif")).expect("checkpoint");
    assert!(!checkpoint.contains("buffer -c;topo"), "checkpoint: {checkpoint}");
    let lines: Vec<&str> = checkpoint.lines().collect();
    assert_eq!(lines[0], "seed netlist");
    assert_eq!(lines[1], "init;balance");
    assert_eq!(lines.len(), 5);
}

#[test]
fn scripts_restart_from_the_seed() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(2);
    let mut session = StubSession::new();
    let report = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect("sweep");

    // Both scripts start from the same reloaded seed, so their first
    // iterations report identical gate counts.
    let firsts: Vec<u64> = report
        .table
        .rows()
        .iter()
        .filter(|row| row.iteration == 1)
        .map(|row| row.gates)
        .collect();
    assert_eq!(firsts[0], firsts[1]);
}

#[test]
fn sweep_is_deterministic_modulo_cpu_time() {
    let (dir_a, seed_a) = seeded_workspace();
    let (dir_b, seed_b) = seeded_workspace();
    let opts_a = SweepOpts::new(dir_a.path()).with_iterations(2);
    let opts_b = SweepOpts::new(dir_b.path()).with_iterations(2);

    let mut first = StubSession::new();
    let mut second = StubSession::new();
    let report_a = run_sweep(&mut first, "adder", &seed_a, &catalog(), &opts_a).expect("a");
    let report_b = run_sweep(&mut second, "adder", &seed_b, &catalog(), &opts_b).expect("b");

    assert_eq!(strip_time(report_a.table.rows()), strip_time(report_b.table.rows()));
}

#[test]
fn a_failing_iteration_contains_to_its_script() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(5);
    // The area1 body fails on its third execution, i.e. iteration 3.
    let mut session = StubSession::failing_on("strash;dch;amap", 3);
    let report = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect("sweep");

    let area1: Vec<u32> = report
        .table
        .rows()
        .iter()
        .filter(|row| row.script_name == "area1")
        .map(|row| row.iteration)
        .collect();
    assert_eq!(area1, [1, 2]);

    let delay1: Vec<u32> = report
        .table
        .rows()
        .iter()
        .filter(|row| row.script_name == "delay1")
        .map(|row| row.iteration)
        .collect();
    assert_eq!(delay1, [1, 2, 3, 4, 5]);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].script_name, "area1");
    assert_eq!(report.failures[0].iteration, 3);
}

#[test]
fn missing_seed_aborts_the_whole_sweep() {
    let dir = tempdir().expect("tempdir");
    let opts = SweepOpts::new(dir.path());
    let mut session = StubSession::new();
    let err = run_sweep(
        &mut session,
        "adder",
        &dir.path().join("absent.blif"),
        &catalog(),
        &opts,
    )
    .expect_err("missing seed");
    assert_eq!(err.info().code, "splat_sweep.seed_missing");
}

#[test]
fn zero_iterations_is_rejected() {
    let (dir, seed) = seeded_workspace();
    let opts = SweepOpts::new(dir.path()).with_iterations(0);
    let mut session = StubSession::new();
    let err = run_sweep(&mut session, "adder", &seed, &catalog(), &opts).expect_err("zero");
    assert_eq!(err.info().code, "splat_sweep.zero_iterations");
}
