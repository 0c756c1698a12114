//! The scatter-sweep loop: every catalog recipe applied for a fixed number
//! of chained iterations against one seed design.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use splat_core::{
    ErrorInfo, ResultRow, ResultTable, ScriptCatalog, ScriptText, SplatError, ToolReply,
    ToolSession,
};

use crate::report::parse_report;

/// Options governing one sweep invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOpts {
    /// Iterations per script, at least 1.
    pub iterations: u32,
    /// Directory receiving the checkpoint and snapshot artifacts.
    pub work_dir: PathBuf,
    /// Fixed checkpoint filename reused for the whole sweep. Each iteration
    /// reloads and destructively overwrites this file so iteration `i + 1`
    /// builds on iteration `i`, not on the seed.
    pub checkpoint_name: String,
    /// Extension for per-iteration snapshot artifacts.
    pub snapshot_ext: String,
}

impl SweepOpts {
    /// Defaults mirroring the stock flow: five iterations, blif artifacts.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            iterations: 5,
            work_dir: work_dir.into(),
            checkpoint_name: "design.blif".to_string(),
            snapshot_ext: "blif".to_string(),
        }
    }

    /// Overrides the iteration count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

/// A contained per-script failure; the sweep carried on with the next
/// script and kept the rows recorded before the fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFailure {
    /// Script whose remaining iterations were abandoned.
    pub script_name: String,
    /// Iteration that was executing when the fault hit (0 = setup).
    pub iteration: u32,
    /// The underlying error.
    pub error: SplatError,
}

/// Sweep outcome: the results table plus the contained failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// One row per completed script/iteration pair, in generation order.
    pub table: ResultTable,
    /// Scripts that aborted early, with context.
    pub failures: Vec<ScriptFailure>,
}

/// Runs every catalog recipe for `opts.iterations` chained iterations
/// against the seed design.
///
/// Tool or parse errors abort the remaining iterations of the current
/// script only; rows already recorded stay valid and the sweep continues
/// with the next script. `cpu_time` accumulates across script and hook
/// execution only (file I/O excluded) and resets per script.
pub fn run_sweep<S: ToolSession>(
    session: &mut S,
    design_id: &str,
    seed_artifact: &Path,
    catalog: &ScriptCatalog,
    opts: &SweepOpts,
) -> Result<SweepReport, SplatError> {
    if opts.iterations == 0 {
        return Err(SplatError::Catalog(ErrorInfo::new(
            "splat_sweep.zero_iterations",
            "a sweep needs at least one iteration",
        )));
    }
    if !seed_artifact.exists() {
        return Err(SplatError::MissingFile(
            ErrorInfo::new("splat_sweep.seed_missing", "seed artifact does not exist")
                .with_context("design", design_id.to_string())
                .with_context("path", seed_artifact.display().to_string()),
        ));
    }

    let checkpoint = opts.work_dir.join(&opts.checkpoint_name);
    let mut table = ResultTable::new();
    let mut failures = Vec::new();

    for (script_name, script) in catalog.entries() {
        let run = sweep_one_script(
            session,
            design_id,
            seed_artifact,
            &checkpoint,
            script_name,
            script,
            catalog,
            opts,
            &mut table,
        );
        if let Err(failure) = run {
            warn!(
                "sweep aborting script {} for {} at iteration {}: {}",
                failure.script_name, design_id, failure.iteration, failure.error
            );
            failures.push(failure);
        }
    }

    Ok(SweepReport { table, failures })
}

#[allow(clippy::too_many_arguments)]
fn sweep_one_script<S: ToolSession>(
    session: &mut S,
    design_id: &str,
    seed_artifact: &Path,
    checkpoint: &Path,
    script_name: &str,
    script: &ScriptText,
    catalog: &ScriptCatalog,
    opts: &SweepOpts,
    table: &mut ResultTable,
) -> Result<(), ScriptFailure> {
    let fail = |iteration: u32, error: SplatError| ScriptFailure {
        script_name: script_name.to_string(),
        iteration,
        error,
    };

    session.reset().map_err(|err| fail(0, err))?;
    expect_ok(session.load(seed_artifact), "load seed").map_err(|err| fail(0, err))?;

    let mut elapsed = 0.0_f64;
    if !catalog.initialize().is_empty() {
        elapsed += timed(session, catalog.initialize()).map_err(|err| fail(0, err))?;
    }
    // The seed (optionally initialized) becomes the first checkpoint even
    // when the hook is skipped; iteration 1 always reloads from here.
    expect_ok(session.save(checkpoint), "write checkpoint").map_err(|err| fail(0, err))?;

    for iteration in 1..=opts.iterations {
        let step = sweep_one_iteration(
            session,
            design_id,
            checkpoint,
            script_name,
            script,
            catalog,
            opts,
            &mut elapsed,
            iteration,
            table,
        );
        step.map_err(|err| fail(iteration, err))?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sweep_one_iteration<S: ToolSession>(
    session: &mut S,
    design_id: &str,
    checkpoint: &Path,
    script_name: &str,
    script: &ScriptText,
    catalog: &ScriptCatalog,
    opts: &SweepOpts,
    elapsed: &mut f64,
    iteration: u32,
    table: &mut ResultTable,
) -> Result<(), SplatError> {
    expect_ok(session.load(checkpoint), "reload checkpoint")?;
    *elapsed += timed(session, script)?;
    expect_ok(session.save(checkpoint), "overwrite checkpoint")?;

    // The finalize hook prepares the network for the timing report only;
    // its effect is never persisted into the checkpoint.
    if !catalog.finalize().is_empty() {
        *elapsed += timed(session, catalog.finalize())?;
    }

    let reply = session.timing_report()?;
    let metrics = parse_report(reply.status, &reply.output).map_err(|err| {
        attach_step_context(err, design_id, script_name, iteration)
    })?;

    let artifact_name = format!("{script_name}_{iteration}.{}", opts.snapshot_ext);
    info!(
        "{design_id} {script_name} iteration {iteration}: gates={} area={} delay={}",
        metrics.gates, metrics.area, metrics.delay
    );
    table.push(ResultRow {
        design_id: design_id.to_string(),
        artifact_name: artifact_name.clone(),
        script_name: script_name.to_string(),
        iteration,
        cpu_time: *elapsed,
        gates: metrics.gates,
        area: metrics.area,
        delay: metrics.delay,
        is_pareto: false,
    })?;

    // Write-once snapshot for later inspection and winner selection.
    expect_ok(session.save(&opts.work_dir.join(&artifact_name)), "write snapshot")?;
    Ok(())
}

/// Runs a script while accumulating only its execution time.
fn timed<S: ToolSession>(session: &mut S, script: &ScriptText) -> Result<f64, SplatError> {
    debug!("dispatching script: {}", script.as_str());
    let start = Instant::now();
    let reply = session.run_script(script)?;
    let seconds = start.elapsed().as_secs_f64();
    if !reply.is_ok() {
        return Err(SplatError::Tool(
            ErrorInfo::new("splat_sweep.script_status", "script returned non-zero status")
                .with_context("status", reply.status.to_string()),
        ));
    }
    Ok(seconds)
}

fn expect_ok(
    reply: Result<ToolReply, SplatError>,
    step: &str,
) -> Result<ToolReply, SplatError> {
    let reply = reply?;
    if !reply.is_ok() {
        return Err(SplatError::Tool(
            ErrorInfo::new("splat_sweep.step_status", "tool step returned non-zero status")
                .with_context("step", step.to_string())
                .with_context("status", reply.status.to_string()),
        ));
    }
    Ok(reply)
}

fn attach_step_context(
    err: SplatError,
    design_id: &str,
    script_name: &str,
    iteration: u32,
) -> SplatError {
    let decorate = |info: ErrorInfo| {
        info.with_context("design", design_id.to_string())
            .with_context("script", script_name.to_string())
            .with_context("iteration", iteration.to_string())
    };
    match err {
        SplatError::Tool(info) => SplatError::Tool(decorate(info)),
        SplatError::MetricFormat(info) => SplatError::MetricFormat(decorate(info)),
        other => other,
    }
}
