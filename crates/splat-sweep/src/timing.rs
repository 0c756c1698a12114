//! Generated timing-constraint scripts and the external STA wrapper.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use splat_core::{quote_path, ErrorInfo, SplatError};

/// How the constraint script refers to the clock.
///
/// When the netlist has been bit blasted the clock may survive only as a
/// port named like the original signal; the STA tool then needs the `-name`
/// form of `create_clock` or it silently analyzes the wrong clock object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockRef {
    /// Clock signal or port name.
    pub name: String,
    /// True when `name` resolves to a top-level port rather than a named
    /// clock object.
    pub is_port: bool,
}

/// One timing-check invocation against a mapped netlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingCheck {
    /// Liberty library the netlist was mapped against.
    pub liberty_path: PathBuf,
    /// Gate-level netlist to analyze.
    pub netlist_path: PathBuf,
    /// Top module to link.
    pub top_module: String,
    /// Clock reference, see [`ClockRef`].
    pub clock: ClockRef,
    /// Clock period.
    pub period: f64,
    /// Input arrival delay relative to the clock.
    pub input_delay: f64,
    /// Output required delay relative to the clock.
    pub output_delay: f64,
}

impl TimingCheck {
    /// Renders the constraint script consumed by the STA tool.
    pub fn render_constraints(&self) -> String {
        let name_flag = if self.clock.is_port { "-name " } else { "" };
        let clock = &self.clock.name;
        format!(
            "read_liberty {lib}\n\
             read_verilog {netlist}\n\
             link {top}\n\
             create_clock {name_flag}{clock} -period {period}\n\
             set_input_delay -clock [get_clocks {clock}] {input} [all_inputs]\n\
             set_output_delay -clock [get_clocks {clock}] {output} [all_outputs]\n\
             report_checks\n",
            lib = quote_path(&self.liberty_path),
            netlist = quote_path(&self.netlist_path),
            top = self.top_module,
            period = self.period,
            input = self.input_delay,
            output = self.output_delay,
        )
    }
}

/// Options for shelling out to the STA binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaOpts {
    /// STA executable.
    pub binary: PathBuf,
    /// Directory receiving the generated constraint script.
    pub work_dir: PathBuf,
    /// Skip temp-file cleanup for debugging.
    pub keep_artifacts: bool,
}

impl StaOpts {
    /// Defaults: `sta` on PATH, scripts in `work_dir`, cleanup on.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("sta"),
            work_dir: work_dir.into(),
            keep_artifacts: false,
        }
    }
}

/// Arrival delay and slack extracted from the STA report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimingSummary {
    /// Data arrival time at the endpoint, sign-corrected.
    pub arrival_delay: Option<f64>,
    /// Worst slack.
    pub slack: Option<f64>,
}

/// Scans STA stdout for the arrival-time and slack lines.
///
/// The report states `data arrival time` twice per path; the later
/// (negated) definition is the one that matters, so matches overwrite.
pub fn parse_sta_output(stdout: &str) -> TimingSummary {
    let mut summary = TimingSummary::default();
    for line in stdout.lines() {
        let first = line.split_whitespace().next();
        if line.contains("data arrival time") {
            if let Some(value) = first.and_then(|tok| tok.parse::<f64>().ok()) {
                summary.arrival_delay = Some(-value);
            }
        } else if line.contains("slack") {
            if let Some(value) = first.and_then(|tok| tok.parse::<f64>().ok()) {
                summary.slack = Some(value);
            }
        }
    }
    summary
}

/// Writes the constraint script, runs the STA binary against it, and parses
/// the report.
///
/// The generated script is removed on success unless `keep_artifacts` is
/// set; cleanup failures are logged and ignored.
pub fn run_sta(check: &TimingCheck, opts: &StaOpts) -> Result<TimingSummary, SplatError> {
    let script_path = opts
        .work_dir
        .join(format!("{}_{}.sta.tcl", check.top_module, unique_tag()));
    fs::write(&script_path, check.render_constraints()).map_err(|err| {
        SplatError::Registry(
            ErrorInfo::new("splat_sweep.sta_script_write", "failed to write constraint script")
                .with_context("path", script_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    info!("timing {} with {}", check.top_module, opts.binary.display());
    let output = Command::new(&opts.binary)
        .arg("-no_init")
        .arg("-no_splash")
        .arg("-exit")
        .arg(&script_path)
        .output()
        .map_err(|err| {
            SplatError::MissingFile(
                ErrorInfo::new("splat_sweep.sta_spawn", "failed to launch STA binary")
                    .with_context("binary", opts.binary.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    if !output.status.success() {
        return Err(SplatError::Tool(
            ErrorInfo::new("splat_sweep.sta_status", "STA binary returned non-zero status")
                .with_context("status", output.status.to_string())
                .with_context("script", script_path.display().to_string()),
        ));
    }

    let summary = parse_sta_output(&String::from_utf8_lossy(&output.stdout));
    if !opts.keep_artifacts {
        if let Err(err) = fs::remove_file(&script_path) {
            warn!(
                "leaving constraint script {} behind: {err}",
                script_path.display()
            );
        }
    }
    Ok(summary)
}

fn unique_tag() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{}_{nanos:09}", std::process::id())
}
