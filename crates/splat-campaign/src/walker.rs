//! The campaign walker: one sweep per instance directory under a root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::{env, io};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use splat_core::{ErrorInfo, ResultTable, ScriptCatalog, SplatError, ToolSession};
use splat_pareto::mark_pareto;
use splat_sweep::{run_sweep, SweepOpts};
use walkdir::WalkDir;

use crate::results::append_results;

/// Well-known filenames inside each instance directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignLayout {
    /// Seed netlist each sweep starts from.
    pub seed_name: String,
    /// Artifact whose absence marks an instance as empty.
    pub ready_marker: String,
    /// Per-instance results CSV.
    pub results_name: String,
    /// Name the winning snapshot is copied to.
    pub winner_name: String,
}

impl Default for CampaignLayout {
    fn default() -> Self {
        Self {
            seed_name: "input.blif".to_string(),
            ready_marker: "output.blif".to_string(),
            results_name: "results.csv".to_string(),
            winner_name: "output.blif".to_string(),
        }
    }
}

/// Options for one campaign walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignOpts {
    /// Iterations per script per instance.
    pub iterations: u32,
    /// Delete instance directories lacking the ready marker. Irreversible;
    /// switch off to merely skip them.
    pub prune_empty: bool,
    /// Instance-directory filenames.
    pub layout: CampaignLayout,
}

impl Default for CampaignOpts {
    fn default() -> Self {
        Self {
            iterations: 5,
            prune_empty: true,
            layout: CampaignLayout::default(),
        }
    }
}

/// Outcome of a campaign walk.
#[derive(Debug, Default)]
pub struct CampaignReport {
    /// Result table per surviving instance, keyed by directory name.
    pub tables: BTreeMap<String, ResultTable>,
    /// Instances pruned (or skipped, when pruning is off) for lacking the
    /// ready marker.
    pub pruned: Vec<String>,
    /// Instances whose sweep failed outright; their directories remain.
    pub failures: Vec<(String, SplatError)>,
}

/// Restores the process working directory when dropped.
struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    fn enter(dir: &Path) -> io::Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(Self { previous })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            warn!(
                "failed to restore working directory {}: {err}",
                self.previous.display()
            );
        }
    }
}

/// Sweeps every instance directory under `root` with the shared tool
/// session.
///
/// Instances lacking the ready marker are pruned (deleted) or skipped per
/// `opts.prune_empty`. Each surviving instance is processed in isolation:
/// the working directory moves into the instance for the duration of its
/// sweep, the session is reset through the sweep's own reset/load calls,
/// Pareto rows are marked, and the table is appended to the instance's
/// results CSV. Instance failures are contained and reported; the walk
/// continues.
pub fn run_campaign<S: ToolSession>(
    session: &mut S,
    root: &Path,
    catalog: &ScriptCatalog,
    opts: &CampaignOpts,
) -> Result<CampaignReport, SplatError> {
    let mut report = CampaignReport::default();

    for dir in instance_dirs(root)? {
        let instance_id = dir_name(&dir);
        if !dir.join(&opts.layout.ready_marker).exists() {
            let signal = SplatError::EmptyInstance(
                ErrorInfo::new("splat_campaign.no_ready_marker", "instance has no output artifact")
                    .with_context("instance", instance_id.clone())
                    .with_context("marker", opts.layout.ready_marker.clone()),
            );
            if opts.prune_empty {
                warn!("pruning empty instance {instance_id}: {signal}");
                if let Err(err) = fs::remove_dir_all(&dir) {
                    warn!("failed to prune {}: {err}", dir.display());
                }
            } else {
                warn!("skipping empty instance {instance_id}: {signal}");
            }
            report.pruned.push(instance_id);
            continue;
        }

        info!("sweeping instance {instance_id}");
        let outcome = sweep_instance(session, &dir, &instance_id, catalog, opts);
        match outcome {
            Ok(table) => {
                report.tables.insert(instance_id, table);
            }
            Err(err) => {
                warn!("instance {instance_id} failed: {err}");
                report.failures.push((instance_id, err));
            }
        }
    }

    Ok(report)
}

fn sweep_instance<S: ToolSession>(
    session: &mut S,
    dir: &Path,
    instance_id: &str,
    catalog: &ScriptCatalog,
    opts: &CampaignOpts,
) -> Result<ResultTable, SplatError> {
    // The external tool resolves relative paths against the process cwd, so
    // the walk moves into the instance and restores afterwards, also when
    // the sweep errors out.
    let _guard = WorkdirGuard::enter(dir).map_err(|err| {
        SplatError::Registry(
            ErrorInfo::new("splat_campaign.chdir", "failed to enter instance directory")
                .with_context("path", dir.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    let sweep_opts = SweepOpts::new(dir).with_iterations(opts.iterations);
    let seed = dir.join(&opts.layout.seed_name);
    let sweep = run_sweep(session, instance_id, &seed, catalog, &sweep_opts)?;
    for failure in &sweep.failures {
        warn!(
            "instance {instance_id}: script {} stopped at iteration {}",
            failure.script_name, failure.iteration
        );
    }

    let mut table = sweep.table;
    mark_pareto(&mut table)?;
    append_results(&dir.join(&opts.layout.results_name), &table)?;
    Ok(table)
}

/// Immediate subdirectories of the campaign root, in stable name order.
pub(crate) fn instance_dirs(root: &Path) -> Result<Vec<PathBuf>, SplatError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            SplatError::Registry(
                ErrorInfo::new("splat_campaign.walk", "failed to walk campaign root")
                    .with_context("root", root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

pub(crate) fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
