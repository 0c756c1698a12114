//! Second campaign pass: pick one winning snapshot per instance.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use splat_core::{ErrorInfo, SplatError};
use splat_pareto::select_best;

use crate::results::read_results;
use crate::walker::{dir_name, instance_dirs, CampaignLayout};

/// Applies the best-point heuristic to every instance's results file and
/// copies the winning snapshot artifact to the instance's well-known winner
/// name.
///
/// Instances without a readable results file are logged and skipped; the
/// pass never aborts the whole campaign. Returns the winner artifact path
/// per instance.
pub fn select_campaign_winners(
    root: &Path,
    layout: &CampaignLayout,
) -> Result<BTreeMap<String, PathBuf>, SplatError> {
    let mut winners = BTreeMap::new();

    for dir in instance_dirs(root)? {
        let instance_id = dir_name(&dir);
        match select_instance_winner(&dir, layout) {
            Ok(Some(winner)) => {
                winners.insert(instance_id, winner);
            }
            Ok(None) => {
                warn!("instance {instance_id} has an empty results table");
            }
            Err(err) => {
                warn!("skipping winner selection for {instance_id}: {err}");
            }
        }
    }

    Ok(winners)
}

fn select_instance_winner(
    dir: &Path,
    layout: &CampaignLayout,
) -> Result<Option<PathBuf>, SplatError> {
    let results = dir.join(&layout.results_name);
    let table = read_results(&results)?;
    let Some(best) = select_best(&table) else {
        return Ok(None);
    };

    let row = &table.rows()[best];
    let source = dir.join(&row.artifact_name);
    let target = dir.join(&layout.winner_name);
    if !source.exists() {
        return Err(SplatError::MissingFile(
            ErrorInfo::new("splat_campaign.winner_missing", "winning snapshot artifact absent")
                .with_context("artifact", row.artifact_name.clone())
                .with_context("instance", dir.display().to_string()),
        ));
    }
    fs::copy(&source, &target).map_err(|err| {
        SplatError::Registry(
            ErrorInfo::new("splat_campaign.winner_copy", "failed to install winning artifact")
                .with_context("from", source.display().to_string())
                .with_context("to", target.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    info!(
        "instance {}: winner {} (script {}, iteration {})",
        dir_name(dir),
        row.artifact_name,
        row.script_name,
        row.iteration
    );
    Ok(Some(target))
}
