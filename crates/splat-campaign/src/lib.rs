//! Batch "campaign" mode: walk a directory tree of independent design
//! instances, sweep each with the single shared tool session, persist
//! per-instance results tables, and pick one winning artifact per instance.
//!
//! The walk is strictly sequential; the shared session and the process
//! working directory forbid running two instances concurrently.

mod results;
mod walker;
mod winners;

pub use results::{append_results, read_results, RESULTS_COLUMNS};
pub use walker::{run_campaign, CampaignLayout, CampaignOpts, CampaignReport};
pub use winners::select_campaign_winners;
