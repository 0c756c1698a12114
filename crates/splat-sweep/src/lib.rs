//! Scatter-sweep orchestration for SPLAT: drives the external synthesis
//! tool through every catalog recipe, checkpoints intermediate netlists, and
//! turns the tool's self-reports into result rows.
//!
//! Everything here is strictly sequential. The live tool session and the
//! process working directory are shared mutable resources; the discipline is
//! sequencing, never locking.

mod liberty;
mod orchestrator;
mod report;
mod timing;

pub use liberty::LibertyCache;
pub use orchestrator::{run_sweep, ScriptFailure, SweepOpts, SweepReport};
pub use report::parse_report;
pub use timing::{parse_sta_output, run_sta, ClockRef, StaOpts, TimingCheck, TimingSummary};
