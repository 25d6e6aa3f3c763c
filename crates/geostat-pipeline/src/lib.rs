//! Pipeline orchestration.
//!
//! Every selection change runs `Fetching -> Computing -> Ready`, or ends in
//! `Error`. Runs are tagged with increasing sequence numbers and only the
//! latest run may publish; the published state is observed through a
//! `tokio::sync::watch` channel.

pub mod compute;
pub mod error;
pub mod orchestrator;
pub mod selection;
pub mod summary;

pub use compute::{ComputeInput, Computed, PipelineResult, compute, merge_base_rows};
pub use error::{PipelineError, Result};
pub use orchestrator::{Orchestrator, PipelineState, RunOutcome};
pub use selection::Selection;
pub use summary::{GeographySummary, SummaryEntry, summary_entry};
