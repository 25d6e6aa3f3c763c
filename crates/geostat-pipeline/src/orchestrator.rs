//! Last-selection-wins orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{Instrument, debug, info, info_span, warn};

use geostat_catalogue::{Catalogue, QueryPlan, RequestRole};
use geostat_ingest::{FeatureSource, RowSource};
use geostat_model::RawRow;

use crate::compute::{ComputeInput, PipelineResult, compute};
use crate::error::{PipelineError, Result};
use crate::selection::Selection;
use crate::summary::{GeographySummary, summary_entry};

/// Observable state of the orchestrator.
///
/// `Fetching`, `Computing` and `Error` carry the sequence number of the run
/// they belong to.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Fetching {
        seq: u64,
    },
    Computing {
        seq: u64,
    },
    Ready(Arc<PipelineResult>),
    Error {
        seq: u64,
        message: String,
    },
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Fetching { .. } => "fetching",
            PipelineState::Computing { .. } => "computing",
            PipelineState::Ready(_) => "ready",
            PipelineState::Error { .. } => "error",
        }
    }

    pub fn result(&self) -> Option<&Arc<PipelineResult>> {
        match self {
            PipelineState::Ready(result) => Some(result),
            _ => None,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Ready(Arc<PipelineResult>),
    Failed(PipelineError),
    /// A newer selection started before this run finished; its result was
    /// discarded.
    Superseded { seq: u64, latest: u64 },
}

impl RunOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, RunOutcome::Superseded { .. })
    }
}

enum Step {
    Done(PipelineResult),
    Stale,
}

/// Sequences fetch, resolve, classify and join for each selection.
///
/// Every call to [`Orchestrator::select`] takes a new sequence number; only
/// the run holding the latest number may change the published state, so a
/// slow earlier run can never overwrite a newer one.
pub struct Orchestrator {
    catalogue: Arc<Catalogue>,
    rows: Arc<dyn RowSource>,
    features: Arc<dyn FeatureSource>,
    latest: AtomicU64,
    state: watch::Sender<PipelineState>,
}

impl Orchestrator {
    pub fn new(
        catalogue: Arc<Catalogue>,
        rows: Arc<dyn RowSource>,
        features: Arc<dyn FeatureSource>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            catalogue,
            rows,
            features,
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Sequence number of the most recent selection.
    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest_seq() == seq
    }

    /// Swaps the published state if `seq` is still the latest run.
    fn publish(&self, seq: u64, next: PipelineState) -> bool {
        self.state.send_if_modified(|state| {
            if self.is_latest(seq) {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// Runs the pipeline for `selection`.
    pub async fn select(&self, selection: Selection) -> RunOutcome {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let span = info_span!(
            "pipeline_run",
            seq,
            geography = %selection.geography,
            variable = %selection.variable,
        );
        async move {
            self.publish(seq, PipelineState::Fetching { seq });
            match self.run(seq, selection).await {
                Ok(Step::Done(result)) => {
                    let result = Arc::new(result);
                    if self.publish(seq, PipelineState::Ready(Arc::clone(&result))) {
                        info!(
                            features = result.features.len(),
                            classes = result.breaks.class_count(),
                            "run ready"
                        );
                        RunOutcome::Ready(result)
                    } else {
                        self.superseded(seq)
                    }
                }
                Ok(Step::Stale) => self.superseded(seq),
                Err(error) => {
                    let message = error.to_string();
                    if self.publish(seq, PipelineState::Error { seq, message }) {
                        warn!(error = %error, "run failed");
                        RunOutcome::Failed(error)
                    } else {
                        self.superseded(seq)
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    fn superseded(&self, seq: u64) -> RunOutcome {
        let latest = self.latest_seq();
        debug!(latest, "discarding superseded run");
        RunOutcome::Superseded { seq, latest }
    }

    /// Resolves every summary variable for one geography.
    ///
    /// Independent of selections: it neither takes a sequence number nor
    /// touches the published state.
    pub async fn summarize(
        &self,
        geography: &str,
        geo_code: &str,
        year: Option<u16>,
    ) -> Result<GeographySummary> {
        let layer = self.catalogue.geography(geography)?.clone();
        let year = year.unwrap_or(self.catalogue.settings().year);
        let span = info_span!("geography_summary", geography, geo_code, year);
        async move {
            let mut entries = Vec::new();
            for spec in self.catalogue.summary_variables() {
                let plan = self.catalogue.query_plan(spec, &layer, year);
                let (rows, base_rows) = self.fetch_tables(&plan).await?;
                entries.push(summary_entry(spec, rows, base_rows, geo_code));
            }
            debug!(
                entries = entries.len(),
                missing = entries.iter().filter(|entry| entry.value.is_missing()).count(),
                "summarized geography"
            );
            Ok::<_, PipelineError>(GeographySummary {
                layer,
                geo_code: geo_code.trim().to_string(),
                year,
                entries,
            })
        }
        .instrument(span)
        .await
    }

    /// Fetches the primary table and, when planned, the base table.
    async fn fetch_tables(
        &self,
        plan: &QueryPlan,
    ) -> Result<(Vec<RawRow>, Option<Vec<RawRow>>)> {
        let primary = async {
            self.rows
                .fetch_rows(&plan.primary)
                .await
                .map_err(|source| PipelineError::Retrieval {
                    role: RequestRole::Primary,
                    source,
                })
        };
        let base = async {
            match &plan.base {
                Some(request) => self.rows.fetch_rows(request).await.map(Some).map_err(
                    |source| PipelineError::Retrieval {
                        role: RequestRole::Base,
                        source,
                    },
                ),
                None => Ok(None),
            }
        };
        tokio::try_join!(primary, base)
    }

    async fn run(&self, seq: u64, selection: Selection) -> Result<Step> {
        let layer = self.catalogue.geography(&selection.geography)?.clone();
        let spec = self.catalogue.variable(&selection.variable)?.clone();
        let settings = self.catalogue.settings();
        let year = selection.year.unwrap_or(settings.year);
        let plan = self.catalogue.query_plan(&spec, &layer, year);

        let tables = self.fetch_tables(&plan);
        let features = async {
            self.features
                .load_features(&layer)
                .await
                .map_err(PipelineError::Geometry)
        };
        let ((rows, base_rows), features) = tokio::try_join!(tables, features)?;
        debug!(
            rows = rows.len(),
            base_rows = base_rows.as_ref().map(Vec::len),
            features = features.len(),
            "fetched"
        );

        if !self.publish(seq, PipelineState::Computing { seq }) {
            return Ok(Step::Stale);
        }

        let computed = compute(ComputeInput {
            spec: &spec,
            rows,
            base_rows,
            features: &features,
            method: selection.method.unwrap_or(spec.classification),
            class_count: selection.class_count.unwrap_or(settings.class_count),
            ramp: &settings.ramp,
        })?;

        Ok(Step::Done(PipelineResult {
            seq,
            selection,
            layer,
            spec,
            year,
            metrics: computed.metrics,
            breaks: computed.breaks,
            features: computed.features,
            summary: computed.summary,
            legend: computed.legend,
        }))
    }
}
