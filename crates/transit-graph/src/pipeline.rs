//! The full run: bootstrap, import and relate each dataset, summarize, sample
//! the graph, then project it and search the configured shortest path.
//!
//! Steps run in a fixed order. A failed step is recorded; whether the run
//! goes on depends on the configured `ErrorPolicy`.

use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use transit_core::{Category, ErrorPolicy, PipelineConfig};

use crate::import::{import_dataset, ImportReport};
use crate::queries::algorithms::{run_algorithm_demo, AlgorithmReport, ProjectionOutcome};
use crate::queries::analytics::{summarize, EdaSummary};
use crate::relate::{relate_category, RelateReport};
use crate::schema::{bootstrap, initialize_schema, BootstrapReport};
use crate::store::{Projection, SampleEdge};
use crate::GraphStore;

/// One stage of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "category", rename_all = "snake_case")]
pub enum PipelineStep {
    Schema,
    Bootstrap,
    Import(Category),
    Relate(Category),
    Analytics,
    Sample,
    Algorithms,
}

impl PipelineStep {
    /// Every step, in execution order.
    pub fn sequence() -> Vec<PipelineStep> {
        let mut steps = vec![PipelineStep::Schema, PipelineStep::Bootstrap];
        for category in Category::ALL {
            steps.push(PipelineStep::Import(category));
            steps.push(PipelineStep::Relate(category));
        }
        steps.extend([PipelineStep::Analytics, PipelineStep::Sample, PipelineStep::Algorithms]);
        steps
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::Schema => write!(f, "schema"),
            PipelineStep::Bootstrap => write!(f, "bootstrap"),
            PipelineStep::Import(c) => write!(f, "import {}", c),
            PipelineStep::Relate(c) => write!(f, "relate {}", c),
            PipelineStep::Analytics => write!(f, "analytics"),
            PipelineStep::Sample => write!(f, "sample"),
            PipelineStep::Algorithms => write!(f, "algorithms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed,
    /// Ran to the end with some rows not written.
    Partial { failures: usize },
    Skipped { reason: String },
    Failed { reason: String },
}

impl StepOutcome {
    /// Outcomes that stop a run under `ErrorPolicy::Halt`.
    pub fn halts(&self) -> bool {
        matches!(self, StepOutcome::Partial { .. } | StepOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: PipelineStep,
    pub outcome: StepOutcome,
    pub elapsed_ms: i64,
}

/// Everything a run did, step by step.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub backend: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
    pub bootstrap: Option<BootstrapReport>,
    pub imports: Vec<ImportReport>,
    pub relations: Vec<RelateReport>,
    pub summary: Option<EdaSummary>,
    pub sample: Vec<SampleEdge>,
    pub algorithms: Option<AlgorithmReport>,
    pub halted_at: Option<PipelineStep>,
}

impl PipelineReport {
    fn new(run_id: Uuid, backend: &'static str) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            backend,
            started_at: now,
            finished_at: now,
            steps: Vec::new(),
            bootstrap: None,
            imports: Vec::new(),
            relations: Vec::new(),
            summary: None,
            sample: Vec::new(),
            algorithms: None,
            halted_at: None,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    pub fn nodes_created(&self) -> usize {
        self.bootstrap.map_or(0, |b| b.nodes_created)
            + self.imports.iter().map(|i| i.nodes_created).sum::<usize>()
    }

    pub fn relationships_created(&self) -> usize {
        self.bootstrap.map_or(0, |b| b.relationships_created)
            + self.imports.iter().map(|i| i.nodes_created).sum::<usize>()
            + self
                .relations
                .iter()
                .map(|r| r.relationships_created)
                .sum::<usize>()
    }

    /// No step failed or was partial.
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| !s.outcome.halts())
    }

    pub fn failed_steps(&self) -> Vec<&StepReport> {
        self.steps.iter().filter(|s| s.outcome.halts()).collect()
    }
}

/// Run every step against `store`.
///
/// Only an invalid configuration is an `Err`; step failures end up in the
/// report.
pub async fn run_pipeline(store: &dyn GraphStore, config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let run_id = Uuid::new_v4();
    let span = info_span!("pipeline", run_id = %run_id, backend = store.backend());
    async move {
        info!(country = %config.country, policy = ?config.error_policy, "Pipeline started");
        let mut report = PipelineReport::new(run_id, store.backend());

        for step in PipelineStep::sequence() {
            let started = Utc::now();
            let outcome = run_step(store, config, step, &mut report).await;
            let elapsed_ms = (Utc::now() - started).num_milliseconds();

            match &outcome {
                StepOutcome::Completed => info!(step = %step, elapsed_ms, "Step completed"),
                StepOutcome::Partial { failures } => warn!(step = %step, failures, "Step partially completed"),
                StepOutcome::Skipped { reason } => warn!(step = %step, reason = %reason, "Step skipped"),
                StepOutcome::Failed { reason } => error!(step = %step, reason = %reason, "Step failed"),
            }

            let halt = config.error_policy == ErrorPolicy::Halt && outcome.halts();
            report.steps.push(StepReport {
                step,
                outcome,
                elapsed_ms,
            });
            if halt {
                error!(step = %step, "Pipeline halted");
                report.halted_at = Some(step);
                break;
            }
        }

        report.finished_at = Utc::now();
        info!(
            nodes = report.nodes_created(),
            rels = report.relationships_created(),
            elapsed_ms = report.elapsed_ms(),
            "Pipeline finished"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

async fn run_step(
    store: &dyn GraphStore,
    config: &PipelineConfig,
    step: PipelineStep,
    report: &mut PipelineReport,
) -> StepOutcome {
    let failed = |e: anyhow::Error| StepOutcome::Failed {
        reason: format!("{:#}", e),
    };

    match step {
        PipelineStep::Schema => match initialize_schema(store).await {
            Ok(_) => StepOutcome::Completed,
            Err(e) => failed(e),
        },
        PipelineStep::Bootstrap => match bootstrap(store, &config.country).await {
            Ok(created) => {
                report.bootstrap = Some(created);
                StepOutcome::Completed
            }
            Err(e) => failed(e),
        },
        PipelineStep::Import(category) => {
            let path = config.dataset_path(category);
            match import_dataset(store, category, &path, &config.encoding).await {
                Ok(imported) => {
                    let outcome = if imported.is_skipped() {
                        StepOutcome::Skipped {
                            reason: format!("{} not found", path.display()),
                        }
                    } else if imported.failures.is_empty() {
                        StepOutcome::Completed
                    } else {
                        StepOutcome::Partial {
                            failures: imported.failures.len(),
                        }
                    };
                    report.imports.push(imported);
                    outcome
                }
                Err(e) => failed(e),
            }
        }
        PipelineStep::Relate(category) => match relate_category(store, category).await {
            Ok(relations) => {
                report.relations.extend(relations);
                StepOutcome::Completed
            }
            Err(e) => failed(e),
        },
        PipelineStep::Analytics => match summarize(store, config.top_n, config.degree_limit).await {
            Ok(summary) => {
                report.summary = Some(summary);
                StepOutcome::Completed
            }
            Err(e) => failed(e),
        },
        PipelineStep::Sample => match store.sample_subgraph(None, config.sample_limit).await {
            Ok(rows) => {
                report.sample = rows;
                StepOutcome::Completed
            }
            Err(e) => failed(e),
        },
        PipelineStep::Algorithms => {
            let projection = Projection::stations(config.projection.as_str());
            let algorithms =
                run_algorithm_demo(store, &projection, &config.start_station, &config.end_station, false).await;
            let outcome = match (&algorithms.projection, &algorithms.path_error) {
                (ProjectionOutcome::Failed { reason }, _) | (_, Some(reason)) => StepOutcome::Failed {
                    reason: reason.clone(),
                },
                _ => StepOutcome::Completed,
            };
            report.algorithms = Some(algorithms);
            outcome
        }
    }
}
