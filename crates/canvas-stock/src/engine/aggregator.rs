//! Partial-data aggregator
//!
//! Fetches the seven sections of a stock analysis concurrently and merges each
//! one into the shared [`DashboardState`] as soon as it settles, so the UI can
//! render whatever subset is available instead of waiting on the slowest
//! (LLM-backed) call.
//!
//! Every load gets a generation number. A settle is applied only while its
//! generation and stock code are still current, which keeps late responses
//! from a superseded selection out of the view-model. Superseded requests are
//! not aborted; their results are dropped on arrival.

use super::view_model::{DashboardState, FailureKind, LoadPhase, SectionOutcome};
use crate::api::AnalysisBackend;
use crate::error::{CanvasError, Result};
use crate::model::{ChartPeriod, Section, SectionData};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Page-level message shown when every section failed
pub const ALL_FAILED_MESSAGE: &str = "데이터 로딩 실패: 모든 섹션을 불러오지 못했습니다.";

/// Notifications for the current load
///
/// Events belonging to a superseded generation are never sent.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregatorEvent {
    /// One section settled and was applied
    SectionSettled {
        generation: u64,
        stock_code: String,
        section: Section,
        outcome: SectionOutcome,
    },
    /// All seven sections settled
    LoadComplete(LoadSummary),
}

/// Result of one load once every section settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub generation: u64,
    pub stock_code: String,
    pub succeeded: Vec<Section>,
    pub failed: Vec<(Section, FailureKind)>,
    /// Another load replaced this one before it finished
    pub superseded: bool,
}

impl LoadSummary {
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty()
    }
}

/// Handle to a running load
#[derive(Debug)]
pub struct LoadHandle {
    generation: u64,
    stock_code: String,
    driver: JoinHandle<LoadSummary>,
}

impl LoadHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stock_code(&self) -> &str {
        &self.stock_code
    }

    pub fn is_finished(&self) -> bool {
        self.driver.is_finished()
    }

    /// Wait until every section of this load settled
    pub async fn wait(self) -> Result<LoadSummary> {
        self.driver
            .await
            .map_err(|e| CanvasError::Other(format!("load task failed: {e}")))
    }
}

struct Inner {
    backend: Arc<dyn AnalysisBackend>,
    state: watch::Sender<DashboardState>,
    events: broadcast::Sender<AggregatorEvent>,
}

/// Cheaply cloneable aggregator handle
///
/// All mutation of the dashboard state goes through this type.
#[derive(Clone)]
pub struct AnalysisAggregator {
    inner: Arc<Inner>,
}

impl AnalysisAggregator {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (state, _) = watch::channel(DashboardState::idle(0));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                backend,
                state,
                events,
            }),
        }
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    /// Receive settle and completion events
    pub fn events(&self) -> broadcast::Receiver<AggregatorEvent> {
        self.inner.events.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.inner.state.borrow().generation
    }

    /// Start loading every section of `stock_code`
    ///
    /// Replaces the current state with an empty view-model and all loading
    /// flags set, then launches one task per section. Must be called inside a
    /// Tokio runtime.
    pub fn load_analysis(&self, stock_code: impl Into<String>) -> LoadHandle {
        let stock_code = stock_code.into();
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            generation = state.generation + 1;
            *state = DashboardState::loading(generation, stock_code.clone());
        });
        info!(%stock_code, generation, "loading analysis");

        let tasks: Vec<(Section, JoinHandle<SectionOutcome>)> = Section::ALL
            .into_iter()
            .map(|section| {
                let this = self.clone();
                let code = stock_code.clone();
                let task =
                    tokio::spawn(async move { this.run_section(generation, code, section).await });
                (section, task)
            })
            .collect();

        let this = self.clone();
        let code = stock_code.clone();
        let driver = tokio::spawn(async move {
            let (sections, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
            let joined = join_all(handles).await;

            let mut results = Vec::with_capacity(sections.len());
            for (section, outcome) in sections.into_iter().zip(joined) {
                let outcome = match outcome {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(stock_code = %code, %section, error = %e, "section task died");
                        this.settle(generation, &code, section, Err(FailureKind::Aborted))
                    }
                };
                results.push((section, outcome));
            }

            this.finish(generation, &code, results)
        });

        LoadHandle {
            generation,
            stock_code,
            driver,
        }
    }

    /// Reload the current stock as a new, independent load
    ///
    /// Returns `None` when nothing is selected.
    pub fn refresh(&self) -> Option<LoadHandle> {
        let snapshot = self.snapshot();
        if snapshot.phase == LoadPhase::Idle || snapshot.stock_code().is_empty() {
            return None;
        }
        Some(self.load_analysis(snapshot.stock_code().to_string()))
    }

    /// Drop the current view-model; in-flight responses become stale
    pub fn reset(&self) {
        self.inner.state.send_modify(|state| {
            *state = DashboardState::idle(state.generation + 1);
        });
        debug!("dashboard reset");
    }

    /// Refetch the chart for another period and merge it into the current load
    ///
    /// The merged chart settles the chart slot; a chart section response of the
    /// same load arriving later is dropped. Returns `false` when the selection
    /// moved on before the chart arrived.
    pub async fn load_chart_period(&self, stock_code: &str, period: ChartPeriod) -> Result<bool> {
        let generation = self.current_generation();
        let chart = self.inner.backend.fetch_chart(stock_code, period).await?;

        let applied = self.inner.state.send_if_modified(|state| {
            if !is_current(state, generation, stock_code) {
                return false;
            }
            Arc::make_mut(&mut state.view_model).merge(SectionData::Chart(chart));
            state.loading.clear(Section::Chart);
            state.outcomes.insert(Section::Chart, SectionOutcome::Ready);
            true
        });

        if !applied {
            debug!(%stock_code, %period, "discarding stale chart period");
        }
        Ok(applied)
    }

    async fn run_section(&self, generation: u64, stock_code: String, section: Section) -> SectionOutcome {
        let result = match self.inner.backend.fetch_section(&stock_code, section).await {
            Ok(payload) => match SectionData::from_payload(section, payload) {
                Some(data) => Ok(data),
                None => {
                    warn!(%stock_code, %section, "response did not contain the section");
                    Err(FailureKind::MissingSection)
                }
            },
            Err(e) => {
                warn!(%stock_code, %section, error = %e, "section fetch failed");
                Err(FailureKind::from(&e))
            }
        };

        self.settle(generation, &stock_code, section, result)
    }

    fn settle(
        &self,
        generation: u64,
        stock_code: &str,
        section: Section,
        result: std::result::Result<SectionData, FailureKind>,
    ) -> SectionOutcome {
        let mut outcome = match &result {
            Ok(_) => SectionOutcome::Ready,
            Err(kind) => SectionOutcome::Failed(*kind),
        };

        let mut stale = false;
        let mut already_settled = false;
        self.inner.state.send_if_modified(|state| {
            if !is_current(state, generation, stock_code) {
                stale = true;
                return false;
            }
            let settled = state.outcome(section);
            if settled != SectionOutcome::Pending {
                already_settled = true;
                outcome = settled;
                return false;
            }
            state.loading.clear(section);
            state.outcomes.insert(section, outcome);
            if let Ok(data) = result {
                Arc::make_mut(&mut state.view_model).merge(data);
            }
            // Sent under the state lock so a newer load never sees it
            let _ = self.inner.events.send(AggregatorEvent::SectionSettled {
                generation,
                stock_code: stock_code.to_string(),
                section,
                outcome,
            });
            true
        });

        if stale {
            debug!(%stock_code, %section, generation, "discarding stale section");
        } else if already_settled {
            debug!(%stock_code, %section, "section already settled by a chart period");
        }

        outcome
    }

    fn finish(
        &self,
        generation: u64,
        stock_code: &str,
        results: Vec<(Section, SectionOutcome)>,
    ) -> LoadSummary {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (section, outcome) in results {
            match outcome {
                SectionOutcome::Failed(kind) => failed.push((section, kind)),
                SectionOutcome::Ready | SectionOutcome::Pending => succeeded.push(section),
            }
        }

        let mut summary = LoadSummary {
            generation,
            stock_code: stock_code.to_string(),
            succeeded,
            failed,
            superseded: true,
        };

        let all_failed = summary.all_failed();
        let applied = self.inner.state.send_if_modified(|state| {
            if !is_current(state, generation, stock_code) {
                return false;
            }
            state.phase = if all_failed {
                LoadPhase::Failed {
                    message: ALL_FAILED_MESSAGE.to_string(),
                }
            } else {
                LoadPhase::Complete
            };
            summary.superseded = false;
            let _ = self
                .inner
                .events
                .send(AggregatorEvent::LoadComplete(summary.clone()));
            true
        });

        if applied {
            info!(
                %stock_code,
                generation,
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "analysis load complete"
            );
        } else {
            debug!(%stock_code, generation, "superseded load finished");
        }

        summary
    }
}

fn is_current(state: &DashboardState, generation: u64, stock_code: &str) -> bool {
    state.generation == generation && state.stock_code() == stock_code
}
