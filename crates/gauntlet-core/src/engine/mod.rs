//! Concurrent run engine: schedules `cases x runs` independent trials under
//! a global admission gate and collects results for aggregation.

pub mod stats;

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::catalog::EvalCase;
use crate::model::ToolDef;
use crate::providers::llm::LlmClient;
use crate::report::progress::{ProgressEvent, ProgressSink};
use crate::tool::ToolTransport;
use crate::trial::{run_trial, EvalResult, TrialConfig};

/// Run-wide settings.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Independent repetitions per case.
    pub num_runs: u32,
    /// Admission gate capacity: how many trials may be mid-flight at once.
    pub concurrency: usize,
    pub trial: TrialConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { num_runs: 5, concurrency: 8, trial: TrialConfig::default() }
    }
}

/// All completed runs for a single case. Under cancellation `runs` holds
/// whatever finished before the signal; otherwise exactly `num_runs` entries.
#[derive(Debug, Clone)]
pub struct CaseResults {
    pub case: EvalCase,
    pub runs: Vec<EvalResult>,
}

/// Shared mutable state across trial units: result slots plus the completed
/// counter. One lock is enough at this update frequency.
struct EngineState {
    slots: Vec<Vec<Option<EvalResult>>>,
    completed: usize,
}

pub struct RunEngine {
    client: Arc<dyn LlmClient>,
    transport: Arc<dyn ToolTransport>,
    tools: Arc<Vec<ToolDef>>,
    config: RunConfig,
}

impl RunEngine {
    pub fn new(
        client: Arc<dyn LlmClient>,
        transport: Arc<dyn ToolTransport>,
        tools: Vec<ToolDef>,
        config: RunConfig,
    ) -> Self {
        Self { client, transport, tools: Arc::new(tools), config }
    }

    /// Runs every (case, repetition) pair to completion or cancellation and
    /// returns per-case results in catalog order.
    ///
    /// Each unit acquires the admission gate before its first suspension
    /// point and releases it unconditionally on the way out; a hard trial
    /// failure becomes that trial's failed result, never the run's.
    pub async fn run(
        &self,
        cases: Vec<EvalCase>,
        cancel: CancellationToken,
        progress: Option<ProgressSink>,
    ) -> Vec<CaseResults> {
        let num_runs = self.config.num_runs.max(1) as usize;
        let total = cases.len() * num_runs;
        let gate = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let state = Arc::new(Mutex::new(EngineState {
            slots: vec![vec![None; num_runs]; cases.len()],
            completed: 0,
        }));

        let mut join_set = JoinSet::new();
        for (case_idx, case) in cases.iter().enumerate() {
            for run_idx in 0..num_runs {
                let gate = gate.clone();
                let state = state.clone();
                let cancel = cancel.clone();
                let progress = progress.clone();
                let client = self.client.clone();
                let transport = self.transport.clone();
                let tools = self.tools.clone();
                let trial_cfg = self.config.trial;
                let case = case.clone();

                join_set.spawn(async move {
                    // The permit is dropped on every exit path below.
                    let _permit = tokio::select! {
                        _ = cancel.cancelled() => return,
                        permit = gate.acquire_owned() => match permit {
                            Ok(p) => p,
                            Err(_) => return,
                        },
                    };
                    if cancel.is_cancelled() {
                        return;
                    }

                    let outcome =
                        run_trial(&*client, &tools, &*transport, &case, trial_cfg, &cancel).await;
                    let result = match outcome {
                        Ok(result) => result,
                        Err(e) if e.is_cancelled() => return,
                        Err(e) => {
                            // Isolation: a transport failure fails this trial only.
                            warn!(case = %case.name, run = run_idx, error = %e, "trial failed");
                            EvalResult {
                                outputs: vec![format!("ERROR: {e}")],
                                ..EvalResult::default()
                            }
                        }
                    };

                    let done = {
                        let mut st = state.lock().expect("engine state lock");
                        st.slots[case_idx][run_idx] = Some(result);
                        st.completed += 1;
                        st.completed
                    };
                    if let Some(sink) = &progress {
                        sink(ProgressEvent { done, total });
                    }
                });
            }
        }

        while join_set.join_next().await.is_some() {}

        let state = Arc::try_unwrap(state)
            .map(|m| m.into_inner().expect("engine state lock"))
            .unwrap_or_else(|arc| {
                let st = arc.lock().expect("engine state lock");
                EngineState { slots: st.slots.clone(), completed: st.completed }
            });

        cases
            .into_iter()
            .zip(state.slots)
            .map(|(case, slot)| CaseResults {
                case,
                runs: slot.into_iter().flatten().collect(),
            })
            .collect()
    }
}
