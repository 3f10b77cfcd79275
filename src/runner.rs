use crate::{Ctx, Outcome, StepError, Workflow};
use std::time::{Duration, Instant};

/// Passed to the `on_step` hook after each successful attempt at a stage.
pub struct StepEvent<'a> {
    pub step: &'a str,
    pub outcome: &'a Outcome,
    pub duration: Duration,
    /// Attempts made so far in this run, retries included.
    pub step_number: usize,
    pub retries: usize,
}

/// Passed to the `on_error` hook when a stage errors or runs out of retries.
pub struct ErrorEvent<'a> {
    pub step: &'a str,
    pub error: &'a StepError,
    pub step_number: usize,
}

type StepHook = Box<dyn FnMut(&StepEvent)>;
type ErrorHook = Box<dyn FnMut(&ErrorEvent)>;

/// Runs every stage of a workflow in order, re-running a stage that asks
/// for it until `max_retries` is spent.
pub struct Runner<S: Clone + 'static> {
    wf: Workflow<S>,
    max_retries: usize,
    on_step: Option<StepHook>,
    on_error: Option<ErrorHook>,
}

impl<S: Clone + 'static> Runner<S> {
    pub fn new(wf: Workflow<S>) -> Self {
        Self {
            wf,
            max_retries: 3,
            on_step: None,
            on_error: None,
        }
    }

    pub fn workflow(&self) -> &Workflow<S> {
        &self.wf
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Register a callback that fires after each successful attempt.
    pub fn on_step(mut self, cb: impl FnMut(&StepEvent) + 'static) -> Self {
        self.on_step = Some(Box::new(cb));
        self
    }

    /// Register a callback that fires when a run fails.
    pub fn on_error(mut self, cb: impl FnMut(&ErrorEvent) + 'static) -> Self {
        self.on_error = Some(Box::new(cb));
        self
    }

    /// Report stage transitions and failures as tracing events.
    pub fn with_tracing(self) -> Self {
        let workflow = self.wf.name();
        self.on_step(move |e| {
            tracing::debug!(
                workflow,
                step = e.step,
                step_number = e.step_number,
                retries = e.retries,
                outcome = ?e.outcome,
                elapsed_ms = e.duration.as_millis() as u64,
                "step finished"
            );
        })
        .on_error(move |e| {
            tracing::warn!(
                workflow,
                step = e.step,
                step_number = e.step_number,
                error = %e.error,
                "step failed"
            );
        })
    }

    pub fn run(&mut self, mut state: S, ctx: &mut Ctx) -> Result<S, StepError> {
        let Self {
            wf,
            max_retries,
            on_step,
            on_error,
        } = self;
        let mut step_number: usize = 0;

        for stage in wf.stages_mut() {
            let name = stage.name();
            let mut retries: usize = 0;

            loop {
                step_number += 1;

                let start = Instant::now();
                let result = stage.run(state.clone(), ctx);
                let duration = start.elapsed();

                let (next_state, outcome) = match result {
                    Ok(ok) => ok,
                    Err(err) => {
                        if let Some(cb) = on_error {
                            cb(&ErrorEvent {
                                step: name,
                                error: &err,
                                step_number,
                            });
                        }
                        return Err(err);
                    }
                };

                if let Some(cb) = on_step {
                    cb(&StepEvent {
                        step: name,
                        outcome: &outcome,
                        duration,
                        step_number,
                        retries,
                    });
                }
                state = next_state;

                let Outcome::Retry(hint) = outcome else {
                    break;
                };

                retries += 1;
                if retries > *max_retries {
                    let err = StepError::other(format!(
                        "step '{name}' exceeded max retries ({max_retries}): {}",
                        hint.reason
                    ));
                    if let Some(cb) = on_error {
                        cb(&ErrorEvent {
                            step: name,
                            error: &err,
                            step_number,
                        });
                    }
                    return Err(err);
                }

                tracing::warn!(
                    step = name,
                    attempt = retries + 1,
                    reason = %hint.reason,
                    "retrying step"
                );
                if !hint.after.is_zero() {
                    std::thread::sleep(hint.after);
                }
            }
        }

        Ok(state)
    }
}
