// src/core/progress.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::core::cancellation_token::CancellationToken;

/// The six stages of one factoring attempt, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parameters,
    PolynomialSelection,
    FactorBase,
    Sieve,
    LinearAlgebra,
    SquareRoot,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Parameters => "Parameters",
            Phase::PolynomialSelection => "Polynomial Selection",
            Phase::FactorBase => "Factor Base",
            Phase::Sieve => "Sieve",
            Phase::LinearAlgebra => "Linear Algebra",
            Phase::SquareRoot => "Square Root",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PhaseStarted { phase: Phase },
    PhaseProgress { phase: Phase, detail: String },
    PhaseFinished { phase: Phase, elapsed: Duration },
}

/// Observer for structured progress events. The pipeline never writes to the
/// console itself; the binary installs a log-backed observer.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Routes progress events to the `log` facade.
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PhaseStarted { phase } => {
                info!("---- {} ----", phase.name());
            }
            ProgressEvent::PhaseProgress { phase, detail } => {
                info!("[{}] {}", phase.name(), detail);
            }
            ProgressEvent::PhaseFinished { phase, elapsed } => {
                info!("---- {} done in {:.2}s ----", phase.name(), elapsed.as_secs_f64());
            }
        }
    }
}

/// Discards all events. Used by unit tests.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Per-run state threaded through every stage: the progress observer and the
/// cancellation token.
#[derive(Clone)]
pub struct RunContext {
    observer: Arc<dyn ProgressObserver>,
    cancel: CancellationToken,
}

impl RunContext {
    pub fn new(observer: Arc<dyn ProgressObserver>) -> Self {
        RunContext {
            observer,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(observer: Arc<dyn ProgressObserver>, cancel: CancellationToken) -> Self {
        RunContext { observer, cancel }
    }

    /// A context that logs phases and cannot be cancelled; convenient default.
    pub fn logging() -> Self {
        RunContext::new(Arc::new(LogObserver))
    }

    /// A silent context for tests.
    pub fn silent() -> Self {
        RunContext::new(Arc::new(NullObserver))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancellation_requested()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn progress(&self, phase: Phase, detail: impl Into<String>) {
        self.observer.on_event(&ProgressEvent::PhaseProgress {
            phase,
            detail: detail.into(),
        });
    }

    /// Emits the start event and returns a guard that emits the finish event
    /// (with elapsed time) when dropped.
    pub fn enter_phase(&self, phase: Phase) -> PhaseGuard {
        self.observer.on_event(&ProgressEvent::PhaseStarted { phase });
        PhaseGuard {
            observer: Arc::clone(&self.observer),
            phase,
            started: Instant::now(),
        }
    }
}

pub struct PhaseGuard {
    observer: Arc<dyn ProgressObserver>,
    phase: Phase,
    started: Instant,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        self.observer.on_event(&ProgressEvent::PhaseFinished {
            phase: self.phase,
            elapsed: self.started.elapsed(),
        });
    }
}
