//! Background execution of AI calls, intake dispatch and card export.
//!
//! The UI thread never blocks: jobs run on their own threads and report back
//! over a channel that the frame loop drains. Each widget tags its request
//! with a [`RequestId`] from its [`RequestSlot`]; an outcome whose id is not
//! the slot's pending id is stale and gets dropped.

use crate::ai::{AiError, GenerateRequest, TextGenerator};
use crate::intake::{IntakeError, IntakeSink};
use crate::registration::{GreenCard, write_card};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// At most one request in flight per widget.
#[derive(Debug, Default)]
pub struct RequestSlot {
    last: u64,
    pending: Option<RequestId>,
}

impl RequestSlot {
    /// Issue a fresh id. Any request still pending becomes stale.
    pub fn begin(&mut self) -> RequestId {
        self.last += 1;
        let id = RequestId(self.last);
        self.pending = Some(id);
        id
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// True if `id` is the pending request; it is then no longer pending.
    pub fn accept(&mut self, id: RequestId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            debug!(id = id.get(), pending = ?self.pending.map(RequestId::get), "dropping stale response");
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Assistant,
    Wizard,
}

#[derive(Debug)]
pub enum Job {
    Generate {
        widget: Widget,
        id: RequestId,
        request: GenerateRequest,
    },
    Intake {
        id: RequestId,
        url: String,
        payload: Value,
    },
    ExportCard {
        path: PathBuf,
        card: GreenCard,
    },
}

impl Job {
    /// What to report if the job never gets to run.
    fn failure(&self, reason: &str) -> JobOutcome {
        match self {
            Job::Generate { widget, id, .. } => JobOutcome::Generated {
                widget: *widget,
                id: *id,
                result: Err(AiError::Request(reason.to_string())),
            },
            Job::Intake { id, .. } => JobOutcome::Dispatched {
                id: *id,
                result: Err(IntakeError::Request(reason.to_string())),
            },
            Job::ExportCard { path, .. } => JobOutcome::Exported {
                path: path.clone(),
                result: Err(anyhow::anyhow!("{reason}")),
            },
        }
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    Generated {
        widget: Widget,
        id: RequestId,
        result: Result<String, AiError>,
    },
    Dispatched {
        id: RequestId,
        result: Result<(), IntakeError>,
    },
    Exported {
        path: PathBuf,
        result: anyhow::Result<()>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct Worker {
    generator: Arc<dyn TextGenerator>,
    intake: Arc<dyn IntakeSink>,
    tx: mpsc::Sender<JobOutcome>,
    rx: mpsc::Receiver<JobOutcome>,
    waker: Option<Waker>,
}

impl Worker {
    pub fn new(generator: Arc<dyn TextGenerator>, intake: Arc<dyn IntakeSink>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generator,
            intake,
            tx,
            rx,
            waker: None,
        }
    }

    /// Called after each outcome is sent, typically to request a repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn submit(&self, job: Job) {
        let fallback = job.failure("could not start job thread");
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let generator = Arc::clone(&self.generator);
        let intake = Arc::clone(&self.intake);

        let spawned = std::thread::Builder::new()
            .name("greenland-job".to_string())
            .spawn(move || {
                let outcome = match job {
                    Job::Generate {
                        widget,
                        id,
                        request,
                    } => JobOutcome::Generated {
                        widget,
                        id,
                        result: generator.generate(&request),
                    },
                    Job::Intake { id, url, payload } => JobOutcome::Dispatched {
                        id,
                        result: intake.submit(&url, &payload),
                    },
                    Job::ExportCard { path, card } => JobOutcome::Exported {
                        result: write_card(&path, &card),
                        path,
                    },
                };
                // The receiver is gone only when the app is shutting down.
                let _ = tx.send(outcome);
                if let Some(wake) = waker {
                    wake();
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not start job thread");
            self.deliver(fallback);
        }
    }

    fn deliver(&self, outcome: JobOutcome) {
        let _ = self.tx.send(outcome);
        if let Some(wake) = &self.waker {
            wake();
        }
    }

    /// Outcomes that arrived since the last poll, in completion order.
    pub fn poll(&self) -> Vec<JobOutcome> {
        self.rx.try_iter().collect()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<JobOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}
