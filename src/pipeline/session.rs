use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tower::ServiceExt;
use tracing::{debug, warn};

use crate::error::{AnalysisError, InputError};
use crate::intake::{ChartFile, InputSource};
use crate::pipeline::analysis_pipeline::{AnalysisPipeline, AnalysisTicket};
use crate::pipeline::services::AnalysisService;
use crate::pipeline::state::PipelineState;
use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// Completion of background work, delivered back to the owning session.
enum SessionEvent {
    FileRead {
        sequence: u64,
        outcome: Result<ImageHandle, InputError>,
    },
    AnalysisSettled {
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    },
}

/// One user's pipeline plus the async plumbing around it.
///
/// Background tasks only ever send events; all state changes happen in
/// `poll`/`settle` on the owner's thread.
pub struct AnalysisSession {
    pipeline: AnalysisPipeline,
    input: InputSource,
    analyzer: AnalysisService,
    runtime: Handle,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
    file_sequence: u64,
    pending_file: Option<u64>,
}

impl AnalysisSession {
    /// Must be created inside a tokio runtime; background work is spawned on it.
    pub fn new(input: InputSource, analyzer: AnalysisService) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            pipeline: AnalysisPipeline::new(),
            input,
            analyzer,
            runtime: Handle::current(),
            events_tx,
            events_rx,
            file_sequence: 0,
            pending_file: None,
        }
    }

    pub fn state(&self) -> &PipelineState {
        self.pipeline.state()
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.pipeline.image()
    }

    /// True while a file read or an analysis is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending_file.is_some() || self.pipeline.has_in_flight()
    }

    /// Starts reading an offered file. `None` (nothing dropped) is a no-op.
    /// Non-image files are rejected here without touching the pipeline.
    pub fn set_from_file(&mut self, file: Option<ChartFile>) -> Result<(), InputError> {
        let Some(file) = file else {
            return Ok(());
        };
        self.input.check(&file)?;

        self.file_sequence += 1;
        let sequence = self.file_sequence;
        self.pending_file = Some(sequence);

        let input = self.input.clone();
        let events_tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let name = file.name().to_string();
            let outcome = match AssertUnwindSafe(input.read_file(file)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Err(InputError::Read {
                    name,
                    source: std::io::Error::other(panic_message(payload.as_ref())),
                }),
            };
            let _ = events_tx.send(SessionEvent::FileRead { sequence, outcome });
        });
        Ok(())
    }

    /// Attaches a typed URL. Re-submitting the attached URL keeps the current
    /// handle, and with it any result or in-flight analysis.
    pub fn set_from_url(&mut self, url: &str) -> Result<(), InputError> {
        let image = self.input.from_url(url)?;
        self.pending_file = None;
        if self.pipeline.image().and_then(ImageHandle::url) == image.url() {
            return Ok(());
        }
        self.pipeline.attach(image);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pending_file = None;
        self.pipeline.clear();
    }

    /// Starts an analysis of the attached image. Returns `false` when there
    /// is nothing to analyze or one is already running.
    pub fn analyze(&mut self) -> bool {
        let Some(ticket) = self.pipeline.request_analysis() else {
            return false;
        };

        let analyzer = self.analyzer.clone();
        let events_tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let call = analyzer.oneshot(ticket.image().clone());
            // A panicking analyzer must still settle the ticket
            let outcome = match AssertUnwindSafe(call).catch_unwind().await {
                Ok(outcome) => outcome.map_err(AnalysisError::from_boxed),
                Err(payload) => Err(AnalysisError::Failed(format!(
                    "analyzer panicked: {}",
                    panic_message(payload.as_ref())
                ))),
            };
            let _ = events_tx.send(SessionEvent::AnalysisSettled { ticket, outcome });
        });
        true
    }

    /// Applies every finished background task without blocking. Returns how
    /// many changed the pipeline.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next background task to finish and applies it.
    pub async fn settle(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::FileRead { sequence, outcome } => {
                if self.pending_file != Some(sequence) {
                    debug!("Discarding superseded file read #{}", sequence);
                    return false;
                }
                self.pending_file = None;
                match outcome {
                    Ok(image) => {
                        self.pipeline.attach(image);
                        true
                    }
                    Err(error) => {
                        warn!("Chart file rejected: {}", error);
                        false
                    }
                }
            }
            SessionEvent::AnalysisSettled { ticket, outcome } => {
                self.pipeline.resolve(ticket, outcome)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
