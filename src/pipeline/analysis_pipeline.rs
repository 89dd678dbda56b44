use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::pipeline::state::PipelineState;
use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// Proof that an analysis was started. The resolution must hand it back so
/// the pipeline can tell whether the answer still applies.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    image: ImageHandle,
    sequence: u64,
}

impl AnalysisTicket {
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// State machine from attached image to displayed result.
///
/// Transitions:
/// - attach: any -> Idle, with the new image
/// - clear: any -> Idle, no image
/// - request_analysis: Idle/Success/Error -> Loading (needs an image, nothing in flight)
/// - resolve: Loading -> Success/Error, only for the current ticket
#[derive(Debug, Default)]
pub struct AnalysisPipeline {
    image: Option<ImageHandle>,
    state: PipelineState,
    next_sequence: u64,
    in_flight: Option<u64>,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Replaces the image. Any result or pending analysis for the old one is dropped.
    pub fn attach(&mut self, image: ImageHandle) {
        info!(
            "Attached chart {} at {}: {}",
            image.id(),
            image.attached_at().format("%H:%M:%S"),
            image.describe()
        );
        self.image = Some(image);
        self.reset();
    }

    pub fn clear(&mut self) {
        if let Some(image) = self.image.take() {
            info!("Cleared chart {}", image.id());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.in_flight = None;
        self.state = PipelineState::Idle;
    }

    /// Moves to Loading and returns the ticket to run, or `None` when there
    /// is no image or an analysis is already running.
    pub fn request_analysis(&mut self) -> Option<AnalysisTicket> {
        let Some(image) = self.image.clone() else {
            debug!("Analyze requested without an image, ignoring");
            return None;
        };
        if let Some(sequence) = self.in_flight {
            debug!("Analysis #{} still in flight, ignoring request", sequence);
            return None;
        }

        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.in_flight = Some(sequence);
        self.state = PipelineState::Loading {
            image: image.clone(),
        };
        info!("Analysis #{} started for chart {}", sequence, image.id());
        Some(AnalysisTicket { image, sequence })
    }

    /// Applies an analysis outcome. Returns `false` when the ticket is stale
    /// and the outcome was discarded.
    pub fn resolve(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                "Discarding stale analysis #{} for chart {}",
                ticket.sequence,
                ticket.image.id()
            );
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(result) => {
                info!(
                    "Analysis #{} found {} ({:.2})",
                    ticket.sequence, result.pattern, result.confidence
                );
                PipelineState::Success {
                    image: ticket.image,
                    result,
                }
            }
            Err(error) => {
                warn!("Analysis #{} failed: {}", ticket.sequence, error);
                PipelineState::Error {
                    image: ticket.image,
                    message: error.user_message().to_string(),
                }
            }
        };
        true
    }

    fn is_current(&self, ticket: &AnalysisTicket) -> bool {
        self.in_flight == Some(ticket.sequence)
            && self
                .image
                .as_ref()
                .is_some_and(|image| image.id() == ticket.image.id())
    }
}
