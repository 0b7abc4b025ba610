//! Per-operation orchestration and state machine.

use crate::asset::ImageAsset;
use crate::error::{ForgeError, Result};
use crate::gateway::{Backend, ENV_API_KEY};
use crate::request::GenerateContentRequest;
use crate::response::{Outcome, ResultImage};

/// The three user-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Modify one image per an instruction.
    Manipulate,
    /// Create an image from an instruction alone.
    Generate,
    /// Merge two images per an instruction.
    Combine,
}

impl Operation {
    /// Number of input images the operation requires.
    pub fn required_images(&self) -> usize {
        match self {
            Self::Manipulate => 1,
            Self::Generate => 0,
            Self::Combine => 2,
        }
    }

    /// Short lowercase name for display and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manipulate => "manipulate",
            Self::Generate => "generate",
            Self::Combine => "combine",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Manipulate => "Image successfully manipulated!",
            Self::Generate => "Image successfully generated!",
            Self::Combine => "Images successfully combined!",
        }
    }
}

/// Presentation-facing state of one operation instance.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState {
    /// Nothing in flight, no result to show.
    Idle,
    /// A dispatch is in flight; the trigger is refused in this state.
    Loading,
    /// The operation finished with a usable result.
    Succeeded {
        /// The resulting image, when the response carried one.
        image: Option<ResultImage>,
        /// User-visible confirmation; the model's text remark when present.
        message: String,
    },
    /// The operation failed.
    Failed {
        /// Human-readable failure message.
        message: String,
    },
}

/// Token tying an in-flight dispatch to the inputs it was started from.
///
/// A completion whose token was superseded (inputs cleared or replaced
/// mid-flight) is dropped instead of landing on unrelated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    generation: u64,
}

/// Drives one operation: encode inputs, assemble the payload, dispatch, and
/// interpret the response, surfacing every failure as a `Failed` state.
///
/// Instances are independent; the three operations never share state. At
/// most one dispatch is in flight per instance: [`begin`](Self::begin)
/// refuses while `Loading`.
pub struct OperationController {
    operation: Operation,
    instruction: String,
    slots: Vec<Option<ImageAsset>>,
    state: OperationState,
    generation: u64,
}

impl OperationController {
    /// Creates an idle controller for the given operation.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            instruction: String::new(),
            slots: (0..operation.required_images()).map(|_| None).collect(),
            state: OperationState::Idle,
            generation: 0,
        }
    }

    /// Returns the operation this controller drives.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the current state.
    pub fn state(&self) -> &OperationState {
        &self.state
    }

    /// Returns the current instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Sets the instruction text.
    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    /// Places an image in the given slot, superseding any in-flight dispatch
    /// and discarding a previous result.
    pub fn attach_image(&mut self, slot: usize, asset: ImageAsset) {
        self.slots[slot] = Some(asset);
        self.reset_result();
    }

    /// Removes the image in the given slot, superseding any in-flight
    /// dispatch and discarding a previous result.
    pub fn remove_image(&mut self, slot: usize) {
        self.slots[slot] = None;
        self.reset_result();
    }

    /// Clears all inputs and returns to `Idle`.
    pub fn clear(&mut self) {
        self.instruction.clear();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.reset_result();
    }

    fn reset_result(&mut self) {
        if matches!(self.state, OperationState::Loading) {
            // Supersede the in-flight dispatch; its completion will be dropped.
            self.generation += 1;
        }
        self.state = OperationState::Idle;
    }

    /// Returns true when every required input is present and non-empty.
    pub fn inputs_ready(&self) -> bool {
        !self.instruction.trim().is_empty() && self.slots.iter().all(Option::is_some)
    }

    /// Returns true when a trigger would start a dispatch.
    pub fn can_trigger(&self) -> bool {
        self.inputs_ready() && !matches!(self.state, OperationState::Loading)
    }

    /// Transitions to `Loading` and hands out a dispatch token.
    ///
    /// Returns `None` (a no-op, no state change) while required inputs are
    /// missing or a dispatch is already in flight.
    pub fn begin(&mut self) -> Option<Dispatch> {
        if !self.can_trigger() {
            return None;
        }
        self.generation += 1;
        self.state = OperationState::Loading;
        Some(Dispatch {
            generation: self.generation,
        })
    }

    /// Applies the result of a dispatch.
    ///
    /// Returns false (state untouched) when the token was superseded after
    /// [`begin`](Self::begin) or its result was already applied; exactly one
    /// `Loading` to terminal transition happens per dispatch.
    pub fn complete(&mut self, dispatch: Dispatch, result: Result<Outcome>) -> bool {
        if dispatch.generation != self.generation
            || !matches!(self.state, OperationState::Loading)
        {
            tracing::debug!(op = self.operation.label(), "dropping superseded completion");
            return false;
        }

        self.state = match result {
            Ok(outcome) => OperationState::Succeeded {
                message: outcome
                    .message
                    .unwrap_or_else(|| self.operation.success_message().to_string()),
                image: outcome.image,
            },
            Err(err) => OperationState::Failed {
                message: user_message(&err),
            },
        };
        true
    }

    /// Runs the whole operation against the given backend.
    ///
    /// A no-op when the trigger is refused; otherwise drives
    /// encode → assemble → dispatch → interpret and lands in `Succeeded` or
    /// `Failed`. Errors never propagate past this boundary.
    pub async fn run(&mut self, backend: &impl Backend) -> &OperationState {
        let Some(dispatch) = self.begin() else {
            return &self.state;
        };

        tracing::debug!(op = self.operation.label(), "operation dispatched");
        let result = self.execute(backend).await;
        self.complete(dispatch, result);
        &self.state
    }

    async fn execute(&self, backend: &impl Backend) -> Result<Outcome> {
        // Slots encode strictly in order; the first read finishes before the
        // second starts, and the payload is only assembled once all are ready.
        let mut images = Vec::with_capacity(self.slots.len());
        for asset in self.slots.iter().flatten() {
            images.push(asset.encode().await?);
        }

        let payload = GenerateContentRequest::assemble(self.instruction.trim(), &images);
        let response = backend.dispatch(&payload).await?;
        response.interpret()
    }
}

fn user_message(err: &ForgeError) -> String {
    match err {
        ForgeError::Config(_) => format!("{ENV_API_KEY} environment variable is not set"),
        ForgeError::RateLimited { .. } => {
            "Rate limit exceeded. Please try again in a few moments.".to_string()
        }
        ForgeError::EmptyResponse => "Received an empty response from the API".to_string(),
        ForgeError::Upstream { message, .. } => format!("API Error: {message}"),
        other => other.to_string(),
    }
}
