#![warn(missing_docs)]
//! Picforge - image manipulation, generation, and combination via the
//! Gemini image API.
//!
//! All image transformation happens on the remote model; this crate encodes
//! inputs, assembles the request, awaits a single network round-trip,
//! interprets the response parts, and drives a per-operation state machine
//! for presentation.
//!
//! # Quick Start
//!
//! ```no_run
//! use picforge::{ApiGateway, ImageAsset, Operation, OperationController, OperationState};
//!
//! #[tokio::main]
//! async fn main() -> picforge::Result<()> {
//!     let gateway = ApiGateway::builder().build()?;
//!
//!     let mut op = OperationController::new(Operation::Manipulate);
//!     op.set_instruction("Add a rainbow in the background");
//!     op.attach_image(0, ImageAsset::from_path("photo.png")?);
//!
//!     if let OperationState::Succeeded { image: Some(image), .. } = op.run(&gateway).await {
//!         image.save("result.png")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Operations
//!
//! - [`Operation::Manipulate`]: one image + instruction
//! - [`Operation::Generate`]: instruction only
//! - [`Operation::Combine`]: two images + instruction
//!
//! Each [`OperationController`] instance is independent; the three
//! operations may be in flight concurrently with no shared state.

pub mod asset;
pub mod controller;
mod error;
pub mod gateway;
pub mod request;
pub mod response;

pub use asset::{EncodedImage, ImageAsset, ImageFormat, MAX_ASSET_BYTES};
pub use controller::{Dispatch, Operation, OperationController, OperationState};
pub use error::{ForgeError, Result};
pub use gateway::{ApiGateway, ApiGatewayBuilder, Backend, ImageModel, ENV_API_KEY};
pub use request::GenerateContentRequest;
pub use response::{GenerateContentResponse, Outcome, ResponsePart, ResultImage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::asset::ImageAsset;
    pub use crate::controller::{Operation, OperationController, OperationState};
    pub use crate::error::{ForgeError, Result};
    pub use crate::gateway::{ApiGateway, Backend};
    pub use crate::response::ResultImage;
}
