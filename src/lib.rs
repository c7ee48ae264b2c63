//! Print-mockup pipeline: locate the solid-color placeholder region in a
//! blank product photo, composite a user design into it, and drive an
//! external asynchronous rendering provider to a terminal state.
//!
//! The pipeline splits into stateless stages plus one state machine:
//!
//! - [`color`] classifies pixels by perceptual hue/saturation/lightness
//! - [`detect`] scans a raster once and emits a normalized [`PrintArea`]
//! - [`composite`] cover-fits a design into the denormalized rectangle
//! - [`orchestrate`] submits and polls a provider job until it completes,
//!   is rejected, or times out
//! - [`compare`] pairs the local preview with the authoritative provider
//!   output for verification
#![forbid(unsafe_code)]

pub mod assets;
pub mod color;
pub mod compare;
pub mod composite;
pub mod detect;
pub mod error;
pub mod geom;
pub mod orchestrate;
pub mod pipeline;
pub mod provider;
pub mod registry;

pub use color::{ClassifierParams, Hsl, hue_distance, rgb_to_hsl};
pub use compare::{Comparison, build_comparison};
pub use composite::{DebugStage, compose_mockup};
pub use detect::detect_print_area;
pub use error::{PrintmockError, PrintmockResult};
pub use geom::{PixelRect, PrintArea};
pub use orchestrate::{
    GeneratedMockups, MockupTask, PollConfig, generate_mockup, generate_mockup_with_deadline,
    poll_to_completion,
};
pub use provider::{HttpRenderProvider, MockupFile, RenderProvider, TaskKey, TaskPoll, TaskStatus};
pub use registry::{JsonFileStore, MemoryStore, ProductVariant, VariantStore, ensure_print_area};
