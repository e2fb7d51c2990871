//! Core pipeline for cropdoc
//!
//! This crate provides the data structures and the synchronous logic behind
//! the plant-disease diagnosis page: image intake, the environment form,
//! step gating, interpretation of backend replies, and rendering of the
//! result (Markdown remedy text, reference image, environment echo).
//! Network I/O lives in `backend_bridge` and the browser frontend.

pub mod echo;
pub mod error;
pub mod flow;
pub mod form;
pub mod image_source;
pub mod intake;
pub mod markdown;
pub mod outbreak;
pub mod page;
pub mod submission;
pub mod types;

pub use error::{CoreError, SubmissionError};
pub use flow::Step;
pub use form::{EnvField, EnvironmentForm};
pub use intake::{ImageFile, ImageIntake, InMemoryPreviews, PreviewRef, PreviewUrls, UploadedImage};
pub use outbreak::{CottonDisease, OutbreakAddResponse, OutbreakPoint, OutbreakReport};
pub use page::{DiagnosisPage, PageEffects, PageView, ResultView};
pub use submission::{FallbackPolicy, RawReply, SubmissionRequest, Ticket};
pub use types::*;
