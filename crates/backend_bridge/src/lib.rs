//! Backend bridge for the diagnosis service
//!
//! Provides the HTTP side of cropdoc: the multipart `/diagnose` request,
//! the outbreak map endpoints, and a cancellable submission driver for
//! `diagnosis_core::DiagnosisPage`.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod client;
pub mod config;
pub mod outbreak;
pub mod pipeline;

pub use client::{BackendClient, DiagnosisTransport};
pub use config::BackendConfig;
pub use pipeline::{submit, SubmitOutcome};
pub use tokio_util::sync::CancellationToken;
