//! # Veneer Upload
//!
//! Multipart file upload transport for the Veneer upload component.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   UploadRequest    ┌──────────────────┐
//! │   Upload view    │ ─────────────────▶ │    Transport     │
//! │ (file list, UI)  │ ◀── progress ───── │  (UploadClient)  │
//! └──────────────────┘ ◀── body / error ─ └────────┬─────────┘
//!                                                  │ multipart POST
//!                                                  ▼
//!                                              endpoint
//! ```
//!
//! A request posts the extra form fields followed by the file under its
//! field name. Progress is streamed as the file is handed to the connection.
//! A 2xx response yields the parsed body; anything else yields an
//! [`UploadError`]. Failures are reported once and never retried.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{Transport, UploadClient};
pub use error::UploadError;
pub use request::{ProgressSender, UploadFile, UploadProgress, UploadRequest};
pub use response::{interpret, parse_body, UploadBody};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
