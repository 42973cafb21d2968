//! # Veneer Pagination
//!
//! Headless state model behind the Veneer pagination control.
//!
//! [`Pagination`] owns the current page, page size and page count, keeps them
//! consistent as the caller changes any of them, and computes the pager items
//! a view renders. Changes are reported as [`PaginationEvent`]s.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod layout;
pub mod pager;
pub mod pagination;

pub use config::PaginationConfig;
pub use error::{PaginationError, PaginationResult};
pub use layout::{Layout, LayoutItem};
pub use pager::{pager_items, PagerItem};
pub use pagination::{Pagination, PaginationEvent};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
