//! Router Module Index
//!
//! Page routes are built from the route table by `crate::shell`; the modules here
//! hold the table itself and the fixed endpoints mounted beside it.

/// The validated route descriptors and their provider trait.
pub mod table;

/// Session hand-off, sign-out and preference actions. No session required.
pub mod public;

/// JSON endpoints nested under `/api`.
pub mod api;
