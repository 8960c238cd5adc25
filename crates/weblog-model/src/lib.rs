//! Wire and domain types shared by the weblog crates.
//!
//! Everything here is plain data: events as they arrive from the workflow engine,
//! the derived timeline state, and the read-only views handed to renderers.

mod domain;
pub use domain::*;
