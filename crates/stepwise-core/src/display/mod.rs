//! Markdown formatting for plans, steps and command outcomes.
//!
//! Domain models implement `Display` directly (see [`models`]); the wrapper
//! types here cover the rest. Everything produces markdown so the same text
//! works in the terminal renderer and as MCP tool output.
//!
//! ```rust
//! use stepwise_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Plan approved");
//! assert_eq!(status.to_string(), "Success: Plan approved\n");
//! ```

pub mod datetime;
pub mod models;
pub mod status;

pub use datetime::LocalDateTime;
pub use status::OperationStatus;
