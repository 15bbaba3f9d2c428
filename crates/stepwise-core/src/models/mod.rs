//! Data models for plans and steps.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures separate from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use jiff::Timestamp;
//! use stepwise_core::models::{Plan, Step, StepDraft, StepId};
//!
//! let mut plan = Plan::new("Clean up my CRM", Timestamp::UNIX_EPOCH);
//! plan.steps.push(Step::from_draft(StepId::new(), 0, StepDraft::manual()));
//!
//! assert!(plan.has_contiguous_order());
//! assert_eq!(plan.ordered_steps()[0].title, "New Step");
//! ```

pub mod confidence;
pub mod ids;
pub mod plan;
pub mod requests;
pub mod status;
pub mod step;
pub mod summary;


pub use confidence::Confidence;
pub use ids::{PlanId, StepId};
pub use plan::Plan;
pub use requests::{StepDraft, StepPatch, MANUAL_PROVENANCE_TAG};
pub use status::PlanStatus;
pub use step::Step;
pub use summary::ReviewSummary;
