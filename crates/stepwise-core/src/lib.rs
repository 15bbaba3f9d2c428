//! Core library for the Stepwise workflow planner.
//!
//! A user states a goal, a language model drafts an ordered list of steps,
//! and the user edits, reorders, deletes and re-requests individual steps
//! before approving the plan. This crate holds everything below the user
//! interface:
//!
//! - [`store`]: the plan store, a synchronous state machine driven by
//!   [`store::Intent`]s, with undo/redo over a bounded [`history`] ledger
//! - [`session`]: screen stage, loading and error state around the store
//! - [`generation`]: the [`PlanGenerator`] boundary and an OpenAI-compatible
//!   client
//! - [`models`], [`display`], [`export`], [`params`], [`config`]
//!
//! # Quick Start
//!
//! ```rust
//! use stepwise_core::{
//!     models::StepDraft,
//!     session::SessionBuilder,
//!     store::{Intent, Transition},
//! };
//!
//! let mut session = SessionBuilder::new().build();
//! session.dispatch(Intent::SetGoal("Organize project files".to_string()));
//! session.dispatch(Intent::AddStep(StepDraft::manual()));
//! session.dispatch(Intent::AddStep(StepDraft::manual()));
//!
//! assert_eq!(
//!     session.dispatch(Intent::ReorderStep { from: 1, to: 0 }),
//!     Transition::Committed
//! );
//! assert_eq!(session.dispatch(Intent::Undo), Transition::Restored);
//! println!("{}", session.current_plan().unwrap());
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod generation;
pub mod history;
pub mod models;
pub mod params;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use display::{LocalDateTime, OperationStatus};
pub use error::{Result, StepwiseError};
pub use export::{share_text, write_export, PlanExport};
pub use generation::{GenerationFailure, OpenAiGenerator, PlanGenerator, AI_PROVENANCE_TAG};
pub use history::{HistoryLedger, HISTORY_CAPACITY};
pub use models::{
    Confidence, Plan, PlanId, PlanStatus, ReviewSummary, Step, StepDraft, StepId, StepPatch,
};
pub use session::{Session, SessionBuilder, Stage, SAMPLE_GOALS};
pub use store::{Clock, Intent, PlanStore, SystemClock, Transition};
