//! Tests for the session module.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use jiff::Timestamp;

use super::*;
use crate::{
    generation::AI_PROVENANCE_TAG,
    models::{Confidence, Step, StepDraft},
    params,
    store::TickingClock,
};

/// Generator that either always succeeds with fixed steps or always fails.
#[derive(Debug, Default)]
struct StubGenerator {
    fail: bool,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn draft(title: &str) -> StepDraft {
    StepDraft {
        title: title.to_string(),
        description: format!("{title} description"),
        tool_name: "Zapier".to_string(),
        reasoning: "Needed".to_string(),
        confidence: Confidence::new(0.75),
        ai_agent: "model".to_string(),
    }
}

#[async_trait]
impl PlanGenerator for StubGenerator {
    async fn generate(
        &self,
        _goal: &str,
    ) -> std::result::Result<Vec<StepDraft>, GenerationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationFailure::MalformedOutput("no steps".to_string()));
        }
        Ok(vec![draft("Collect invoices"), draft("Extract totals")])
    }

    async fn revise(
        &self,
        step: &Step,
        instruction: &str,
    ) -> std::result::Result<StepDraft, GenerationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationFailure::Api {
                status: 500,
                message: "upstream error".to_string(),
            });
        }
        Ok(draft(&format!("{} ({instruction})", step.title)))
    }
}

fn create_test_session() -> Session {
    SessionBuilder::new()
        .with_clock(Arc::new(TickingClock::new(
            Timestamp::from_second(1_700_000_000).unwrap(),
        )))
        .build()
}

async fn session_with_plan() -> Session {
    let mut session = create_test_session();
    session
        .generate_plan("Automate invoice processing", &StubGenerator::default())
        .await
        .expect("generation should succeed");
    session
}

#[test]
fn test_new_session_state() {
    let session = create_test_session();
    assert_eq!(session.stage(), Stage::Input);
    assert!(!session.is_loading());
    assert!(session.error().is_none());
    assert!(session.current_plan().is_none());
    assert!(!session.can_undo());
    assert!(!session.can_redo());
}

#[test]
fn test_validate_goal() {
    assert_eq!(validate_goal("  Clean up my CRM \n").unwrap(), "Clean up my CRM");
    assert!(matches!(
        validate_goal("   "),
        Err(StepwiseError::InvalidInput { .. })
    ));

    let at_limit = "x".repeat(MAX_GOAL_CHARS);
    assert!(validate_goal(&at_limit).is_ok());
    let over_limit = "é".repeat(MAX_GOAL_CHARS + 1);
    assert!(validate_goal(&over_limit).is_err());
}

#[test]
fn test_set_stage_requires_plan() {
    let mut session = create_test_session();
    for stage in [Stage::Planning, Stage::Review, Stage::Final] {
        assert!(matches!(
            session.set_stage(stage),
            Err(StepwiseError::NoCurrentPlan)
        ));
    }
    assert!(session.set_stage(Stage::Input).is_ok());
}

#[tokio::test]
async fn test_generate_plan_success() {
    let generator = StubGenerator::default();
    let mut session = create_test_session();

    session
        .generate_plan("  Automate invoice processing ", &generator)
        .await
        .unwrap();

    let plan = session.current_plan().unwrap();
    assert_eq!(plan.goal, "Automate invoice processing");
    assert_eq!(plan.steps.len(), 2);
    assert!(plan.steps.iter().all(|s| s.ai_agent == AI_PROVENANCE_TAG));
    assert_eq!(session.stage(), Stage::Planning);
    assert!(!session.is_loading());
    assert!(session.error().is_none());
    assert!(session.last_request().is_none());
    assert_eq!(generator.calls(), 1);

    // SetGoal then SetPlan
    assert_eq!(session.store().history().len(), 2);
}

#[tokio::test]
async fn test_generate_plan_rejects_empty_goal_without_calling_service() {
    let generator = StubGenerator::default();
    let mut session = create_test_session();

    let err = session.generate_plan("  ", &generator).await.unwrap_err();

    assert!(matches!(err, StepwiseError::InvalidInput { .. }));
    assert_eq!(generator.calls(), 0);
    assert!(session.current_plan().is_none());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_generate_plan_failure_sets_error() {
    let mut session = create_test_session();

    let err = session
        .generate_plan("Organize project files", &StubGenerator::failing())
        .await
        .unwrap_err();

    assert!(err.is_generation_failure());
    assert_eq!(
        session.error(),
        Some("Generation service returned malformed output: no steps")
    );
    assert!(!session.is_loading());
    assert_eq!(session.stage(), Stage::Input);
    assert_eq!(
        session.last_request(),
        Some(&GenerationRequest::Plan {
            goal: "Organize project files".to_string()
        })
    );

    // The goal was recorded before the call; no SetPlan followed.
    let plan = session.current_plan().unwrap();
    assert_eq!(plan.goal, "Organize project files");
    assert!(plan.steps.is_empty());
}

#[tokio::test]
async fn test_retry_after_failure() {
    let mut session = create_test_session();
    let _ = session
        .generate_plan("Organize project files", &StubGenerator::failing())
        .await;

    let retried = session.retry(&StubGenerator::default()).await.unwrap();

    assert!(retried);
    assert!(session.error().is_none());
    assert!(session.last_request().is_none());
    assert_eq!(session.current_plan().unwrap().steps.len(), 2);
    assert_eq!(session.stage(), Stage::Planning);
}

#[tokio::test]
async fn test_failed_retries_do_not_grow_history() {
    let mut session = create_test_session();
    session
        .start_plan(&params::Goal {
            goal: "Clean up my CRM".to_string(),
        })
        .unwrap();
    session.add_step(params::AddStep::default()).unwrap();

    let failing = StubGenerator::failing();
    let _ = session.generate_plan("Organize project files", &failing).await;
    let snapshots = session.store().history().len();
    assert_eq!(snapshots, 3);

    for _ in 0..5 {
        assert!(session.retry(&failing).await.is_err());
    }

    assert_eq!(failing.calls(), 6);
    assert_eq!(session.store().history().len(), snapshots);

    // One undo reaches the hand-written plan again.
    session.dispatch(Intent::Undo);
    let plan = session.current_plan().unwrap();
    assert_eq!(plan.goal, "Clean up my CRM");
    assert_eq!(plan.steps.len(), 1);
}

#[tokio::test]
async fn test_generate_reuses_empty_plan_for_same_goal() {
    let mut session = create_test_session();
    session
        .start_plan(&params::Goal {
            goal: "Organize project files".to_string(),
        })
        .unwrap();
    let empty_id = session.current_plan().unwrap().id;

    session
        .generate_plan("Organize project files", &StubGenerator::default())
        .await
        .unwrap();

    // SetGoal from start_plan, then SetPlan only
    assert_eq!(session.store().history().len(), 2);
    session.dispatch(Intent::Undo);
    assert_eq!(session.current_plan().unwrap().id, empty_id);
}

#[tokio::test]
async fn test_retry_with_nothing_to_retry() {
    let generator = StubGenerator::default();
    let mut session = create_test_session();

    assert!(!session.retry(&generator).await.unwrap());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_abandon_keeps_plan() {
    let mut session = session_with_plan().await;
    let _ = session
        .generate_plan("Set up customer onboarding", &StubGenerator::failing())
        .await;
    assert!(session.error().is_some());

    session.abandon();

    assert!(session.error().is_none());
    assert!(session.last_request().is_none());
    assert_eq!(session.stage(), Stage::Input);
    assert_eq!(
        session.current_plan().unwrap().goal,
        "Set up customer onboarding"
    );
    assert!(session.can_undo());
}

#[tokio::test]
async fn test_revise_step_merges_in_place() {
    let mut session = session_with_plan().await;
    let target = session.current_plan().unwrap().ordered_steps()[1].clone();

    let revised = session
        .revise_step(target.id, "make it shorter", &StubGenerator::default())
        .await
        .unwrap();

    assert!(revised);
    let step = session.current_plan().unwrap().step(&target.id).unwrap().clone();
    assert_eq!(step.title, "Extract totals (make it shorter)");
    assert_eq!(step.order, target.order);
    assert_eq!(step.ai_agent, AI_PROVENANCE_TAG);
}

#[tokio::test]
async fn test_revise_unknown_step_is_a_no_op() {
    let generator = StubGenerator::default();
    let mut session = session_with_plan().await;
    let snapshots = session.store().history().len();

    let revised = session
        .revise_step(StepId::new(), "anything", &generator)
        .await
        .unwrap();

    assert!(!revised);
    assert_eq!(generator.calls(), 0);
    assert_eq!(session.store().history().len(), snapshots);
}

#[tokio::test]
async fn test_revise_step_rejects_empty_instruction() {
    let mut session = session_with_plan().await;
    let id = session.current_plan().unwrap().steps[0].id;

    let err = session
        .revise_step(id, " ", &StubGenerator::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StepwiseError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_revise_failure_records_request() {
    let mut session = session_with_plan().await;
    let id = session.current_plan().unwrap().steps[0].id;
    let before = session.current_plan().unwrap().clone();

    let err = session
        .revise_step(id, "use a CRM tool", &StubGenerator::failing())
        .await
        .unwrap_err();

    assert!(err.is_generation_failure());
    assert_eq!(session.current_plan(), Some(&before));
    assert_eq!(
        session.last_request(),
        Some(&GenerationRequest::Revision {
            step_id: id,
            instruction: "use a CRM tool".to_string()
        })
    );
}

#[tokio::test]
async fn test_approve_moves_to_final() {
    let mut session = session_with_plan().await;
    session.set_stage(Stage::Review).unwrap();

    session.approve().unwrap();

    assert_eq!(session.stage(), Stage::Final);
    assert_eq!(session.current_plan().unwrap().status, PlanStatus::Approved);
}

#[tokio::test]
async fn test_cancel_returns_to_input() {
    let mut session = session_with_plan().await;

    session.cancel().unwrap();

    assert_eq!(session.stage(), Stage::Input);
    assert_eq!(
        session.current_plan().unwrap().status,
        PlanStatus::Cancelled
    );
}

#[test]
fn test_approve_without_plan() {
    let mut session = create_test_session();
    assert!(matches!(
        session.approve(),
        Err(StepwiseError::NoCurrentPlan)
    ));
    assert_eq!(session.stage(), Stage::Input);
}

#[tokio::test]
async fn test_dispatch_goes_through_store() {
    let mut session = session_with_plan().await;

    assert_eq!(
        session.dispatch(Intent::ReorderStep { from: 0, to: 1 }),
        Transition::Committed
    );
    assert_eq!(session.dispatch(Intent::Undo), Transition::Restored);
    assert!(session.can_redo());
}

#[test]
fn test_start_plan_without_generator() {
    let mut session = create_test_session();

    let transition = session
        .start_plan(&params::Goal {
            goal: "Improve team communication".to_string(),
        })
        .unwrap();

    assert_eq!(transition, Transition::Committed);
    assert_eq!(session.stage(), Stage::Planning);
    assert!(session.current_plan().unwrap().steps.is_empty());
}

#[test]
fn test_position_handlers_need_a_plan() {
    let mut session = create_test_session();

    assert!(matches!(
        session.add_step(params::AddStep::default()),
        Err(StepwiseError::NoCurrentPlan)
    ));
    assert!(matches!(
        session.delete_step_at(params::StepPosition { position: 1 }),
        Err(StepwiseError::NoCurrentPlan)
    ));
    assert!(!session.can_undo());
}

#[test]
fn test_position_handlers() {
    let mut session = create_test_session();
    session
        .start_plan(&params::Goal {
            goal: "Organize project files".to_string(),
        })
        .unwrap();
    for title in ["Inventory folders", "Define naming scheme", "Move files"] {
        session
            .add_step(params::AddStep {
                fields: params::StepFields {
                    title: Some(title.to_string()),
                    ..Default::default()
                },
            })
            .unwrap();
    }

    session
        .move_step(params::ReorderStep { from: 3, to: 1 })
        .unwrap();
    session
        .edit_step(params::UpdateStep {
            position: 2,
            fields: params::StepFields {
                tool_name: Some("Finder".to_string()),
                ..Default::default()
            },
        })
        .unwrap();
    session
        .delete_step_at(params::StepPosition { position: 3 })
        .unwrap();

    let plan = session.current_plan().unwrap();
    let titles: Vec<_> = plan.ordered_steps().iter().map(|s| s.title.clone()).collect();
    assert_eq!(titles, vec!["Move files", "Inventory folders"]);
    assert_eq!(plan.ordered_steps()[1].tool_name, "Finder");
    assert!(plan.has_contiguous_order());
}

#[test]
fn test_edit_step_rejects_empty_fields_and_bad_positions() {
    let mut session = create_test_session();
    session
        .start_plan(&params::Goal {
            goal: "Clean up my CRM".to_string(),
        })
        .unwrap();
    session.add_step(params::AddStep::default()).unwrap();

    assert!(session
        .edit_step(params::UpdateStep {
            position: 1,
            fields: params::StepFields::default(),
        })
        .is_err());
    assert!(session
        .delete_step_at(params::StepPosition { position: 2 })
        .is_err());
    assert_eq!(
        session
            .move_step(params::ReorderStep { from: 1, to: 5 })
            .unwrap(),
        Transition::Unchanged
    );
}

#[test]
fn test_arrange_steps_is_one_undoable_change() {
    let mut session = create_test_session();
    session
        .start_plan(&params::Goal {
            goal: "Improve team communication".to_string(),
        })
        .unwrap();
    for title in ["Pick a chat tool", "Schedule standups", "Write guidelines"] {
        session
            .add_step(params::AddStep {
                fields: params::StepFields {
                    title: Some(title.to_string()),
                    ..Default::default()
                },
            })
            .unwrap();
    }
    let history_len = session.store().history().len();

    let transition = session
        .arrange_steps(&params::ArrangeSteps {
            positions: vec![2, 3, 1],
        })
        .unwrap();

    assert_eq!(transition, Transition::Committed);
    assert_eq!(session.store().history().len(), history_len + 1);
    let plan = session.current_plan().unwrap();
    let titles: Vec<_> = plan.ordered_steps().iter().map(|s| s.title.clone()).collect();
    assert_eq!(titles, vec!["Schedule standups", "Write guidelines", "Pick a chat tool"]);
    assert!(plan.has_contiguous_order());

    assert!(session
        .arrange_steps(&params::ArrangeSteps {
            positions: vec![1, 1, 2],
        })
        .is_err());
    assert_eq!(session.store().history().len(), history_len + 1);

    session.dispatch(Intent::Undo);
    let plan = session.current_plan().unwrap();
    assert_eq!(plan.ordered_steps()[0].title, "Pick a chat tool");
}
