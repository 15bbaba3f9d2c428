use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use jiff::Timestamp;
use stepwise_core::{
    models::{Confidence, Step, StepDraft},
    store::TickingClock,
    GenerationFailure, PlanGenerator, Session, SessionBuilder,
};

/// Generator that replays queued responses in order.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    plans: Mutex<VecDeque<Result<Vec<StepDraft>, GenerationFailure>>>,
    revisions: Mutex<VecDeque<Result<StepDraft, GenerationFailure>>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_plan(self, drafts: Vec<StepDraft>) -> Self {
        self.plans.lock().unwrap().push_back(Ok(drafts));
        self
    }

    pub fn then_plan_failure(self, failure: GenerationFailure) -> Self {
        self.plans.lock().unwrap().push_back(Err(failure));
        self
    }

    pub fn then_revision(self, draft: StepDraft) -> Self {
        self.revisions.lock().unwrap().push_back(Ok(draft));
        self
    }

    pub fn then_revision_failure(self, failure: GenerationFailure) -> Self {
        self.revisions.lock().unwrap().push_back(Err(failure));
        self
    }

    /// Goals and instructions received so far.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlanGenerator for ScriptedGenerator {
    async fn generate(&self, goal: &str) -> Result<Vec<StepDraft>, GenerationFailure> {
        self.seen.lock().unwrap().push(goal.to_string());
        self.plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(exhausted)
    }

    async fn revise(
        &self,
        _step: &Step,
        instruction: &str,
    ) -> Result<StepDraft, GenerationFailure> {
        self.seen.lock().unwrap().push(instruction.to_string());
        self.revisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(exhausted)
    }
}

fn exhausted<T>() -> Result<T, GenerationFailure> {
    Err(GenerationFailure::MalformedOutput("script exhausted".to_string()))
}

/// A step as the service returns it: no id, order or agent.
pub fn bare_step(title: &str, tool: &str, confidence: f64) -> StepDraft {
    StepDraft {
        title: title.to_string(),
        description: format!("{title} in detail"),
        tool_name: tool.to_string(),
        reasoning: format!("{title} is required"),
        confidence: Confidence::new(confidence),
        ai_agent: String::new(),
    }
}

/// Session with a clock that advances one second per read.
pub fn create_test_session() -> Session {
    SessionBuilder::new()
        .with_clock(Arc::new(TickingClock::new(
            Timestamp::from_second(1_700_000_000).unwrap(),
        )))
        .build()
}
