//! Display implementations for domain models.
//!
//! Kept apart from the model definitions. All output is markdown, rendered
//! by the terminal front end or returned as-is over MCP.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Confidence, Plan, PlanStatus, ReviewSummary, Step};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.goal)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
            return Ok(());
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in self.ordered_steps() {
            write!(f, "{step}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {}", u64::from(self.order) + 1, self.title)?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        writeln!(f, "- **Tool**: {}", self.tool_name)?;
        writeln!(f, "- **Confidence**: {}", self.confidence)?;
        writeln!(f, "- **Agent**: {}", self.ai_agent)?;
        writeln!(f)?;

        if !self.reasoning.is_empty() {
            writeln!(f, "#### Reasoning")?;
            writeln!(f)?;
            writeln!(f, "{}", self.reasoning)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Review: {}", self.goal)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status.with_icon())?;
        writeln!(f, "- **Steps**: {}", self.total_steps)?;
        writeln!(f, "- **Average confidence**: {}", self.average_confidence)?;
        writeln!(f, "- **Tools**: {}", join_or_none(&self.tools))?;
        writeln!(f, "- **Agents**: {}", join_or_none(&self.agents))?;
        Ok(())
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::models::{StepDraft, StepId};

    use super::*;

    fn plan_with_two_steps() -> Plan {
        let mut plan = Plan::new("Clean up my CRM", Timestamp::UNIX_EPOCH);
        let mut second = StepDraft::manual();
        second.title = "Dedupe contacts".to_string();
        let mut first = StepDraft::manual();
        first.title = "Audit records".to_string();
        first.tool_name = "Salesforce".to_string();
        plan.steps.push(Step::from_draft(StepId::new(), 1, second));
        plan.steps.push(Step::from_draft(StepId::new(), 0, first));
        plan
    }

    #[test]
    fn test_plan_display_lists_steps_in_order() {
        let output = plan_with_two_steps().to_string();

        assert!(output.starts_with("# Clean up my CRM\n"));
        assert!(output.contains("- Status: ✎ Draft"));
        let first = output.find("### 1. Audit records").unwrap();
        let second = output.find("### 2. Dedupe contacts").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_empty_plan_display() {
        let plan = Plan::new("Organize project files", Timestamp::UNIX_EPOCH);
        assert!(plan.to_string().contains("No steps in this plan."));
    }

    #[test]
    fn test_step_display() {
        let step = Step::from_draft(StepId::new(), 0, StepDraft::manual());
        let output = step.to_string();

        assert!(output.contains("### 1. New Step"));
        assert!(output.contains("- **Confidence**: 80%"));
        assert!(output.contains("- **Agent**: Manual Entry"));
        assert!(output.contains("#### Reasoning"));
    }

    #[test]
    fn test_review_summary_display() {
        let summary = ReviewSummary::of(&plan_with_two_steps());
        let output = summary.to_string();

        assert!(output.contains("- **Steps**: 2"));
        assert!(output.contains("- **Average confidence**: 80%"));
        assert!(output.contains("- **Tools**: Salesforce, Tool Name"));
        assert!(output.contains("- **Agents**: Manual Entry"));
    }
}
