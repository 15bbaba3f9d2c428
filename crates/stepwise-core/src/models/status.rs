//! Lifecycle status of a plan.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan is being drafted and edited
    #[default]
    Draft,

    /// Plan was explicitly approved by the user
    Approved,

    /// Plan was abandoned before approval
    Cancelled,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "approved" => Ok(PlanStatus::Approved),
            "cancelled" | "canceled" => Ok(PlanStatus::Cancelled),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Lowercase string form, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Approved => "approved",
            PlanStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the core defines a transition from `self` to `next`.
    ///
    /// Only `draft` can move, and only forward to `approved` or `cancelled`.
    pub fn can_transition_to(&self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Approved) | (PlanStatus::Draft, PlanStatus::Cancelled)
        )
    }

    /// Status with an icon, for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "✎ Draft",
            PlanStatus::Approved => "✓ Approved",
            PlanStatus::Cancelled => "✗ Cancelled",
        }
    }
}
