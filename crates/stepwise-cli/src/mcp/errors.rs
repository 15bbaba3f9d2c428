//! Error handling utilities for MCP server

use rmcp::ErrorData;
use stepwise_core::StepwiseError;

/// Converts a stepwise error to an MCP error.
///
/// Caller mistakes become `invalid_params` so the client can correct the
/// call; everything else is an internal error.
pub fn to_mcp_error(message: &str, error: &StepwiseError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        StepwiseError::InvalidInput { .. } | StepwiseError::NoCurrentPlan => {
            ErrorData::invalid_params(text, None)
        }
        _ => ErrorData::internal_error(text, None),
    }
}
