//! Maps planner failures onto MCP error codes.

use planner_core::{ErrorKind, PlannerError};
use rmcp::ErrorData;

pub fn to_mcp_error(context: &str, error: &PlannerError) -> ErrorData {
    let message = format!("{context}: {error}");
    match error.kind() {
        ErrorKind::InvalidArgument => ErrorData::invalid_params(message, None),
        ErrorKind::NotFound => ErrorData::resource_not_found(message, None),
        ErrorKind::DeadlineExceeded | ErrorKind::Internal => {
            ErrorData::internal_error(message, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use planner_core::Kind;
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_error_codes_follow_kind() {
        let err = to_mcp_error(
            "Failed to get task",
            &PlannerError::not_found(Kind::Task, "t1"),
        );
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(err.message.contains("task not found: t1"));

        let err = to_mcp_error(
            "Failed to create area",
            &PlannerError::invalid_argument("name").with_reason("must not be empty"),
        );
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = to_mcp_error(
            "Failed to list areas",
            &PlannerError::Transport {
                message: "connection refused".to_string(),
            },
        );
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
