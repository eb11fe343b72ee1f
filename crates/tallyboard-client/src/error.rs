use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `tallyboard {cmd} --help` for usage."),
            None => "Run `tallyboard --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_config(variable: &str, value: &str, expected: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Environment variable `{variable}` has invalid value `{value}`."),
            vec![
                format!("Set `{variable}` to {expected}, or unset it to use the default."),
            ],
        )
        .with_data(json!({
            "variable": variable,
            "value": value,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_unavailable(detail: &str) -> Self {
        Self::new(
            "store_unavailable",
            &format!("Record store is unavailable: {detail}"),
            vec!["Retry the request once the record store has been rebuilt.".to_string()],
        )
    }

    pub fn store_corrupt(detail: &str) -> Self {
        Self::new(
            "store_corrupt",
            &format!("Record store snapshot is corrupt: {detail}"),
            vec![
                "Fix the offending records in the source data.".to_string(),
                "Rebuild the snapshot from the corrected source.".to_string(),
            ],
        )
    }

    pub fn source_unreadable(location: &str, detail: &str) -> Self {
        Self::new(
            "store_unavailable",
            &format!("Cannot read record source `{location}`: {detail}"),
            vec![format!("Check that `{location}` exists and is readable.")],
        )
        .with_data(json!({
            "source": location,
        }))
    }

    pub fn source_row_invalid(row: usize, field: &str, detail: &str) -> Self {
        Self::store_corrupt(&format!("row {row}, field `{field}`: {detail}")).with_data(json!({
            "row": row,
            "field": field,
        }))
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(self.code.as_str(), "store_unavailable" | "store_corrupt")
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
