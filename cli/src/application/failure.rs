use larder_core::domain::{
    common::entities::app_errors::CoreError, extraction::value_objects::FailureClassification,
};
use serde::Serialize;
use serde_json::json;

/// Error report written to stderr when a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub classification: Option<FailureClassification>,
    pub message: String,
    #[serde(skip)]
    pub exit_code: u8,
}

/// Exit status per failure kind. 1 is reserved for errors outside the core.
pub fn exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::Configuration(_) => 2,
        CoreError::Transport(_) => 3,
        CoreError::Remote { .. } => 4,
        CoreError::MalformedReply { .. } => 5,
        CoreError::InvalidInput(_) => 64,
    }
}

impl Failure {
    pub fn to_json(&self) -> String {
        json!({ "error": self }).to_string()
    }
}

impl From<&anyhow::Error> for Failure {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CoreError>() {
            Some(core) => Failure {
                classification: core.classification(),
                message: core.to_string(),
                exit_code: exit_code(core),
            },
            None => Failure {
                classification: None,
                message: format!("{:#}", err),
                exit_code: 1,
            },
        }
    }
}
