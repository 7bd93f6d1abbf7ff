//! Analysis outcome returned by the AI collaborator

use serde::{Deserialize, Serialize};

/// Result of one analysis call
///
/// A call either produces text (`success = true`) or an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub success: bool,
    pub analysis: Option<String>,
    pub error: Option<String>,
}

impl Analysis {
    pub fn succeeded(text: impl Into<String>) -> Self {
        Self {
            success: true,
            analysis: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            error: Some(error.into()),
        }
    }

    /// Usable analysis text, if the call succeeded with non-blank output
    pub fn text(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.analysis
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Reason to report when `text()` is `None`
    pub fn failure_reason(&self) -> String {
        match (&self.error, self.success) {
            (Some(error), _) => error.clone(),
            (None, true) => "analysis was empty".to_string(),
            (None, false) => "analysis failed without an error message".to_string(),
        }
    }
}
