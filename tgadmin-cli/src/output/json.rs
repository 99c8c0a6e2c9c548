//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tgadmin_core::{Record, Resource};
use tgadmin_store::Notice;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one list page.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub resource: Resource,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub items: Vec<Record>,
}

/// JSON output for a mutation.
#[derive(Debug, Serialize)]
pub struct ActionOutput {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ActionOutput {
    /// Builds the output from the notice a mutation raised.
    pub fn from_notice(notice: &Notice, result: Option<Value>) -> Self {
        Self {
            ok: !notice.is_failure(),
            message: notice.message.clone(),
            result,
        }
    }
}

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
