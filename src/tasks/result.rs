use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TaskKind;
use crate::constants::HISTORY_SUMMARY_VARIANTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingResult {
    pub post_variants: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub document: String,
    pub corrections: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalResult {
    pub summary: String,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub todo_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub trend: String,
    pub growth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceResult {
    pub analysis: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub forecast: Forecast,
}

/// Fully populated structured output of one task invocation
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult {
    Marketing(MarketingResult),
    Document(DocumentResult),
    Legal(LegalResult),
    Finance(FinanceResult),
}

impl TaskResult {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskResult::Marketing(_) => TaskKind::Marketing,
            TaskResult::Document(_) => TaskKind::Document,
            TaskResult::Legal(_) => TaskKind::Legal,
            TaskResult::Finance(_) => TaskKind::Finance,
        }
    }

    /// Short text stored as the history response
    pub fn summary_text(&self) -> String {
        match self {
            TaskResult::Marketing(r) => r
                .post_variants
                .iter()
                .take(HISTORY_SUMMARY_VARIANTS)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n\n"),
            TaskResult::Document(r) => r.document.clone(),
            TaskResult::Legal(r) => r.summary.clone(),
            TaskResult::Finance(r) => r.analysis.clone(),
        }
    }

    /// Serializes the inner result as a plain JSON object
    pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            TaskResult::Marketing(r) => serde_json::to_value(r),
            TaskResult::Document(r) => serde_json::to_value(r),
            TaskResult::Legal(r) => serde_json::to_value(r),
            TaskResult::Finance(r) => serde_json::to_value(r),
        }
    }

    /// Reads a stored payload back for the given history category
    pub fn from_payload(kind: TaskKind, payload: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TaskKind::Marketing => TaskResult::Marketing(serde_json::from_value(payload)?),
            TaskKind::Document | TaskKind::Meeting => {
                TaskResult::Document(serde_json::from_value(payload)?)
            }
            TaskKind::Legal => TaskResult::Legal(serde_json::from_value(payload)?),
            TaskKind::Finance => TaskResult::Finance(serde_json::from_value(payload)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketing_summary_keeps_three_variants() {
        let result = TaskResult::Marketing(MarketingResult {
            post_variants: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            suggestions: vec![],
        });
        assert_eq!(result.summary_text(), "a\n\nb\n\nc");
    }

    #[test]
    fn test_meeting_payload_reads_as_document() {
        let result = TaskResult::Document(DocumentResult {
            document: "Minutes".into(),
            corrections: vec![],
            suggestions: vec!["Ship it".into()],
        });
        let payload = result.to_payload().unwrap();
        assert_eq!(
            TaskResult::from_payload(TaskKind::Meeting, payload).unwrap(),
            result
        );
    }
}
