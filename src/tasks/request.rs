use serde::{Deserialize, Serialize};

use super::{AnalysisType, TaskKind};
use crate::constants::{DEFAULT_AUDIENCE, DEFAULT_DOCUMENT_STYLE, DEFAULT_TONE};
use crate::errors::Error;

/// Marketing post generation input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRequest {
    pub idea: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_audience", alias = "target_audience")]
    pub audience: String,
}

impl MarketingRequest {
    pub fn new(idea: impl Into<String>) -> Self {
        MarketingRequest {
            idea: idea.into(),
            tone: default_tone(),
            audience: default_audience(),
        }
    }
}

/// Document drafting input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub doc_type: String,
    pub content: String,
    #[serde(default = "default_style")]
    pub style: String,
}

impl DocumentRequest {
    pub fn new(doc_type: impl Into<String>, content: impl Into<String>) -> Self {
        DocumentRequest {
            doc_type: doc_type.into(),
            content: content.into(),
            style: default_style(),
        }
    }
}

/// Contract analysis input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalRequest {
    pub contract_text: String,
    #[serde(default = "default_analyze_risks")]
    pub analyze_risks: bool,
}

impl LegalRequest {
    pub fn new(contract_text: impl Into<String>) -> Self {
        LegalRequest {
            contract_text: contract_text.into(),
            analyze_risks: true,
        }
    }
}

/// Financial data analysis input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceRequest {
    pub data: String,
    #[serde(default)]
    pub analysis_type: AnalysisType,
}

/// Validated input for one task invocation
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Marketing(MarketingRequest),
    Document(DocumentRequest),
    Legal(LegalRequest),
    Finance(FinanceRequest),
}

impl TaskRequest {
    /// The task that serves this request. Meeting summaries come back as
    /// `Document`.
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskRequest::Marketing(_) => TaskKind::Marketing,
            TaskRequest::Document(_) => TaskKind::Document,
            TaskRequest::Legal(_) => TaskKind::Legal,
            TaskRequest::Finance(_) => TaskKind::Finance,
        }
    }

    /// The free-text input the user typed; recorded as the history request.
    pub fn primary_input(&self) -> &str {
        match self {
            TaskRequest::Marketing(r) => &r.idea,
            TaskRequest::Document(r) => &r.content,
            TaskRequest::Legal(r) => &r.contract_text,
            TaskRequest::Finance(r) => &r.data,
        }
    }

    /// Rejects requests whose free-text input is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if self.primary_input().trim().is_empty() {
            return Err(Error::InvalidUserInput(format!(
                "{} request needs a non-empty input",
                self.kind()
            )));
        }
        if let TaskRequest::Document(r) = self {
            if r.doc_type.trim().is_empty() {
                return Err(Error::InvalidUserInput("doc_type must not be empty".into()));
            }
        }
        Ok(())
    }
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_style() -> String {
    DEFAULT_DOCUMENT_STYLE.to_string()
}

fn default_analyze_risks() -> bool {
    true
}
