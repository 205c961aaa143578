use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Category of AI-assisted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Marketing,
    Document,
    Legal,
    Finance,
    /// Meeting summaries; served by the document task
    Meeting,
}

impl TaskKind {
    pub const ALL: [TaskKind; 5] = [
        TaskKind::Marketing,
        TaskKind::Finance,
        TaskKind::Document,
        TaskKind::Legal,
        TaskKind::Meeting,
    ];

    /// Stable name stored as the history category
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Marketing => "marketing",
            TaskKind::Document => "documents",
            TaskKind::Legal => "legal",
            TaskKind::Finance => "finance",
            TaskKind::Meeting => "meetings",
        }
    }

    /// Button text shown in the categories menu
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Marketing => "💬 Marketing & content",
            TaskKind::Document => "📑 Documents & letters",
            TaskKind::Legal => "⚖️ Legal help",
            TaskKind::Finance => "📊 Finance & analytics",
            TaskKind::Meeting => "📝 Meeting summaries",
        }
    }

    /// Human title without the emoji
    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::Marketing => "Marketing & content",
            TaskKind::Document => "Documents & letters",
            TaskKind::Legal => "Legal help",
            TaskKind::Finance => "Finance & analytics",
            TaskKind::Meeting => "Meeting summaries",
        }
    }

    /// Matches a category-select input: the button label, its title, or the
    /// stored name, case-insensitively.
    pub fn from_selection(input: &str) -> Option<TaskKind> {
        let input = input.trim();
        TaskKind::ALL.into_iter().find(|kind| {
            input == kind.label()
                || input.eq_ignore_ascii_case(kind.title())
                || input.eq_ignore_ascii_case(kind.as_str())
        })
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::from_selection(s)
            .ok_or_else(|| Error::InvalidUserInput(format!("unknown category '{}'", s)))
    }
}

/// Flavour of finance analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Summary,
    Comparison,
    Forecast,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Summary => "summary",
            AnalysisType::Comparison => "comparison",
            AnalysisType::Forecast => "forecast",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(AnalysisType::Summary),
            "comparison" => Ok(AnalysisType::Comparison),
            "forecast" => Ok(AnalysisType::Forecast),
            other => Err(Error::InvalidUserInput(format!(
                "unknown analysis type '{}'",
                other
            ))),
        }
    }
}
