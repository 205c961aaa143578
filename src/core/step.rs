use serde::Serialize;
use std::fmt;

use crate::tasks::TaskKind;

/// Position of a conversation. Every step except `Idle` belongs to exactly
/// one task kind, so the active kind is always derived from the step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    // marketing
    AwaitingIdea,
    SelectingVariant,
    // document
    ChoosingDocType,
    AwaitingDocContent,
    ReviewingCorrections,
    // legal
    AwaitingContract,
    OfferingReminder,
    OfferingSync,
    // finance
    AwaitingFinanceData,
    ChoosingFollowUp,
    // meeting
    AwaitingMeetingText,
}

impl Step {
    pub fn kind(&self) -> Option<TaskKind> {
        match self {
            Step::Idle => None,
            Step::AwaitingIdea | Step::SelectingVariant => Some(TaskKind::Marketing),
            Step::ChoosingDocType | Step::AwaitingDocContent | Step::ReviewingCorrections => {
                Some(TaskKind::Document)
            }
            Step::AwaitingContract | Step::OfferingReminder | Step::OfferingSync => {
                Some(TaskKind::Legal)
            }
            Step::AwaitingFinanceData | Step::ChoosingFollowUp => Some(TaskKind::Finance),
            Step::AwaitingMeetingText => Some(TaskKind::Meeting),
        }
    }

    /// The field this step collects, for collection steps
    pub fn collects(&self) -> Option<Field> {
        match self {
            Step::AwaitingIdea => Some(Field::Idea),
            Step::ChoosingDocType => Some(Field::DocType),
            Step::AwaitingDocContent => Some(Field::Content),
            Step::AwaitingContract => Some(Field::ContractText),
            Step::AwaitingFinanceData => Some(Field::FinanceData),
            Step::AwaitingMeetingText => Some(Field::MeetingText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::AwaitingIdea => "marketing:waiting_for_idea",
            Step::SelectingVariant => "marketing:waiting_for_variant_selection",
            Step::ChoosingDocType => "document:choosing_type",
            Step::AwaitingDocContent => "document:waiting_for_content",
            Step::ReviewingCorrections => "document:waiting_for_corrections",
            Step::AwaitingContract => "legal:waiting_for_contract",
            Step::OfferingReminder => "legal:waiting_for_reminder",
            Step::OfferingSync => "legal:waiting_for_sync",
            Step::AwaitingFinanceData => "finance:waiting_for_data",
            Step::ChoosingFollowUp => "finance:waiting_for_comparison",
            Step::AwaitingMeetingText => "meeting:waiting_for_meeting_text",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys of the values collected from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Idea,
    DocType,
    Content,
    ContractText,
    FinanceData,
    AnalysisType,
    MeetingText,
}

impl Field {
    pub fn kind(&self) -> TaskKind {
        match self {
            Field::Idea => TaskKind::Marketing,
            Field::DocType | Field::Content => TaskKind::Document,
            Field::ContractText => TaskKind::Legal,
            Field::FinanceData | Field::AnalysisType => TaskKind::Finance,
            Field::MeetingText => TaskKind::Meeting,
        }
    }
}

/// Ordered collection steps of each kind
pub fn collection_chain(kind: TaskKind) -> &'static [(Step, Field)] {
    match kind {
        TaskKind::Marketing => &[(Step::AwaitingIdea, Field::Idea)],
        TaskKind::Document => &[
            (Step::ChoosingDocType, Field::DocType),
            (Step::AwaitingDocContent, Field::Content),
        ],
        TaskKind::Legal => &[(Step::AwaitingContract, Field::ContractText)],
        TaskKind::Finance => &[(Step::AwaitingFinanceData, Field::FinanceData)],
        TaskKind::Meeting => &[(Step::AwaitingMeetingText, Field::MeetingText)],
    }
}

/// The field recorded as the history request text, and the one a replay
/// pre-fills
pub fn primary_field(kind: TaskKind) -> Field {
    match kind {
        TaskKind::Marketing => Field::Idea,
        TaskKind::Document => Field::Content,
        TaskKind::Legal => Field::ContractText,
        TaskKind::Finance => Field::FinanceData,
        TaskKind::Meeting => Field::MeetingText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_steps_belong_to_kind() {
        for kind in TaskKind::ALL {
            for (step, field) in collection_chain(kind) {
                assert_eq!(step.kind(), Some(kind));
                assert_eq!(field.kind(), kind);
                assert_eq!(step.collects(), Some(*field));
            }
            assert_eq!(primary_field(kind).kind(), kind);
        }
    }
}
