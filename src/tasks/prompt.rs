//! Turns a task request into the system/user instruction pair sent upstream.

use super::{DocumentRequest, FinanceRequest, LegalRequest, MarketingRequest, TaskRequest};
use crate::constants::*;
use crate::llm::ChatMessage;
use crate::utils::truncate_chars;

/// Instruction pair for one task invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Ordered role-tagged turns for the completion provider
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(&self.system), ChatMessage::user(&self.user)]
    }
}

/// Builds the prompt for `request`. Same request, same text.
pub fn build(request: &TaskRequest) -> Prompt {
    match request {
        TaskRequest::Marketing(r) => marketing(r),
        TaskRequest::Document(r) => document(r),
        TaskRequest::Legal(r) => legal(r),
        TaskRequest::Finance(r) => finance(r),
    }
}

const JSON_ONLY: &str = "IMPORTANT: reply ONLY with valid JSON (no markdown formatting):";

fn marketing(r: &MarketingRequest) -> Prompt {
    Prompt {
        system: MARKETING_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Generate 3 social media post variants based on the idea.\n\n\
             Idea: {}\n\
             Tone: {}\n\
             Target audience: {}\n\n\
             {}\n\
             {{\n  \"post_variants\": [\"variant1\", \"variant2\", \"variant3\"],\n  \"suggestions\": [\"suggestion1\", \"suggestion2\"]\n}}",
            r.idea, r.tone, r.audience, JSON_ONLY
        ),
    }
}

fn document(r: &DocumentRequest) -> Prompt {
    Prompt {
        system: DOCUMENT_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Generate a {} based on the following description.\n\n\
             Document type: {}\n\
             Content: {}\n\
             Style: {}\n\n\
             Also propose 2-3 corrections or improvements.\n\n\
             {}\n\
             {{\n  \"document\": \"full text of the document\",\n  \"corrections\": [\"correction1\", \"correction2\"],\n  \"suggestions\": [\"suggestion1\", \"suggestion2\"]\n}}",
            r.doc_type, r.doc_type, r.content, r.style, JSON_ONLY
        ),
    }
}

fn legal(r: &LegalRequest) -> Prompt {
    Prompt {
        system: LEGAL_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Analyze the following contract and provide:\n\
             1. A short summary (3-4 items)\n\
             2. Risky clauses (if risk analysis is requested)\n\
             3. Recommendations\n\
             4. Items to add to a to-do list\n\n\
             Risk analysis: {}\n\
             Contract text: {}\n\n\
             {}\n\
             {{\n  \"summary\": \"short summary\",\n  \"risks\": [\"risk1\", \"risk2\"],\n  \"recommendations\": [\"recommendation1\", \"recommendation2\"],\n  \"todo_items\": [\"task1\", \"task2\"]\n}}",
            if r.analyze_risks { "yes" } else { "no" },
            truncate_chars(&r.contract_text, CONTRACT_TEXT_LIMIT),
            JSON_ONLY
        ),
    }
}

fn finance(r: &FinanceRequest) -> Prompt {
    Prompt {
        system: FINANCE_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Analyze the financial data and provide a {}.\n\n\
             Data: {}\n\
             Analysis type: {}\n\n\
             {}\n\
             {{\n  \"analysis\": \"detailed analysis\",\n  \"insights\": [\"insight1\", \"insight2\"],\n  \"recommendations\": [\"recommendation1\", \"recommendation2\"],\n  \"forecast\": {{\"trend\": \"trend outlook\", \"growth\": \"expected growth\"}}\n}}",
            r.analysis_type, r.data, r.analysis_type, JSON_ONLY
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{sniff_topic, DemoTopic};
    use crate::tasks::AnalysisType;

    #[test]
    fn test_build_is_deterministic() {
        let request = TaskRequest::Marketing(MarketingRequest::new("Coffee subscription"));
        assert_eq!(build(&request), build(&request));
        assert!(build(&request).user.contains("Idea: Coffee subscription"));
        assert!(build(&request).user.contains("Tone: professional"));
    }

    #[test]
    fn test_contract_text_is_truncated() {
        let long = "x".repeat(CONTRACT_TEXT_LIMIT + 500);
        let prompt = build(&TaskRequest::Legal(LegalRequest::new(long)));
        assert!(prompt.user.contains(&"x".repeat(CONTRACT_TEXT_LIMIT)));
        assert!(!prompt.user.contains(&"x".repeat(CONTRACT_TEXT_LIMIT + 1)));
    }

    #[test]
    fn test_messages_order() {
        let prompt = build(&TaskRequest::Legal(LegalRequest::new("Payment due in 30 days")));
        let messages = prompt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_demo_topic_matches_task() {
        let cases = [
            (
                TaskRequest::Marketing(MarketingRequest::new("New bakery opening")),
                DemoTopic::Marketing,
            ),
            (
                TaskRequest::Document(DocumentRequest::new("Letter", "Partnership proposal")),
                DemoTopic::Document,
            ),
            (
                TaskRequest::Legal(LegalRequest::new(
                    "Payment due in 30 days; no penalty clause.",
                )),
                DemoTopic::Legal,
            ),
            (
                TaskRequest::Finance(FinanceRequest {
                    data: "Revenue 120k, costs 90k".to_string(),
                    analysis_type: AnalysisType::Forecast,
                }),
                DemoTopic::Finance,
            ),
        ];
        for (request, topic) in cases {
            assert_eq!(sniff_topic(&build(&request).user), topic, "{:?}", request);
        }
    }
}
