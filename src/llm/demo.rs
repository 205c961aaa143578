//! Canned replies served while the completion client runs in degraded mode.
//!
//! The reply is chosen by substring matching on the last instruction turn.
//! This is deliberately low precision and is only consulted in degraded
//! mode; task dispatch never depends on it.

use crate::llm::ChatMessage;
use serde_json::json;

/// Topic guessed from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoTopic {
    Marketing,
    Document,
    Legal,
    Finance,
}

const MARKETING_KEYWORDS: &[&str] = &["маркетинг", "пост", "marketing", "post"];
const DOCUMENT_KEYWORDS: &[&str] = &["документ", "письмо", "document", "letter"];
const LEGAL_KEYWORDS: &[&str] = &["договор", "контракт", "legal", "contract"];

/// Guesses the topic of `text`. Checked in order marketing, document, legal;
/// anything else is treated as finance.
pub fn sniff_topic(text: &str) -> DemoTopic {
    let lowered = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if hit(MARKETING_KEYWORDS) {
        DemoTopic::Marketing
    } else if hit(DOCUMENT_KEYWORDS) {
        DemoTopic::Document
    } else if hit(LEGAL_KEYWORDS) {
        DemoTopic::Legal
    } else {
        DemoTopic::Finance
    }
}

/// Builds the canned JSON reply for the conversation's last turn.
pub fn demo_reply(messages: &[ChatMessage]) -> String {
    let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
    canned_reply(sniff_topic(last))
}

pub fn canned_reply(topic: DemoTopic) -> String {
    let value = match topic {
        DemoTopic::Marketing => json!({
            "post_variants": [
                "🚀 Meet the solution your business has been waiting for! Our AI assistant automates routine work so your team can focus on growth.",
                "💼 The business of the future starts today. Discover what artificial intelligence can do for small companies. #innovation #AI",
                "✨ Your personal business assistant: save time, grow revenue. Start using AI today!"
            ],
            "suggestions": ["Add a call to action", "Use topical hashtags"]
        }),
        DemoTopic::Document => json!({
            "document": "Dear partner,\n\nWe are reaching out with a proposal for cooperation. Our company builds innovative tools for automating business processes.\n\nKind regards,\nThe Alfapilot team",
            "corrections": ["Add concrete details about your company", "Include contact information"],
            "suggestions": ["Personalise the greeting", "Mention a successful case study"]
        }),
        DemoTopic::Legal => json!({
            "summary": "Service agreement between the Customer and the Contractor.",
            "risks": ["Exact delivery deadlines are not specified", "No penalty clauses"],
            "recommendations": ["Add concrete deadlines", "Include a section on penalties"]
        }),
        DemoTopic::Finance => json!({
            "analysis": "The provided figures show a positive trend in the key financial indicators.",
            "insights": ["The business is profitable", "Cash flow is positive"],
            "recommendations": ["Optimise operating expenses", "Diversify revenue sources"]
        }),
    };
    value.to_string()
}
