//! Text shown to the user for results, prompts and history.

use std::fmt::Write;

use crate::constants::{FULL_RESPONSE_CHARS, HISTORY_SUMMARY_VARIANTS};
use crate::history::HistoryRecord;
use crate::tasks::{AnalysisType, DocumentResult, FinanceResult, LegalResult, MarketingResult};
use crate::utils::truncate_chars;

use super::step::Step;

fn bullets(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    for item in items {
        let _ = writeln!(out, "• {}", item);
    }
}

/// Number of variants the user can pick from
pub fn selectable_variants(result: &MarketingResult) -> usize {
    result.post_variants.len().min(HISTORY_SUMMARY_VARIANTS)
}

pub fn marketing(result: &MarketingResult) -> String {
    let mut out = String::from("✅ Here are post variants for your idea:\n");
    for (index, variant) in result
        .post_variants
        .iter()
        .take(HISTORY_SUMMARY_VARIANTS)
        .enumerate()
    {
        let _ = write!(out, "\nVariant {}:\n{}\n", index + 1, variant);
    }
    bullets(&mut out, "💡 Suggestions:", &result.suggestions);

    let choices = (1..=selectable_variants(result))
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        out,
        "\nChoose the variant you like ({}) or start a new scenario:",
        choices
    );
    out
}

pub fn chosen_variant(index: usize, variant: &str) -> String {
    format!(
        "✅ You chose variant {}:\n\n{}\n\nThe post is ready to publish!",
        index, variant
    )
}

pub fn document(doc_type: &str, result: &DocumentResult) -> String {
    let mut out = format!("✅ {} created!\n\n{}\n", doc_type, result.document);
    if !result.corrections.is_empty() {
        bullets(&mut out, "⚠️ Suggested corrections:", &result.corrections);
        out.push_str("\nApply the corrections?");
    } else {
        bullets(&mut out, "💡 Improvement ideas:", &result.suggestions);
    }
    out
}

pub fn meeting(result: &DocumentResult) -> String {
    let mut out = format!("📋 Meeting summary:\n\n{}\n", result.document);
    bullets(&mut out, "🎯 Key points:", &result.suggestions);
    out.push_str("\nThe summary is ready! You can save it or send it to participants.");
    out
}

pub fn legal(result: &LegalResult) -> String {
    let mut out = format!("📑 Contract analysis:\n\nSummary:\n{}\n", result.summary);
    bullets(&mut out, "⚠️ Risky clauses:", &result.risks);
    bullets(&mut out, "🎯 Recommendations:", &result.recommendations);
    bullets(&mut out, "📋 To-do items:", &result.todo_items);
    out.push_str("\nWould you like to add a deadline reminder?");
    out
}

pub fn finance(analysis_type: AnalysisType, result: &FinanceResult) -> String {
    match analysis_type {
        AnalysisType::Summary => {
            let mut out = format!("📈 Financial analysis:\n\n{}\n", result.analysis);
            bullets(&mut out, "💡 Key insights:", &result.insights);
            bullets(&mut out, "🎯 Recommendations:", &result.recommendations);
            out.push_str(
                "\nWould you like a comparison with the previous period or a forecast?",
            );
            out
        }
        AnalysisType::Comparison => {
            let mut out = format!("📊 Comparative analysis:\n\n{}\n", result.analysis);
            bullets(&mut out, "💡 Key insights:", &result.insights);
            out
        }
        AnalysisType::Forecast => format!(
            "🔮 Forecast and trends:\n\n{}\n\n📈 Trend: {}\n📊 Expected growth: {}",
            result.analysis, result.forecast.trend, result.forecast.growth
        ),
    }
}

/// Prompt shown when the conversation arrives at a collection step
pub fn step_prompt(step: Step, doc_type: Option<&str>) -> String {
    match step {
        Step::AwaitingIdea => {
            "🎯 Marketing & content\n\nWrite your idea or topic for a social media post:".into()
        }
        Step::ChoosingDocType => "📑 Documents & letters\n\nChoose a document type:".into(),
        Step::AwaitingDocContent => format!(
            "📝 Creating: {}\n\nDescribe what the document should contain (main points, key details):",
            doc_type.unwrap_or("document")
        ),
        Step::AwaitingContract => "⚖️ Legal help\n\nSend the contract text for analysis:".into(),
        Step::AwaitingFinanceData => {
            "📊 Finance & analytics\n\nSend financial data for analysis (figures, tables or a text description):"
                .into()
        }
        Step::AwaitingMeetingText => {
            "📝 Meeting summaries\n\nSend the meeting or negotiation transcript to summarize:".into()
        }
        other => format!("Continue with {}", other),
    }
}

pub fn history_page(records: &[HistoryRecord], page: i64, pages: i64) -> String {
    if records.is_empty() {
        return "📚 Your history is empty.\n\nMake your first request in any category!".into();
    }
    let mut out = format!("📚 Your request history (page {}/{}):\n", page, pages.max(1));
    for record in records {
        let title = record.kind().map(|k| k.title()).unwrap_or("Unknown");
        let _ = write!(
            out,
            "\n#{} · {} · {}\n  {}\n",
            record.id,
            title,
            record.created_at.format("%d.%m %H:%M"),
            record.request_preview()
        );
        let response = record.response_preview();
        if !response.is_empty() {
            let _ = writeln!(out, "  → {}", response);
        }
    }
    out.push_str("\nUse /show <id>, /repeat <id> or /delete <id>.");
    if page < pages {
        let _ = write!(out, " Next page: /history {}", page + 1);
    }
    out
}

pub fn history_detail(record: &HistoryRecord) -> String {
    let title = record.kind().map(|k| k.title()).unwrap_or("Unknown");
    let mut out = format!(
        "📋 Request details #{}\n\nCategory: {}\nTime: {}\n\nRequest:\n{}\n",
        record.id,
        title,
        record.created_at.format("%d.%m.%Y %H:%M"),
        record.request_text
    );
    if let Some(response) = &record.response_text {
        let shown = truncate_chars(response, FULL_RESPONSE_CHARS);
        let _ = write!(out, "\nResponse:\n{}", shown);
        if shown.len() < response.len() {
            out.push_str("\n\n... (response shortened)");
        }
    }
    out
}
