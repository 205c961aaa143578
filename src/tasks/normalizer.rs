//! Turns free-text model replies into fully populated task results.
//!
//! Candidates are tried in order: the whole reply, each fenced code block,
//! then the first balanced `{...}` substring. The first candidate that parses
//! as an object carrying the task's required keys wins; optional keys it
//! lacks are filled from the deterministic fallback. When no candidate wins
//! the whole fallback is returned. Nothing here fails.

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::fallback::*;
use super::*;
use crate::llm::{build_validator, validate_response};
use jsonschema::Validator;

static MARKETING_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    required_schema(json!({
        "type": "object",
        "required": ["post_variants"],
        "properties": {"post_variants": {"type": "array", "minItems": 1}}
    }))
});

static DOCUMENT_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    required_schema(json!({
        "type": "object",
        "required": ["document"],
        "properties": {"document": {"type": "string", "minLength": 1}}
    }))
});

static LEGAL_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    required_schema(json!({
        "type": "object",
        "required": ["summary"],
        "properties": {"summary": {"type": "string", "minLength": 1}}
    }))
});

static FINANCE_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    required_schema(json!({
        "type": "object",
        "required": ["analysis"],
        "properties": {"analysis": {"type": "string", "minLength": 1}}
    }))
});

fn required_schema(schema: Value) -> Validator {
    build_validator(&schema).expect("built-in reply schema must compile")
}

/// Normalizes a raw reply for `request`.
pub fn normalize(raw: &str, request: &TaskRequest) -> TaskResult {
    match request {
        TaskRequest::Marketing(r) => TaskResult::Marketing(normalize_marketing(raw, r)),
        TaskRequest::Document(r) => TaskResult::Document(normalize_document(raw, r)),
        TaskRequest::Legal(r) => TaskResult::Legal(normalize_legal(raw, r)),
        TaskRequest::Finance(r) => TaskResult::Finance(normalize_finance(raw, r)),
    }
}

pub fn normalize_marketing(raw: &str, request: &MarketingRequest) -> MarketingResult {
    let fb = marketing_fallback(request);
    match extract_object(raw, &MARKETING_SCHEMA) {
        Some(obj) => MarketingResult {
            post_variants: list_field(&obj, "post_variants").unwrap_or(fb.post_variants),
            suggestions: list_field(&obj, "suggestions").unwrap_or(fb.suggestions),
        },
        None => fb,
    }
}

pub fn normalize_document(raw: &str, request: &DocumentRequest) -> DocumentResult {
    let fb = document_fallback(request);
    match extract_object(raw, &DOCUMENT_SCHEMA) {
        Some(obj) => DocumentResult {
            document: text_field(&obj, "document").unwrap_or(fb.document),
            corrections: list_field(&obj, "corrections").unwrap_or(fb.corrections),
            suggestions: list_field(&obj, "suggestions").unwrap_or(fb.suggestions),
        },
        None => fb,
    }
}

pub fn normalize_legal(raw: &str, request: &LegalRequest) -> LegalResult {
    let fb = legal_fallback(request);
    match extract_object(raw, &LEGAL_SCHEMA) {
        Some(obj) => LegalResult {
            summary: text_field(&obj, "summary").unwrap_or(fb.summary),
            risks: list_field(&obj, "risks").unwrap_or(fb.risks),
            recommendations: list_field(&obj, "recommendations").unwrap_or(fb.recommendations),
            todo_items: list_field(&obj, "todo_items").unwrap_or(fb.todo_items),
        },
        None => fb,
    }
}

pub fn normalize_finance(raw: &str, request: &FinanceRequest) -> FinanceResult {
    let fb = finance_fallback(request);
    match extract_object(raw, &FINANCE_SCHEMA) {
        Some(obj) => {
            let forecast = match obj.get("forecast").and_then(Value::as_object) {
                Some(f) => Forecast {
                    trend: text_field(f, "trend").unwrap_or(fb.forecast.trend),
                    growth: text_field(f, "growth").unwrap_or(fb.forecast.growth),
                },
                None => fb.forecast,
            };
            FinanceResult {
                analysis: text_field(&obj, "analysis").unwrap_or(fb.analysis),
                insights: list_field(&obj, "insights").unwrap_or(fb.insights),
                recommendations: list_field(&obj, "recommendations").unwrap_or(fb.recommendations),
                forecast,
            }
        }
        None => fb,
    }
}

/// Returns the first candidate object that satisfies `schema`.
fn extract_object(raw: &str, schema: &Validator) -> Option<Map<String, Value>> {
    for candidate in candidates(raw) {
        let Ok(value) = serde_json::from_str::<Value>(candidate) else {
            continue;
        };
        if validate_response(schema, &value) {
            if let Value::Object(obj) = value {
                return Some(obj);
            }
        }
        debug!("reply candidate parsed but lacks required keys");
    }
    warn!("no usable structured data in model reply, using fallback");
    None
}

fn candidates(raw: &str) -> Vec<&str> {
    let mut out = vec![raw.trim()];
    out.extend(fenced_blocks(raw));
    if let Some(obj) = first_balanced_object(raw) {
        out.push(obj);
    }
    out
}

/// Contents of every ``` fenced block, with an optional language tag
/// (e.g. `json`) stripped.
pub(crate) fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        let body = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        let Some(end) = body.find("```") else {
            break;
        };
        blocks.push(body[..end].trim());
        rest = &body[end + 3..];
    }
    blocks
}

/// First `{...}` substring whose braces balance, ignoring braces inside
/// JSON string literals.
pub(crate) fn first_balanced_object(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(&text[start..]) {
            return Some(&text[start..start + end]);
        }
        search_from = start + 1;
    }
    None
}

/// Byte length of the balanced object at the start of `text`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A list of strings; a lone string counts as a one-item list.
fn list_field(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match obj.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}
