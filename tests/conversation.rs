mod common;

use alfapilot::constants::GENERIC_FAILURE_MESSAGE;
use alfapilot::core::{Field, Incoming, Menu, Step, MAIN_MENU_BUTTON, YES_BUTTON};
use alfapilot::errors::Error;
use alfapilot::llm::UpstreamError;
use alfapilot::tasks::TaskKind;
use common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

const USER: i64 = 1001;

const LEGAL_REPLY: &str = r#"Here is the review:
```json
{"summary": "Supply agreement", "risks": ["No penalty clause"], "recommendations": ["Add penalties"], "todo_items": ["Call the supplier"]}
```"#;

const FINANCE_REPLY: &str =
    r#"{"analysis": "Revenue grew 10%", "insights": ["Costs are flat"], "recommendations": ["Invest"]}"#;

const FORECAST_REPLY: &str = r#"{"analysis": "Growth continues", "forecast": {"trend": "upward", "growth": "15% per year"}}"#;

async fn say(h: &Harness, text: &str) -> Vec<alfapilot::core::Reply> {
    h.controller.handle(Incoming::new(USER, text)).await
}

#[tokio::test]
async fn test_main_menu_resets_any_step() {
    let h = harness(ScriptedProvider::new(vec![]));

    say(&h, TaskKind::Legal.label()).await;
    assert_eq!(h.controller.session(USER).await.step(), Step::AwaitingContract);

    let replies = say(&h, MAIN_MENU_BUTTON).await;
    assert_eq!(replies[0].menu, Menu::Main);
    let session = h.controller.session(USER).await;
    assert_eq!(session.step(), Step::Idle);
    assert!(session.fields().is_empty());
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_document_collects_type_before_content() {
    let h = harness(ScriptedProvider::new(vec![ok(
        r#"{"document": "Dear partner, ...", "corrections": [], "suggestions": ["Add dates"]}"#,
    )]));

    let replies = say(&h, TaskKind::Document.label()).await;
    assert_eq!(replies[0].menu, Menu::DocumentTypes);

    let replies = say(&h, "📝 Letter").await;
    assert!(replies[0].text.contains("Letter"));
    let session = h.controller.session(USER).await;
    assert_eq!(session.step(), Step::AwaitingDocContent);
    assert_eq!(session.field(Field::DocType), Some("Letter"));

    let replies = say(&h, "Partnership proposal").await;
    assert!(replies[0].text.starts_with("✅ Letter created!"));
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);

    let calls = h.provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0][1].content.contains("Letter"));
    assert!(calls[0][1].content.contains("Partnership proposal"));

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "documents");
    assert_eq!(records[0].request_text, "Partnership proposal");
}

#[tokio::test]
async fn test_legal_analysis_records_once_and_offers_reminder() {
    let h = harness(ScriptedProvider::new(vec![ok(LEGAL_REPLY)]));

    say(&h, TaskKind::Legal.label()).await;
    let replies = say(&h, "The supplier delivers goods within 30 days.").await;
    assert!(replies[0].text.contains("No penalty clause"));
    assert_eq!(replies[0].menu, Menu::YesNo);
    assert_eq!(h.controller.session(USER).await.step(), Step::OfferingReminder);

    let replies = say(&h, YES_BUTTON).await;
    assert!(replies[0].text.contains("Call the supplier"));
    assert_eq!(h.controller.session(USER).await.step(), Step::OfferingSync);

    say(&h, "no").await;
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);

    let records = h.history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, "legal");
    let risks = records[0].payload.as_ref().unwrap()["risks"].as_array().unwrap();
    assert!(!risks.is_empty());
}

#[tokio::test]
async fn test_finance_forecast_follow_up() {
    let h = harness(ScriptedProvider::new(vec![ok(FINANCE_REPLY), ok(FORECAST_REPLY)]));

    say(&h, TaskKind::Finance.label()).await;
    let replies = say(&h, "Q1 revenue 100, Q2 revenue 110").await;
    assert!(replies[0].text.contains("Revenue grew 10%"));
    assert_eq!(h.controller.session(USER).await.step(), Step::ChoosingFollowUp);

    let replies = say(&h, "banana").await;
    assert_eq!(replies[0].menu, Menu::FinanceFollowUp);
    assert_eq!(h.controller.session(USER).await.step(), Step::ChoosingFollowUp);
    assert_eq!(h.provider.call_count(), 1);

    let replies = say(&h, "forecast").await;
    assert!(replies[0].text.contains("Trend: upward"));
    assert!(replies[0].text.contains("15% per year"));
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);

    let calls = h.provider.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1][1].content.contains("Analysis type: forecast"));
    assert!(calls[1][1].content.contains("Q1 revenue 100"));
    assert_eq!(h.history.records().len(), 2);
}

#[tokio::test]
async fn test_marketing_variant_selection() {
    let h = harness(ScriptedProvider::new(vec![ok(
        r#"{"post_variants": ["Morning coffee", "Fresh beans", "Latte art"], "suggestions": []}"#,
    )]));

    say(&h, TaskKind::Marketing.label()).await;
    let replies = say(&h, "Launch of a new coffee shop").await;
    assert_eq!(replies[0].menu, Menu::Variants(3));
    assert_eq!(replies[0].menu.rows()[0], vec!["1", "2", "3"]);

    let replies = say(&h, "7").await;
    assert!(replies[0].text.contains("1 to 3"));
    assert_eq!(h.controller.session(USER).await.step(), Step::SelectingVariant);

    let replies = say(&h, "2").await;
    assert!(replies[0].text.contains("Fresh beans"));
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);
}

#[tokio::test]
async fn test_malformed_output_falls_back() {
    let h = harness(ScriptedProvider::new(vec![ok("Sorry, I cannot produce JSON today.")]));

    say(&h, TaskKind::Marketing.label()).await;
    let replies = say(&h, "Summer sale").await;
    assert!(replies[0].text.contains("Summer sale"));
    assert_eq!(h.controller.session(USER).await.step(), Step::SelectingVariant);
    assert_eq!(h.history.records().len(), 1);
}

#[tokio::test]
async fn test_upstream_failure_resets_without_record() {
    let h = harness(ScriptedProvider::new(vec![Err(UpstreamError::RateLimited(
        "too many requests".into(),
    ))]));

    say(&h, TaskKind::Legal.label()).await;
    let replies = say(&h, "Contract text").await;
    assert_eq!(replies[0].text, GENERIC_FAILURE_MESSAGE);
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);
    assert!(h.history.records().is_empty());
}

#[tokio::test]
async fn test_empty_collection_input_asks_again() {
    let h = harness(ScriptedProvider::new(vec![]));

    say(&h, TaskKind::Meeting.label()).await;
    let replies = say(&h, "   ").await;
    assert!(replies[0].text.starts_with("Please send some text."));
    assert_eq!(
        h.controller.session(USER).await.step(),
        Step::AwaitingMeetingText
    );
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_replay_document_asks_for_type_first() {
    let h = harness(ScriptedProvider::new(vec![]));

    let replies = h
        .controller
        .replay(USER, TaskKind::Document, "Partnership proposal", None)
        .await;
    assert_eq!(replies[0].menu, Menu::DocumentTypes);

    let session = h.controller.session(USER).await;
    assert_eq!(session.step(), Step::ChoosingDocType);
    assert_eq!(session.field(Field::Content), Some("Partnership proposal"));
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_repeat_from_history() {
    let h = harness(ScriptedProvider::new(vec![ok(LEGAL_REPLY), ok(LEGAL_REPLY)]));

    say(&h, TaskKind::Legal.label()).await;
    say(&h, "Lease agreement for an office").await;
    let id = h.history.records()[0].id;

    let replies = h.controller.repeat_from_history(USER, id, None).await.unwrap();
    assert!(replies[0].text.contains("Lease agreement"));
    assert_eq!(h.history.records().len(), 2);
    assert_eq!(h.history.records()[1].request_text, "Lease agreement for an office");

    let err = h.controller.repeat_from_history(USER + 1, id, None).await;
    assert!(matches!(err, Err(Error::NotFound(_))));

    let replies = h
        .controller
        .handle(Incoming::new(USER + 1, format!("/repeat {}", id)))
        .await;
    assert_eq!(replies[0].text, "❌ Record not found.");
}

#[tokio::test]
async fn test_reset_discards_in_flight_result() {
    let gate = Arc::new(Notify::new());
    let h = harness(ScriptedProvider::gated(vec![ok(LEGAL_REPLY)], gate.clone()));

    say(&h, TaskKind::Legal.label()).await;
    let controller = h.controller.clone();
    let pending = tokio::spawn(async move {
        controller
            .handle(Incoming::new(USER, "Slow contract"))
            .await
    });

    while !h.controller.session(USER).await.is_busy() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let replies = say(&h, "anything else").await;
    assert!(replies[0].text.starts_with("⏳"));

    say(&h, MAIN_MENU_BUTTON).await;
    gate.notify_one();

    let replies = pending.await.unwrap();
    assert!(replies.is_empty());
    assert_eq!(h.controller.session(USER).await.step(), Step::Idle);
    assert!(h.history.records().is_empty());
}

#[tokio::test]
async fn test_cancelled_request_releases_session() {
    let gate = Arc::new(Notify::new());
    let h = harness(ScriptedProvider::gated(vec![ok(LEGAL_REPLY)], gate.clone()));

    say(&h, TaskKind::Legal.label()).await;
    let controller = h.controller.clone();
    let pending = tokio::spawn(async move {
        controller
            .handle(Incoming::new(USER, "Abandoned contract"))
            .await
    });

    while !h.controller.session(USER).await.is_busy() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());
    assert!(!h.controller.session(USER).await.is_busy());

    gate.notify_one();
    let replies = say(&h, "The supplier delivers goods within 30 days.").await;
    assert!(!replies[0].text.starts_with("⏳"));
    assert!(replies[0].text.contains("No penalty clause"));
    assert_eq!(h.controller.session(USER).await.step(), Step::OfferingReminder);
    assert_eq!(h.history.records().len(), 1);
}

#[tokio::test]
async fn test_history_commands() {
    let h = harness(ScriptedProvider::new(vec![ok(FINANCE_REPLY)]));

    let replies = say(&h, "/history").await;
    assert!(replies[0].text.contains("history is empty"));

    say(&h, TaskKind::Finance.label()).await;
    say(&h, "Revenue 100").await;
    let id = h.history.records()[0].id;

    let replies = say(&h, "/history").await;
    assert!(replies[0].text.contains(&format!("#{}", id)));

    let replies = say(&h, &format!("/show {}", id)).await;
    assert!(replies[0].text.contains("Revenue grew 10%"));

    let replies = say(&h, &format!("/delete {}", id)).await;
    assert!(replies[0].text.contains("deleted"));
    assert!(h.history.records().is_empty());
}
