#![allow(dead_code)]

use alfapilot::core::ConversationController;
use alfapilot::errors::Error;
use alfapilot::history::{HistoryRecord, HistoryStore, NewHistoryRecord};
use alfapilot::llm::{ChatMessage, CompletionClient, LlmProvider, UpstreamError};
use alfapilot::config::DemoMode;
use alfapilot::tasks::TaskService;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Provider that replays queued replies and records every call
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, UpstreamError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, UpstreamError>>) -> Arc<Self> {
        Arc::new(ScriptedProvider {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    /// Every call waits for a permit on `gate` before answering
    pub fn gated(replies: Vec<Result<String, UpstreamError>>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(ScriptedProvider {
            replies: Mutex::new(replies.into()),
            gate: Some(gate),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Lets a shared `ScriptedProvider` be boxed into the client
#[derive(Debug)]
pub struct SharedProvider(pub Arc<ScriptedProvider>);

#[async_trait]
impl LlmProvider for SharedProvider {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String, UpstreamError> {
        self.0.calls.lock().unwrap().push(messages);
        if let Some(gate) = &self.0.gate {
            gate.notified().await;
        }
        self.0
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::Connection("no scripted reply left".into())))
    }
}

/// In-memory history store
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, Error> {
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(HistoryRecord {
            id,
            user_id: record.user_id,
            category: record.category,
            request_text: record.request_text,
            response_text: record.response_text,
            payload: record.payload,
            created_at: Utc::now().naive_utc(),
            message_id: record.message_id,
        });
        Ok(id)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryRecord>, Error> {
        Ok(self
            .records()
            .into_iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get(&self, record_id: i64, user_id: i64) -> Result<HistoryRecord, Error> {
        self.records()
            .into_iter()
            .find(|r| r.id == record_id && r.user_id == user_id)
            .ok_or_else(|| Error::NotFound(format!("history record {}", record_id)))
    }

    async fn delete(&self, record_id: i64, user_id: i64) -> Result<bool, Error> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.id == record_id && r.user_id == user_id));
        Ok(records.len() < before)
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, Error> {
        Ok(self.records().iter().filter(|r| r.user_id == user_id).count() as i64)
    }
}

pub struct Harness {
    pub controller: Arc<ConversationController>,
    pub provider: Arc<ScriptedProvider>,
    pub history: Arc<MemoryHistory>,
}

pub fn harness(provider: Arc<ScriptedProvider>) -> Harness {
    let client = CompletionClient::with_provider(
        Box::new(SharedProvider(provider.clone())),
        DemoMode::Off,
    );
    let history = Arc::new(MemoryHistory::default());
    let controller = Arc::new(ConversationController::new(
        TaskService::new(Arc::new(client)),
        history.clone(),
    ));
    Harness {
        controller,
        provider,
        history,
    }
}

pub fn ok(reply: &str) -> Result<String, UpstreamError> {
    Ok(reply.to_string())
}
