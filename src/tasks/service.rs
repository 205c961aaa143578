use std::sync::Arc;
use tracing::{info, instrument};

use super::normalizer::*;
use super::*;
use crate::llm::{CompletionClient, UpstreamError};

/// Runs task invocations: prompt, completion, normalization.
///
/// Malformed model output never fails a call; only upstream errors that the
/// completion client did not absorb are returned.
#[derive(Debug, Clone)]
pub struct TaskService {
    client: Arc<CompletionClient>,
}

impl TaskService {
    pub fn new(client: Arc<CompletionClient>) -> Self {
        TaskService { client }
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Executes any task request.
    pub async fn execute(&self, request: &TaskRequest) -> Result<TaskResult, UpstreamError> {
        Ok(match request {
            TaskRequest::Marketing(r) => TaskResult::Marketing(self.generate_marketing_posts(r).await?),
            TaskRequest::Document(r) => TaskResult::Document(self.generate_document(r).await?),
            TaskRequest::Legal(r) => TaskResult::Legal(self.analyze_contract(r).await?),
            TaskRequest::Finance(r) => TaskResult::Finance(self.analyze_finance_data(r).await?),
        })
    }

    #[instrument(skip_all)]
    pub async fn generate_marketing_posts(
        &self,
        request: &MarketingRequest,
    ) -> Result<MarketingResult, UpstreamError> {
        let raw = self.complete(&TaskRequest::Marketing(request.clone())).await?;
        Ok(normalize_marketing(&raw, request))
    }

    #[instrument(skip_all, fields(doc_type = %request.doc_type))]
    pub async fn generate_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<DocumentResult, UpstreamError> {
        let raw = self.complete(&TaskRequest::Document(request.clone())).await?;
        Ok(normalize_document(&raw, request))
    }

    #[instrument(skip_all, fields(analyze_risks = request.analyze_risks))]
    pub async fn analyze_contract(
        &self,
        request: &LegalRequest,
    ) -> Result<LegalResult, UpstreamError> {
        let raw = self.complete(&TaskRequest::Legal(request.clone())).await?;
        Ok(normalize_legal(&raw, request))
    }

    #[instrument(skip_all, fields(analysis_type = %request.analysis_type))]
    pub async fn analyze_finance_data(
        &self,
        request: &FinanceRequest,
    ) -> Result<FinanceResult, UpstreamError> {
        let raw = self.complete(&TaskRequest::Finance(request.clone())).await?;
        Ok(normalize_finance(&raw, request))
    }

    async fn complete(&self, request: &TaskRequest) -> Result<String, UpstreamError> {
        let prompt = prompt::build(request);
        info!("Running {} task", request.kind());
        self.client.complete(prompt.messages()).await
    }
}
