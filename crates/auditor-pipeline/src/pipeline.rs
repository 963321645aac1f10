//! Core Pipeline implementation

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::{parse_table, ParsedTable, TableMode};
use crate::prompt::{render, TemplateId};
use crate::splitter::split_for;
use crate::store::ResultStore;
use crate::types::{AskAnswer, AskRequest, OperationOutcome, OperationRequest};
use auditor_domain::traits::{DocumentExtractor, LlmProvider};
use auditor_domain::{AuditResult, OperationKind};
use auditor_ingest::{file_stem, read_batch, DocumentBatch, IngestError};
use auditor_llm::LlmError;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Where the pipeline is in the current operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for a user action
    Idle,
    /// Extracting text from the uploads
    Reading,
    /// Rendering the prompt
    Prompting,
    /// Waiting for the model
    AwaitingCompletion,
    /// Splitting and parsing the answer
    Parsing,
    /// Last operation succeeded
    Done,
    /// Last operation failed
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Reading => "reading",
            PipelineState::Prompting => "prompting",
            PipelineState::AwaitingCompletion => "awaiting completion",
            PipelineState::Parsing => "parsing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One session: reads uploads, prompts the model and keeps the results
///
/// The pipeline owns the [`ResultStore`]; callers read it through
/// [`Pipeline::store`] and never mutate it directly.
pub struct Pipeline<L, D>
where
    L: LlmProvider,
    D: DocumentExtractor,
{
    llm_provider: Arc<L>,
    extractor: D,
    store: ResultStore,
    config: PipelineConfig,
    state: PipelineState,
}

/// Text read for one operation
struct Inputs {
    sp_content: String,
    support: DocumentBatch,
}

impl<L, D> Pipeline<L, D>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    /// Create a new Pipeline
    pub fn new(llm_provider: L, extractor: D, config: PipelineConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            extractor,
            store: ResultStore::new(),
            config,
            state: PipelineState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Read-only view of the session results
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Model answering the prompts
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Clear every result and return to idle
    pub fn reset(&mut self) {
        self.store.reset();
        self.transition(PipelineState::Idle);
    }

    /// Run one operation to completion
    ///
    /// Precondition failures (credential, uploads) leave the store untouched.
    /// Once started, the store is cleared; on success the new result is
    /// installed, on failure the slot for `request.kind` stays empty.
    pub async fn run(&mut self, request: OperationRequest) -> Result<OperationOutcome, PipelineError> {
        self.start_action();
        self.check_preconditions(&request)?;

        let kind = request.kind;
        info!("Starting {} with model '{}'", kind, self.model_name());
        self.store.begin(kind);

        match self.execute(&request).await {
            Ok((result, outcome)) => {
                self.store.complete(kind, result);
                self.transition(PipelineState::Done);
                info!(
                    "{} complete: {} records, {} skipped lines in {}ms",
                    kind, outcome.record_count, outcome.skipped_lines, outcome.elapsed_ms
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!("{} failed: {}", kind, e);
                self.store.fail(kind);
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    /// Answer a free-form question about some documents; the store is not touched
    pub async fn ask(&mut self, request: AskRequest) -> Result<AskAnswer, PipelineError> {
        self.start_action();
        self.llm_provider
            .check_ready()
            .map_err(|e| PipelineError::Precondition(e.to_string()))?;
        if request.documents.is_empty() {
            return Err(PipelineError::Precondition("no documents to ask about".to_string()));
        }
        if request.question.trim().is_empty() {
            return Err(PipelineError::Precondition("the question is empty".to_string()));
        }

        let result = self.answer(&request).await;
        self.transition(match &result {
            Ok(_) => PipelineState::Done,
            Err(_) => PipelineState::Failed,
        });
        result
    }

    async fn answer(&mut self, request: &AskRequest) -> Result<AskAnswer, PipelineError> {
        self.transition(PipelineState::Reading);
        let context = read_batch(&self.extractor, &request.documents)?;
        if context.is_blank() {
            return Err(PipelineError::Precondition("extracted content is empty".to_string()));
        }
        let sent_chars = context.content.chars().count();
        self.check_length(sent_chars)?;

        self.transition(PipelineState::Prompting);
        let variables = HashMap::from([
            ("context_content", context.content.as_str()),
            ("question", request.question.trim()),
        ]);
        let prompt = render(TemplateId::Ask, &variables)?;

        self.transition(PipelineState::AwaitingCompletion);
        let text = self.call_llm_with_timeout(prompt).await?;

        Ok(AskAnswer {
            text: text.trim().to_string(),
            sent_chars,
            source_names: context.names,
        })
    }

    fn start_action(&mut self) {
        if matches!(self.state, PipelineState::Done | PipelineState::Failed) {
            self.transition(PipelineState::Idle);
        }
    }

    fn check_preconditions(&self, request: &OperationRequest) -> Result<(), PipelineError> {
        self.llm_provider
            .check_ready()
            .map_err(|e| PipelineError::Precondition(e.to_string()))?;

        let missing = request.missing_uploads();
        if !missing.is_empty() {
            return Err(PipelineError::Precondition(format!(
                "{} requires {}",
                request.kind,
                missing.join(" and ")
            )));
        }
        Ok(())
    }

    async fn execute(
        &mut self,
        request: &OperationRequest,
    ) -> Result<(AuditResult, OperationOutcome), PipelineError> {
        let start = Instant::now();

        self.transition(PipelineState::Reading);
        let inputs = self.read_inputs(request)?;
        let sent_chars = inputs.sp_content.chars().count() + inputs.support.content.chars().count();
        self.check_length(sent_chars)?;

        self.transition(PipelineState::Prompting);
        let prompt = build_prompt(request.kind, &inputs)?;
        info!("Sending {} chars to '{}'", sent_chars, self.model_name());
        debug!("Prompt length: {} chars", prompt.chars().count());

        self.transition(PipelineState::AwaitingCompletion);
        let raw = self.call_llm_with_timeout(prompt).await?;
        debug!("LLM response length: {} chars", raw.chars().count());

        self.transition(PipelineState::Parsing);
        let split = split_for(request.kind, &raw);
        let table = match TableMode::for_kind(request.kind) {
            Some(mode) if split.has_structure() => parse_table(&split.structured_section, mode),
            _ => ParsedTable::default(),
        };

        let outcome = OperationOutcome {
            kind: request.kind,
            model_name: self.model_name().to_string(),
            sent_chars,
            source_names: inputs.support.names,
            record_count: table.records.len(),
            skipped_lines: table.skipped_lines,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        let result = AuditResult::new(table.records, split.report_text, table.skipped_lines);
        Ok((result, outcome))
    }

    fn read_inputs(&self, request: &OperationRequest) -> Result<Inputs, PipelineError> {
        let sp_path = request
            .sp
            .as_deref()
            .ok_or_else(|| PipelineError::Precondition("missing SP document".to_string()))?;
        let sp_content = self.extractor.extract(sp_path)?;

        let support = match request.kind {
            OperationKind::Audit => read_batch(&self.extractor, &request.lists)?,
            OperationKind::DrawingCheck => read_batch(&self.extractor, &request.drawings)?,
            OperationKind::Extraction => DocumentBatch::default(),
        };

        let support_required = request.kind != OperationKind::Extraction;
        if sp_content.trim().is_empty() || (support_required && support.is_blank()) {
            return Err(PipelineError::Precondition("extracted content is empty".to_string()));
        }

        debug!("Read SP '{}' and {} supporting files", file_stem(sp_path), support.names.len());
        Ok(Inputs {
            sp_content,
            support,
        })
    }

    fn check_length(&self, chars: usize) -> Result<(), PipelineError> {
        if chars > self.config.max_input_chars {
            return Err(PipelineError::InputTooLong(chars, self.config.max_input_chars));
        }
        Ok(())
    }

    async fn call_llm_with_timeout(&self, prompt: String) -> Result<String, PipelineError> {
        timeout(self.config.llm_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| PipelineError::Timeout(self.config.llm_timeout_secs))?
    }

    /// Call LLM provider (wrapped for async)
    async fn call_llm(&self, prompt: String) -> Result<String, PipelineError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || llm.generate(&prompt).map_err(PipelineError::from))
            .await
            .map_err(|e| PipelineError::Llm(LlmError::Generation(format!("Task join error: {}", e))))?
    }

    fn transition(&mut self, next: PipelineState) {
        if self.state != next {
            debug!("Pipeline: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

fn build_prompt(kind: OperationKind, inputs: &Inputs) -> Result<String, PipelineError> {
    let support = inputs.support.content.as_str();
    let variables = match kind {
        OperationKind::Audit => HashMap::from([
            ("sp_content", inputs.sp_content.as_str()),
            ("analysis_content", support),
        ]),
        OperationKind::Extraction => HashMap::from([("sp_content", inputs.sp_content.as_str())]),
        OperationKind::DrawingCheck => HashMap::from([
            ("sp_content", inputs.sp_content.as_str()),
            ("drawings_content", support),
        ]),
    };
    render(TemplateId::for_kind(kind), &variables)
}

/// Whether `path` looks like a supported upload for `kind`'s supporting files
pub fn is_supporting_file(kind: OperationKind, path: &Path) -> bool {
    let file_type = auditor_ingest::FileType::from_path(path);
    match kind {
        OperationKind::Audit => file_type.is_sheet(),
        OperationKind::DrawingCheck => file_type == auditor_ingest::FileType::Pdf,
        OperationKind::Extraction => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_ingest::MemoryExtractor;
    use auditor_llm::MockProvider;

    fn pipeline(llm: MockProvider) -> Pipeline<MockProvider, MemoryExtractor> {
        let extractor = MemoryExtractor::new()
            .with_file("sp.docx", "17. Gerador [X] Sim")
            .with_file("LME_01.csv", "Gerador 1");
        Pipeline::new(llm, extractor, PipelineConfig::default())
    }

    #[test]
    fn test_new_pipeline_is_idle() {
        let pipeline = pipeline(MockProvider::default());
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(pipeline.store().is_empty());
        assert_eq!(pipeline.model_name(), "mock");
    }

    #[tokio::test]
    async fn test_state_after_success_and_failure() {
        let mut ok = pipeline(MockProvider::new("Relatório"));
        ok.run(OperationRequest::extraction("sp.docx")).await.unwrap();
        assert_eq!(ok.state(), PipelineState::Done);

        let mut failing = pipeline(MockProvider::failing("boom"));
        assert!(failing.run(OperationRequest::extraction("sp.docx")).await.is_err());
        assert_eq!(failing.state(), PipelineState::Failed);

        failing.reset();
        assert_eq!(failing.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_prompt_contains_documents() {
        let llm = MockProvider::new("ok");
        let mut pipeline = pipeline(llm.clone());
        pipeline
            .run(OperationRequest::audit("sp.docx", vec!["LME_01.csv".into()]))
            .await
            .unwrap();

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("17. Gerador [X] Sim"));
        assert!(prompt.contains("--- CONTEÚDO DO ARQUIVO: LME_01 ---\nGerador 1"));
    }

    #[test]
    fn test_is_supporting_file() {
        assert!(is_supporting_file(OperationKind::Audit, Path::new("a.xlsx")));
        assert!(!is_supporting_file(OperationKind::Audit, Path::new("a.pdf")));
        assert!(is_supporting_file(OperationKind::DrawingCheck, Path::new("a.PDF")));
        assert!(!is_supporting_file(OperationKind::Extraction, Path::new("a.csv")));
    }
}
