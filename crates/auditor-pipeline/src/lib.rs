//! Auditor Pipeline
//!
//! Drives one audit session: reads the uploads, renders a prompt, calls the
//! model and turns the answer into a report plus structured records.
//!
//! # Architecture
//!
//! ```text
//! files → DocumentExtractor → prompt → LlmProvider → splitter → parser → ResultStore
//! ```
//!
//! Each operation walks an explicit state machine:
//! `Idle → Reading → Prompting → AwaitingCompletion → Parsing → Done | Failed`.
//!
//! # Key Features
//!
//! - **Best-effort parsing**: table rows that do not match are skipped and
//!   counted, never reported as errors
//! - **One active result**: starting any operation clears the previous results
//! - **Bounded model calls**: each call runs under a configurable timeout
//!
//! # Example Usage
//!
//! ```no_run
//! use auditor_pipeline::{OperationRequest, Pipeline, PipelineConfig};
//! use auditor_ingest::FileExtractor;
//! use auditor_llm::GeminiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let llm = GeminiProvider::from_env(&config.model)?;
//! let mut pipeline = Pipeline::new(llm, FileExtractor::new(), config);
//!
//! let request = OperationRequest::audit("SP-001.docx", vec!["LME_01.xlsx".into()]);
//! let outcome = pipeline.run(request).await?;
//!
//! if let Some((kind, result)) = pipeline.store().active() {
//!     println!("{}: {} records ({} chars sent)", kind, result.records.len(), outcome.sent_chars);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod types;

pub mod parser;
pub mod prompt;
pub mod splitter;
pub mod store;
pub mod summary;


pub use config::PipelineConfig;
pub use error::PipelineError;
pub use parser::{normalize_list_name, parse_table, ParsedTable, TableMode};
pub use pipeline::{is_supporting_file, Pipeline, PipelineState};
pub use prompt::{render, TemplateId};
pub use splitter::{split_for, split_response, SplitResponse};
pub use store::ResultStore;
pub use summary::{category_counts, pending_counts, CategoryCount, PendingCount, ResultNotice};
pub use types::{AskAnswer, AskRequest, OperationOutcome, OperationRequest};
