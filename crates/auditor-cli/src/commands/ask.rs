//! Ask command implementation.

use crate::cli::AskArgs;
use crate::error::Result;
use crate::output::Formatter;
use auditor_domain::traits::{DocumentExtractor, LlmProvider};
use auditor_ingest::IngestError;
use auditor_llm::LlmError;
use auditor_pipeline::{AskRequest, Pipeline};

/// Execute the ask command.
pub async fn execute_ask<L, D>(args: AskArgs, pipeline: &mut Pipeline<L, D>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    let answer = pipeline
        .ask(AskRequest {
            documents: args.documents,
            question: args.question,
        })
        .await?;

    eprintln!(
        "{}",
        formatter.info(&format!("Answered from {} ({} chars)", answer.source_names.join(", "), answer.sent_chars))
    );
    println!("{}", formatter.format_answer(&answer)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use auditor_ingest::MemoryExtractor;
    use auditor_llm::MockProvider;
    use auditor_pipeline::{PipelineConfig, PipelineError};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_ask_without_documents() {
        let llm = MockProvider::new("resposta");
        let mut pipeline = Pipeline::new(llm.clone(), MemoryExtractor::new(), PipelineConfig::default());
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_ask(
            AskArgs {
                documents: Vec::new(),
                question: "Qual a potência?".to_string(),
            },
            &mut pipeline,
            &formatter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Pipeline(PipelineError::Precondition(_))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_sends_question() {
        let llm = MockProvider::new("500 kVA");
        let extractor = MemoryExtractor::new().with_file("SP.docx", "Gerador 500 kVA");
        let mut pipeline = Pipeline::new(llm.clone(), extractor, PipelineConfig::default());
        let formatter = Formatter::new(OutputFormat::Json, false);

        execute_ask(
            AskArgs {
                documents: vec![PathBuf::from("SP.docx")],
                question: "Qual a potência?".to_string(),
            },
            &mut pipeline,
            &formatter,
        )
        .await
        .unwrap();

        assert!(llm.prompts()[0].contains("Qual a potência?"));
        assert!(pipeline.store().is_empty());
    }
}
