//! Pipeline driver: load, chunk, summarize, resolve topics, extract,
//! validate and write, one document at a time

use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::content::DocumentLoader;
use crate::error::ExtractorError;
use crate::extractor::ClaimExtractor;
use crate::summarizer::{truncate_summary, Summarizer};
use crate::types::{BatchReport, ChunkReport, DocumentFailure, PipelineReport};
use claimsift_domain::traits::{CompletionProvider, ResultSink, TopicIndex};
use claimsift_domain::{Chunk, Document, OutputRow, SeenLinks, TopicTaxonomy};
use claimsift_gatekeeper::Gatekeeper;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Sequences every stage for one document
///
/// Chunks are processed strictly in order, and each chunk's rows are
/// appended to the sink before the next chunk is sent to the provider.
pub struct Pipeline<P, T, S> {
    extractor: ClaimExtractor<P>,
    summarizer: Summarizer<P>,
    topics: T,
    sink: S,
    loader: DocumentLoader,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
}

impl<P, T, S> Pipeline<P, T, S>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
    T: TopicIndex,
    S: ResultSink,
    S::Error: Display,
{
    /// Create a new Pipeline
    pub fn new(provider: P, topics: T, sink: S, config: ExtractorConfig) -> Self {
        let provider = Arc::new(provider);
        Self {
            extractor: ClaimExtractor::new(Arc::clone(&provider), &config),
            summarizer: Summarizer::new(provider, &config),
            topics,
            sink,
            loader: DocumentLoader::new(),
            gatekeeper: Gatekeeper::new(config.grounding.clone()),
            config,
        }
    }

    /// Use a custom document loader (for example one with a page renderer)
    pub fn with_loader(mut self, loader: DocumentLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The result sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load `source` and extract claims from it
    ///
    /// `summary`, when given, replaces the summarization call.
    pub async fn run(
        &self,
        source: &str,
        goal: &str,
        summary: Option<&str>,
    ) -> Result<PipelineReport, ExtractorError> {
        let run_id = Uuid::now_v7();
        async {
            let document = self.load(source).await?;
            self.process(run_id, &document, goal, summary, true).await
        }
        .instrument(info_span!("pipeline", %run_id, source))
        .await
    }

    /// Extract claims from already acquired document text
    pub async fn extract(
        &self,
        document: &Document,
        goal: &str,
        summary: Option<&str>,
    ) -> Result<PipelineReport, ExtractorError> {
        let run_id = Uuid::now_v7();
        self.process(run_id, document, goal, summary, true)
            .instrument(info_span!("pipeline", %run_id, source = %document.source))
            .await
    }

    /// Process several sources into one output, skipping sources already in
    /// `seen`
    ///
    /// The sink is initialized once. A document that fails with an input
    /// error is recorded and the batch continues; any other error stops it.
    pub async fn run_batch<I>(
        &self,
        sources: I,
        goal: &str,
        seen: &mut SeenLinks,
    ) -> Result<BatchReport, ExtractorError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.initialize_sink()?;
        let mut batch = BatchReport::default();

        for source in sources {
            let source = source.as_ref();
            if !seen.insert(source) {
                info!(source, "Source already processed, skipping");
                batch.skipped.push(source.to_string());
                continue;
            }

            let run_id = Uuid::now_v7();
            let result = async {
                let document = self.load(source).await?;
                self.process(run_id, &document, goal, None, false).await
            }
            .instrument(info_span!("pipeline", %run_id, source))
            .await;

            match result {
                Ok(report) => batch.documents.push(report),
                Err(e) if e.is_input_error() => {
                    warn!(source, error = %e, "Skipping document");
                    batch.failures.push(DocumentFailure {
                        source: source.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            documents = batch.documents.len(),
            failed = batch.failures.len(),
            skipped = batch.skipped.len(),
            rows = batch.rows_written(),
            "Batch complete"
        );
        Ok(batch)
    }

    async fn load(&self, source: &str) -> Result<Document, ExtractorError> {
        let loader = self.loader.clone();
        let owned = source.to_string();
        let document = tokio::task::spawn_blocking(move || loader.load(&owned))
            .await
            .map_err(|e| ExtractorError::Content(format!("Task join error: {}", e)))??;
        info!(chars = document.text.chars().count(), "Document loaded");
        Ok(document)
    }

    fn initialize_sink(&self) -> Result<(), ExtractorError> {
        self.sink
            .initialize()
            .map_err(|e| ExtractorError::Sink(e.to_string()))
    }

    async fn process(
        &self,
        run_id: Uuid,
        document: &Document,
        goal: &str,
        summary: Option<&str>,
        initialize: bool,
    ) -> Result<PipelineReport, ExtractorError> {
        let chunks = TextChunker::new(self.config.chunk_size).chunk(&document.text);
        info!(chunks = chunks.len(), "Document chunked");

        let summary = match summary {
            Some(given) => truncate_summary(given, self.config.max_summary_chars),
            None => self.summarize(&document.text, goal).await,
        };

        let taxonomy = self.topics.search_topics(&summary);
        let topics = self.topics.format_topics(&taxonomy);
        debug!(topics = taxonomy.len(), "Topics resolved");

        if initialize {
            self.initialize_sink()?;
        }

        let mut report = PipelineReport {
            run_id,
            source: document.source.clone(),
            summary,
            topics,
            chunk_count: chunks.len(),
            chunks: Vec::with_capacity(chunks.len()),
            rows_written: 0,
            verified_count: 0,
        };

        for chunk in &chunks {
            let chunk_report = self
                .process_chunk(document, chunk, goal, &report.summary, &report.topics, &taxonomy)
                .await?;
            report.rows_written += chunk_report.claims;
            report.verified_count += chunk_report.verified;
            report.chunks.push(chunk_report);
        }

        info!(
            rows = report.rows_written,
            verified = report.verified_count,
            "Document complete"
        );
        Ok(report)
    }

    async fn summarize(&self, text: &str, goal: &str) -> String {
        let Some(first) = TextChunker::new(self.config.summary_chunk_size)
            .chunk(text)
            .into_iter()
            .next()
        else {
            return String::new();
        };

        match self.summarizer.summarize(&first.text, goal).await {
            Ok(summary) => truncate_summary(&summary.summary, self.config.max_summary_chars),
            Err(e) => {
                warn!(error = %e, "Summarization failed, continuing without a summary");
                String::new()
            }
        }
    }

    async fn process_chunk(
        &self,
        document: &Document,
        chunk: &Chunk,
        goal: &str,
        summary: &str,
        topics: &str,
        taxonomy: &TopicTaxonomy,
    ) -> Result<ChunkReport, ExtractorError> {
        debug!(chunk = chunk.index, chars = chunk.char_len(), "Extracting chunk");
        let extraction = self
            .extractor
            .extract_from_chunk(&chunk.text, summary, goal, topics)
            .await;

        let mut verified = 0;
        let claims = extraction.claims.len();
        for claim in extraction.claims {
            if !taxonomy.contains(&claim.topic, Some(&claim.subtopic)) {
                debug!(topic = %claim.topic, subtopic = %claim.subtopic, "Claim topic not in taxonomy");
            }

            let validated = self.gatekeeper.annotate(claim, &chunk.text);
            if validated.verified_in_source {
                verified += 1;
            }
            self.sink
                .append(&OutputRow::new(document.source.as_str(), validated))
                .map_err(|e| ExtractorError::Sink(e.to_string()))?;
        }

        info!(chunk = chunk.index, claims, verified, "Chunk written");
        Ok(ChunkReport {
            index: chunk.index,
            chars: chunk.char_len(),
            attempts: extraction.attempts,
            outcome: extraction.outcome,
            claims,
            verified,
        })
    }
}
