//! Translating one text into many languages.
//!
//! Each language is requested separately. A failed language is recorded and
//! skipped; it never stops the remaining languages from being attempted.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::{ClientError, StoreError};
use crate::store::{SaveOutcome, Store};

use super::session::TranslationSession;

/// Anything that can produce a translation of `text` into `language`.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn fetch_translation(&self, text: &str, language: &str) -> Result<String, ClientError>;
}

/// How a batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Requests in flight at once. `1` translates strictly one after another.
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Languages finished so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Completed fraction in `[0, 1]`. An empty batch is complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Observations handed to the batch observer as the batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Translated {
        language: &'a str,
        progress: BatchProgress,
    },
    Failed {
        language: &'a str,
        error: &'a ClientError,
        progress: BatchProgress,
    },
    Finished {
        progress: BatchProgress,
    },
}

/// One language that produced no translation.
#[derive(Debug)]
pub struct BatchFailure {
    pub language: String,
    pub error: ClientError,
}

/// Outcome of a batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Translated languages in batch order.
    pub succeeded: Vec<String>,
    pub failures: Vec<BatchFailure>,
    /// Saves made when the batch was given a store.
    pub saved: Vec<(String, SaveOutcome)>,
    pub progress: BatchProgress,
}

/// Translate the session's source text into every language in `languages`.
///
/// The session is cleared first and then filled with each success in
/// `languages` order. With a `store`, each success is also saved under the
/// session's project. Per-language failures land in the report; only a store
/// failure ends the batch early.
pub async fn translate_all<S, F>(
    source: &S,
    session: &mut TranslationSession,
    languages: &[&str],
    options: &BatchOptions,
    store: Option<&Store>,
    mut observe: F,
) -> Result<BatchReport, StoreError>
where
    S: TranslationSource + ?Sized,
    F: FnMut(BatchEvent<'_>),
{
    session.clear();
    let text = session.source_text().to_string();
    let mut progress = BatchProgress::new(languages.len());
    let mut report = BatchReport {
        succeeded: Vec::new(),
        failures: Vec::new(),
        saved: Vec::new(),
        progress,
    };

    tracing::info!(
        project = %session.project(),
        languages = languages.len(),
        concurrency = options.concurrency.max(1),
        "Starting batch translation"
    );

    let text_ref = text.as_str();
    let mut results = stream::iter(languages.iter().copied())
        .map(|language| async move { (language, source.fetch_translation(text_ref, language).await) })
        .buffered(options.concurrency.max(1));

    while let Some((language, result)) = results.next().await {
        progress.completed += 1;
        match result {
            Ok(translation) => {
                if let Some(store) = store {
                    let outcome =
                        store.save_or_update(session.project(), language, text_ref, &translation)?;
                    report.saved.push((language.to_string(), outcome));
                }
                session.insert(language, translation);
                report.succeeded.push(language.to_string());
                observe(BatchEvent::Translated { language, progress });
            }
            Err(error) => {
                tracing::warn!(language = %language, error = %error, "No translation received");
                observe(BatchEvent::Failed {
                    language,
                    error: &error,
                    progress,
                });
                report.failures.push(BatchFailure {
                    language: language.to_string(),
                    error,
                });
            }
        }
    }

    report.progress = progress;
    observe(BatchEvent::Finished { progress });
    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failures.len(),
        "Batch translation complete"
    );
    Ok(report)
}
