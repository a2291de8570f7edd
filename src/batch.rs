//! Directory batch processing.
//!
//! Every PDF of an input directory is turned into one `<stem>.json` file in
//! an output directory. Documents are independent: a document that fails to
//! decode gets the fixed failure record and the rest of the batch goes on.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::Result;
use crate::model::DocumentResult;
use crate::normalize::extract_fragments;
use crate::outline::extract_outline;
use crate::parser::{ParseOptions, PdfSource};
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Decoding options applied to every document
    pub parse: ParseOptions,

    /// Layout of the written JSON files
    pub json_format: JsonFormat,

    /// Process documents on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            json_format: JsonFormat::Pretty,
            parallel: true,
        }
    }
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set decoding options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Set JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Outcome of one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub elapsed: Duration,
    /// Set when the document could not be processed
    pub error: Option<String>,
    /// Number of outline entries written
    pub headings: usize,
}

impl DocumentReport {
    /// Check if the document was processed.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a batch run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Number of documents processed without error.
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    /// Number of documents replaced by the failure record.
    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }

    /// Sum of per-document processing times.
    pub fn total_elapsed(&self) -> Duration {
        self.documents.iter().map(|d| d.elapsed).sum()
    }
}

/// List the PDF files directly inside a directory, sorted by path.
pub fn discover_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Path of the JSON file written for `input`.
pub fn output_path<P: AsRef<Path>>(output_dir: P, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.as_ref().join(format!("{}.json", stem))
}

/// Decode one PDF and compute its outline.
pub fn process_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<DocumentResult> {
    let source = PdfSource::open(path)?;
    let fragments = extract_fragments(&source, options)?;
    Ok(extract_outline(&fragments))
}

/// Process every PDF of `input_dir` into `output_dir`.
pub fn run_batch<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_batch_with_progress(input_dir, output_dir, options, |_| {})
}

/// Like [`run_batch`], calling `on_document` as each document finishes.
///
/// With parallel processing the callback runs on worker threads, in
/// completion order.
pub fn run_batch_with_progress<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_document: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&DocumentReport) + Sync,
{
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let inputs = discover_pdfs(input_dir.as_ref())?;
    if inputs.is_empty() {
        log::info!("No PDF files found in {}", input_dir.as_ref().display());
        return Ok(BatchReport::default());
    }

    log::info!(
        "Processing {} PDF files into {}",
        inputs.len(),
        output_dir.display()
    );

    let process = |input: &PathBuf| {
        let report = process_document(input, output_dir, options);
        on_document(&report);
        report
    };

    let documents: Vec<DocumentReport> = if options.parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    };

    let report = BatchReport { documents };
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}

fn process_document(input: &Path, output_dir: &Path, options: &BatchOptions) -> DocumentReport {
    let start = Instant::now();
    let output = output_path(output_dir, input);

    let (result, mut error) = match process_file(input, &options.parse) {
        Ok(result) => (result, None),
        Err(e) => {
            log::warn!("Error processing {}: {}", input.display(), e);
            (DocumentResult::failed(), Some(e.to_string()))
        }
    };

    let written = to_json(&result, options.json_format)
        .and_then(|json| fs::write(&output, json).map_err(Into::into));
    if let Err(e) = written {
        log::warn!("Could not write {}: {}", output.display(), e);
        error.get_or_insert_with(|| e.to_string());
    }

    DocumentReport {
        input: input.to_path_buf(),
        output,
        elapsed: start.elapsed(),
        headings: if error.is_none() { result.outline.len() } else { 0 },
        error,
    }
}
