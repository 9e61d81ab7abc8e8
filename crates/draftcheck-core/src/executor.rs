//! Per-file lint pipeline and the parallel multi-file executor
//!
//! One file is processed strictly in sequence: tokenize, build, run rules,
//! sort. Files share nothing but the read-only rule engine, so a run over
//! many files is a plain parallel map.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::diagnostics::{FileReport, sort_by_location};
use crate::document::build_document;
use crate::lexer::tokenize;
use crate::rules::{LintContext, RuleEngine};
use crate::source_map::SourceMap;
use crate::{DraftcheckError, Result};

static THREAD_POOL_INIT: Once = Once::new();

/// Configure the global rayon pool once; later calls are ignored
pub fn init_thread_pool(threads: usize) {
    THREAD_POOL_INIT.call_once(|| {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("draftcheck-worker-{index}"))
            .build_global()
        {
            Ok(()) => info!("Configured global rayon thread pool with {threads} threads"),
            Err(e) => warn!("Could not configure global thread pool: {e}"),
        }
    });
}

/// Outcome of linting one input path
#[derive(Debug)]
pub enum FileOutcome {
    Linted(FileReport),
    /// The file could not be read or decoded; nothing was linted
    Failed {
        file: PathBuf,
        error: DraftcheckError,
    },
}

impl FileOutcome {
    pub fn report(&self) -> Option<&FileReport> {
        match self {
            FileOutcome::Linted(report) => Some(report),
            FileOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Lint in-memory source
///
/// Structural diagnostics from the builder come first, then the engine's,
/// and the whole list is stably sorted by location.
pub fn lint_source(file: &str, source: &str, engine: &dyn RuleEngine) -> FileReport {
    let tokens = tokenize(source);
    let built = build_document(source, &tokens);
    let source_map = SourceMap::new(source);
    debug!(
        "{file}: {} tokens, {} structural diagnostics",
        tokens.len(),
        built.diagnostics.len()
    );

    let ctx = LintContext {
        file,
        source,
        source_map: &source_map,
        tokens: &tokens,
        document: &built.document,
    };

    let mut diagnostics = built.diagnostics.clone();
    diagnostics.extend(engine.check(&ctx));
    sort_by_location(&mut diagnostics);

    FileReport {
        file: file.to_string(),
        source: source.to_string(),
        diagnostics,
    }
}

/// Read and decode a file as UTF-8
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DraftcheckError::io_error(path, e))?;
    String::from_utf8(bytes)
        .map_err(|e| DraftcheckError::encoding_error(path, e.utf8_error().valid_up_to()))
}

/// Lint one file from disk
pub fn lint_path(path: &Path, engine: &dyn RuleEngine) -> Result<FileReport> {
    let source = read_source(path)?;
    Ok(lint_source(&path.display().to_string(), &source, engine))
}

/// Lint many files in parallel; outcomes keep the input order
///
/// A file that fails to read never stops the others.
pub fn lint_paths(paths: &[PathBuf], engine: &dyn RuleEngine) -> Vec<FileOutcome> {
    info!("Linting {} files", paths.len());
    paths
        .par_iter()
        .map(|path| match lint_path(path, engine) {
            Ok(report) => FileOutcome::Linted(report),
            Err(error) => {
                warn!("Skipping {}: {error}", path.display());
                FileOutcome::Failed {
                    file: path.clone(),
                    error,
                }
            }
        })
        .collect()
}
