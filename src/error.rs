//! Rich diagnostic error types for the epitome pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it. Setup-phase errors (extraction, index build)
//! are fatal; per-section errors (embedding at query time, completion) are
//! contained at the section boundary and never abort the run.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the epitome pipeline.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum EpitomeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("failed to read \"{path}\": {source}")]
    #[diagnostic(
        code(epitome::extract::io),
        help("Check that the input path exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF parse error: {message}")]
    #[diagnostic(
        code(epitome::extract::parse),
        help("The file could not be parsed as a PDF. Verify it is a valid, uncorrupted PDF.")
    )]
    Parse { message: String },

    #[error("no text extracted from \"{path}\"")]
    #[diagnostic(
        code(epitome::extract::no_pages),
        help(
            "Neither the text layer nor the OCR fallback produced any page text. \
             The document may be image-only with no OCR engine configured, or empty."
        )
    )]
    NoPages { path: String },

    #[error("OCR failed on page {page}: {message}")]
    #[diagnostic(
        code(epitome::extract::ocr),
        help("The OCR engine could not process this page. Check the engine's own logs.")
    )]
    Ocr { page: usize, message: String },
}

// ---------------------------------------------------------------------------
// Embedding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EmbedError {
    #[error("embedding request failed: {message}")]
    #[diagnostic(
        code(epitome::embed::request_failed),
        help(
            "Check that the embedding server is running and the model is pulled, \
             e.g. `ollama pull all-minilm`."
        )
    )]
    RequestFailed { message: String },

    #[error("failed to parse embedding response: {message}")]
    #[diagnostic(
        code(epitome::embed::parse),
        help("The embedding server returned an unexpected response format.")
    )]
    ParseError { message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    #[diagnostic(
        code(epitome::embed::dim_mismatch),
        help(
            "All embeddings in one run must come from the same model. \
             Do not change the embedding model while the index is being built."
        )
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding server returned an empty vector")]
    #[diagnostic(
        code(epitome::embed::empty_vector),
        help("The model produced no output for this input. Check the model name.")
    )]
    EmptyVector,
}

// ---------------------------------------------------------------------------
// Index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("cannot build a similarity index over zero sections")]
    #[diagnostic(
        code(epitome::index::no_sections),
        help(
            "Segmentation produced no sections, so there is nothing to index. \
             Check the extraction warnings above — the PDF may have yielded no usable text."
        )
    )]
    NoSections,

    #[error("embedding failed while indexing section {section}: {source}")]
    #[diagnostic(code(epitome::index::embed), help("The index cannot be built without an embedding for every section."))]
    Embed {
        section: usize,
        #[source]
        #[diagnostic_source]
        source: EmbedError,
    },
}

// ---------------------------------------------------------------------------
// Completion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CompletionError {
    #[error("completion request failed: {message}")]
    #[diagnostic(
        code(epitome::llm::request_failed),
        help("One request attempt failed; the client retries with backoff before giving up.")
    )]
    Request { message: String },

    #[error("completion request failed after {attempts} attempt(s): {message}")]
    #[diagnostic(
        code(epitome::llm::retries_exhausted),
        help(
            "The completion server kept failing after bounded retries. \
             Check that it is running, the model is pulled, and the network is up. \
             The affected section gets a visible placeholder; the run continues."
        )
    )]
    RetriesExhausted { attempts: usize, message: String },

    #[error("failed to parse completion response: {message}")]
    #[diagnostic(
        code(epitome::llm::parse),
        help("The completion server returned an unexpected response format.")
    )]
    ParseError { message: String },
}

// ---------------------------------------------------------------------------
// Writer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum WriteError {
    #[error("failed to write \"{path}\": {source}")]
    #[diagnostic(
        code(epitome::write::io),
        help("Check that the output directory exists and has write permission.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF assembly error: {message}")]
    #[diagnostic(
        code(epitome::write::pdf),
        help("The paginated document could not be assembled. This is likely a bug; please report it.")
    )]
    Pdf { message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file \"{path}\": {source}")]
    #[diagnostic(
        code(epitome::config::io),
        help("Check that the config path exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file \"{path}\": {message}")]
    #[diagnostic(
        code(epitome::config::parse),
        help("The config file is not valid TOML for RunConfig. Check field names and types.")
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning epitome results.
pub type EpitomeResult<T> = std::result::Result<T, EpitomeError>;
