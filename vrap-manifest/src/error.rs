use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for vrap-manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the content and filename of the file being parsed so error
/// factories don't need both passed around.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "vrap.toml");
/// ctx.validation_error_at("build_id must be a single line", span);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            filename: self.filename.clone(),
            source,
        })
    }

    /// Create a validation error with a span.
    pub fn validation_error_at(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Create an invalid concurrency error.
    pub fn invalid_concurrency_error(&self, value: usize) -> Box<Error> {
        Box::new(Error::InvalidConcurrency {
            src: self.named_source(),
            span: find_key_span(&self.src, "concurrency"),
            value,
        })
    }

    /// Create an invalid package name error.
    pub fn invalid_package_error(
        &self,
        key: impl Into<String>,
        name: impl Into<String>,
    ) -> Box<Error> {
        let name = name.into();
        Box::new(Error::InvalidPackage {
            src: self.named_source(),
            span: find_quoted_span(&self.src, &name),
            key: key.into(),
            name,
        })
    }

    /// Create a missing api file error, pointing at the configured path.
    pub fn api_not_found_error(&self, configured: &str, path: PathBuf) -> Box<Error> {
        Box::new(Error::ApiNotFound {
            src: self.named_source(),
            span: find_quoted_span(&self.src, configured),
            path,
        })
    }

    /// Create an error for an output directory that would swallow project files.
    pub fn unsafe_output_error(
        &self,
        path: PathBuf,
        protected: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnsafeOutput {
            src: self.named_source(),
            span,
            path,
            protected: protected.into(),
        })
    }

    /// Create a duplicate type error.
    pub fn duplicate_type_error(&self, name: impl Into<String>) -> Box<Error> {
        let name = name.into();
        let mut spans = find_all_quoted_spans(&self.src, &name).into_iter();
        let first_span = spans.next();
        let second_span = spans.next();
        Box::new(Error::DuplicateType {
            src: self.named_source(),
            first_span,
            second_span,
            name,
        })
    }

    /// Create a dangling reference error.
    pub fn dangling_reference_error(
        &self,
        owner: impl Into<String>,
        reference: impl Into<String>,
        others: usize,
    ) -> Box<Error> {
        let reference = reference.into();
        Box::new(Error::DanglingReference {
            src: self.named_source(),
            span: find_reference_span(&self.src, &reference),
            owner: owner.into(),
            reference,
            others,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("pass the path to a vrap.toml with --config"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(vrap::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        filename: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("concurrency must be at least 1, got {value}")]
    #[diagnostic(
        code(vrap::invalid_concurrency),
        help("remove the key to use the default of 100")
    )]
    InvalidConcurrency {
        #[source_code]
        src: NamedSource<String>,
        #[label("must be at least 1")]
        span: Option<SourceSpan>,
        value: usize,
    },

    #[error("invalid {key} package name '{name}'")]
    #[diagnostic(
        code(vrap::invalid_package),
        help(
            "use dotted identifiers made of letters, numbers and underscores, e.g. 'commercetools.platform'"
        )
    )]
    InvalidPackage {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid package name")]
        span: Option<SourceSpan>,
        key: String,
        name: String,
    },

    #[error("api file '{path}' not found")]
    #[diagnostic(
        code(vrap::api_not_found),
        help("the path is resolved relative to the directory containing vrap.toml")
    )]
    ApiNotFound {
        #[source_code]
        src: NamedSource<String>,
        #[label("configured here")]
        span: Option<SourceSpan>,
        path: PathBuf,
    },

    #[error("type '{name}' is declared more than once")]
    #[diagnostic(code(vrap::duplicate_type), help("type names must be unique"))]
    DuplicateType {
        #[source_code]
        src: NamedSource<String>,
        #[label("first declared here")]
        first_span: Option<SourceSpan>,
        #[label("declared again here")]
        second_span: Option<SourceSpan>,
        name: String,
    },

    #[error("'{owner}' references undeclared type '{reference}'")]
    #[diagnostic(
        code(vrap::dangling_reference),
        help("declare '{reference}' under [[types]] ({others} more undeclared references)")
    )]
    DanglingReference {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown type")]
        span: Option<SourceSpan>,
        owner: String,
        reference: String,
        others: usize,
    },

    #[error("output directory '{path}' would delete {protected}")]
    #[diagnostic(
        code(vrap::unsafe_output),
        help("the output directory is wiped before generation; point it at a dedicated subdirectory such as 'gen'")
    )]
    UnsafeOutput {
        #[source_code]
        src: NamedSource<String>,
        #[label("output configured here")]
        span: Option<SourceSpan>,
        path: PathBuf,
        protected: String,
    },

    #[error("{message}")]
    #[diagnostic(code(vrap::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}

/// Find the span of a `key = ...` assignment's key.
pub(crate) fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let patterns = [format!("{} =", key), format!("{}=", key)];
    for pattern in &patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            return Some(SourceSpan::from((pos, key.len())));
        }
    }
    None
}

/// Find the span of a quoted string value, excluding the quotes.
pub(crate) fn find_quoted_span(src: &str, value: &str) -> Option<SourceSpan> {
    find_all_quoted_spans(src, value).into_iter().next()
}

fn find_all_quoted_spans(src: &str, value: &str) -> Vec<SourceSpan> {
    let pattern = format!("\"{}\"", value);
    src.match_indices(pattern.as_str())
        .map(|(pos, _)| SourceSpan::from((pos + 1, value.len())))
        .collect()
}

/// Find the span of a type reference, which may be written as an array (`"Name[]"`).
fn find_reference_span(src: &str, reference: &str) -> Option<SourceSpan> {
    let prefix = format!("\"{}", reference);
    src.match_indices(prefix.as_str())
        .find(|(pos, _)| {
            let rest = &src[pos + prefix.len()..];
            rest.starts_with('"') || rest.starts_with("[]")
        })
        .map(|(pos, _)| SourceSpan::from((pos + 1, reference.len())))
        // Fallback: just find the name anywhere (less precise)
        .or_else(|| {
            src.find(reference)
                .map(|pos| SourceSpan::from((pos, reference.len())))
        })
}
