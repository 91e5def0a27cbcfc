use std::{any::Any, fmt};

use eyre::Result;
use vrap_core::TemplateFile;

use crate::write_stage::panic_message;

/// Renders one model entity into one file.
///
/// Renderers are pure: the output depends only on the entity and the
/// renderer's own configuration, never on other renderers or call order.
pub trait Renderer<T>: Send + Sync {
    fn render(&self, entity: &T) -> Result<TemplateFile>;
}

/// Produces the files of a whole build in one call.
pub trait FileProducer: Send + Sync {
    fn produce_files(&self) -> Result<Vec<TemplateFile>>;

    /// Name used in logs and failure reports.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// A renderer or producer call that failed before yielding a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    /// What was being rendered, e.g. `object type 'Cart'`.
    pub target: String,
    /// The error chain.
    pub message: String,
}

impl RenderFailure {
    pub fn new(target: impl Into<String>, error: &eyre::Report) -> Self {
        Self {
            target: target.into(),
            message: format!("{:#}", error),
        }
    }

    /// A renderer or producer that panicked instead of returning an error.
    pub fn panicked(target: impl Into<String>, payload: Box<dyn Any + Send>) -> Self {
        Self {
            target: target.into(),
            message: format!("panicked: {}", panic_message(payload)),
        }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to render {}: {}", self.target, self.message)
    }
}

#[cfg(test)]
mod tests {
    use eyre::{WrapErr, eyre};

    use super::*;

    struct LicenseProducer;

    impl FileProducer for LicenseProducer {
        fn produce_files(&self) -> Result<Vec<TemplateFile>> {
            Ok(vec![TemplateFile::new("LICENSE", "MIT")])
        }
    }

    struct Prefixed<P>(P);

    impl<P: FileProducer> FileProducer for Prefixed<P> {
        fn produce_files(&self) -> Result<Vec<TemplateFile>> {
            self.0.produce_files()
        }
    }

    #[test]
    fn test_producer_name_is_type_name() {
        assert_eq!(LicenseProducer.name(), "LicenseProducer");
    }

    #[test]
    fn test_producer_name_drops_generic_arguments() {
        assert_eq!(Prefixed(LicenseProducer).name(), "Prefixed");
        assert_eq!(Prefixed(Prefixed(LicenseProducer)).name(), "Prefixed");
    }

    #[test]
    fn test_panicked_failure_keeps_message() {
        let failure = RenderFailure::panicked("resource '/carts'", Box::new("index out of bounds"));

        assert_eq!(
            failure.to_string(),
            "failed to render resource '/carts': panicked: index out of bounds"
        );
    }

    #[test]
    fn test_render_failure_keeps_error_chain() {
        let error = Err::<(), _>(eyre!("unknown type 'Money'"))
            .wrap_err("failed to map property 'total'")
            .unwrap_err();
        let failure = RenderFailure::new("object type 'Cart'", &error);

        assert_eq!(
            failure.to_string(),
            "failed to render object type 'Cart': failed to map property 'total': unknown type 'Money'"
        );
    }
}
