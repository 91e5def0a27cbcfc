//! String type declarations.

use eyre::Result;
use vrap_codegen::{Renderer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::{StringType, StringTypeKind};

use super::{DATA_TYPE_HEADER, push_description};
use crate::paths::type_path;

/// Renders `types/<package>/<Name>.raml` for enum, pattern and named
/// scalar string types.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTypeRenderer;

impl Renderer<StringType> for StringTypeRenderer {
    fn render(&self, string: &StringType) -> Result<TemplateFile> {
        let mut builder = CodeBuilder::yaml();
        builder
            .push_line(DATA_TYPE_HEADER)
            .push_line(&format!("displayName: {}", string.name))
            .push_line("type: string")
            .push_line("(builtinType): string");
        push_description(&mut builder, string.description.as_deref());

        match string.kind() {
            StringTypeKind::Enum => {
                builder.push_line("enum:");
                for value in &string.enum_values {
                    builder.push_line(&format!("- {}", value));
                }
            }
            StringTypeKind::Pattern => {
                if let Some(pattern) = &string.pattern {
                    builder.push_line(&format!("pattern: {}", quote(pattern)));
                }
            }
            StringTypeKind::NamedScalar => {}
        }

        Ok(TemplateFile::new(
            type_path(&string.name, string.package.as_deref()),
            builder.build(),
        ))
    }
}

/// Single-quote a YAML scalar, doubling embedded quotes.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
