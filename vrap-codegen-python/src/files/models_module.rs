//! Model modules: one `models/<module>.py` per declared package.

use std::{collections::HashSet, sync::Arc};

use eyre::{Result, bail};
use indexmap::IndexMap;
use vrap_codegen::{FileProducer, builder::CodeBuilder, language::TypeMapper};
use vrap_core::TemplateFile;
use vrap_model::{AnyType, ApiModel, ObjectType, Property, StringType, StringTypeKind, UnionType};

use super::GENERATED_HEADER;
use crate::{
    imports::ImportSet,
    layout::{PackageLayout, relative_import},
    naming::{PY_NAMING, enum_member_name},
    type_mapper::PythonTypeMapper,
};

/// Renders every declared type, grouped into modules by package.
///
/// Types keep their declaration order, except that a parent declared in
/// the same module is always rendered before its subtypes.
pub struct ModelsModuleProducer {
    model: Arc<ApiModel>,
    layout: PackageLayout,
}

impl ModelsModuleProducer {
    pub fn new(model: Arc<ApiModel>, layout: PackageLayout) -> Self {
        Self { model, layout }
    }

    /// Declared types grouped by module, in first-seen order.
    fn modules(&self) -> IndexMap<Vec<String>, Vec<&AnyType>> {
        let mut modules: IndexMap<Vec<String>, Vec<&AnyType>> = IndexMap::new();
        for ty in &self.model.types {
            modules
                .entry(self.layout.model_module(ty))
                .or_default()
                .push(ty);
        }
        modules
    }

    fn render_module(&self, module: &[String], types: &[&AnyType]) -> Result<TemplateFile> {
        let package = &module[..module.len() - 1];
        let types = sort_by_parent(types);
        let imports = self.imports(package, module, &types)?;
        let checking = self.type_checking_imports(package, module, &types, &imports)?;

        let mut builder = CodeBuilder::python();
        builder.push_lines(GENERATED_HEADER).push_blank();
        imports.push_into(&mut builder);
        if !checking.is_empty() {
            builder
                .push_blank()
                .push_line("if typing.TYPE_CHECKING:")
                .push_indent();
            checking.push_into(&mut builder);
            builder.push_dedent();
        }

        builder.push_blank().push_line("__all__ = [").push_indent();
        let mut exported: Vec<_> = types.iter().map(|ty| ty.name()).collect();
        exported.sort_unstable();
        for name in exported {
            builder.push_line(&format!("\"{}\",", name));
        }
        builder.push_dedent().push_line("]");

        for ty in &types {
            builder.push_blank().push_blank();
            match ty {
                AnyType::Object(object) if object.is_map() => render_map(&mut builder, object),
                AnyType::Object(object) => self.render_object(&mut builder, object)?,
                AnyType::Union(union) => render_union(&mut builder, union),
                AnyType::String(string) => render_string(&mut builder, string),
            }
        }

        Ok(TemplateFile::new(
            self.layout.module_path(module),
            builder.build(),
        ))
    }

    /// Imports needed at runtime: stdlib modules and parent classes.
    fn imports(&self, package: &[String], module: &[String], types: &[&AnyType]) -> Result<ImportSet> {
        let mut imports = ImportSet::new();
        imports.import("typing");

        let mut needs_base = false;
        for ty in types {
            match ty {
                AnyType::Object(object) => {
                    if object
                        .properties
                        .iter()
                        .any(|p| PythonTypeMapper::uses_datetime(&p.type_ref))
                    {
                        imports.import("datetime");
                    }
                    if object.is_map() {
                        continue;
                    }
                    match &object.parent {
                        None => needs_base = true,
                        Some(parent) => {
                            let parent_module = self.module_of(parent, &object.name)?;
                            if parent_module != module {
                                imports.import_from(
                                    relative_import(package, &parent_module),
                                    parent.as_str(),
                                );
                            }
                        }
                    }
                }
                AnyType::String(string) if string.kind() == StringTypeKind::Enum => {
                    imports.import("enum");
                }
                _ => {}
            }
        }
        if needs_base {
            imports.import_from(
                relative_import(package, &self.layout.abstract_module()),
                "_BaseType",
            );
        }
        Ok(imports)
    }

    /// Imports only needed by annotations, guarded by `typing.TYPE_CHECKING`.
    fn type_checking_imports(
        &self,
        package: &[String],
        module: &[String],
        types: &[&AnyType],
        runtime: &ImportSet,
    ) -> Result<ImportSet> {
        let mut imports = ImportSet::new();
        for ty in types {
            let referenced: Vec<&str> = match ty {
                AnyType::Object(object) => object
                    .properties
                    .iter()
                    .filter_map(|p| p.type_ref.named())
                    .collect(),
                AnyType::Union(union) => union.variants.iter().map(String::as_str).collect(),
                AnyType::String(_) => Vec::new(),
            };
            for name in referenced {
                let target = self.module_of(name, ty.name())?;
                if target != module && !runtime.imports_name(name) {
                    imports.import_from(relative_import(package, &target), name);
                }
            }
        }
        Ok(imports)
    }

    fn module_of(&self, name: &str, referenced_by: &str) -> Result<Vec<String>> {
        match self.model.type_by_name(name) {
            Some(ty) => Ok(self.layout.model_module(ty)),
            None => bail!("unknown type '{}' referenced by '{}'", name, referenced_by),
        }
    }

    fn render_object(&self, builder: &mut CodeBuilder, object: &ObjectType) -> Result<()> {
        let mapper = PythonTypeMapper::forward_references();
        let chain = self.ancestors(object)?;
        let discriminator = chain.iter().rev().find_map(|t| t.discriminator.as_deref());
        let discriminator_value = object.discriminator_value.as_deref().zip(discriminator);

        let base = object.parent.as_deref().unwrap_or("_BaseType");
        builder.push_line(&format!("class {}({}):", object.name, base)).push_indent();
        if let Some(description) = &object.description {
            builder.push_docstring(description).push_blank();
        }

        let inherited = unique_fields(&chain[..chain.len() - 1]);
        let own: Vec<&Property> = fields(object)
            .filter(|p| !inherited.iter().any(|i| i.name == p.name))
            .collect();
        for property in &own {
            builder.push_line(&format!(
                "{}: {}",
                PY_NAMING.field_name(&property.name),
                annotation(&mapper, property)
            ));
        }

        let all: Vec<&Property> = inherited.iter().chain(&own).copied().collect();
        if !all.is_empty() {
            if !own.is_empty() {
                builder.push_blank();
            }
            builder.push_line("_fields = {").push_indent();
            for property in &all {
                builder.push_line(&format!(
                    "\"{}\": \"{}\",",
                    PY_NAMING.field_name(&property.name),
                    property.name
                ));
            }
            builder.push_dedent().push_line("}");
        }
        if !own.is_empty() || !all.is_empty() {
            builder.push_blank();
        }

        if all.is_empty() {
            builder.push_line("def __init__(self):");
        } else {
            builder
                .push_line("def __init__(")
                .push_indent()
                .push_line("self,")
                .push_line("*,");
            for property in &all {
                let name = PY_NAMING.field_name(&property.name);
                let line = match discriminator_value {
                    Some((value, field)) if field == property.name => {
                        format!("{}: {} = \"{}\",", name, mapper.map_type(&property.type_ref), value)
                    }
                    _ if property.required => {
                        format!("{}: {},", name, mapper.map_type(&property.type_ref))
                    }
                    _ => format!("{}: {} = None,", name, mapper.map_optional(&property.type_ref)),
                };
                builder.push_line(&line);
            }
            builder.push_dedent().push_line("):");
        }

        builder.push_indent();
        for property in &own {
            let name = PY_NAMING.field_name(&property.name);
            builder.push_line(&format!("self.{} = {}", name, name));
        }
        let inherited: Vec<String> = inherited
            .iter()
            .map(|property| {
                let name = PY_NAMING.field_name(&property.name);
                format!("{}={}", name, name)
            })
            .collect();
        builder.push_line(&format!("super().__init__({})", inherited.join(", ")));
        builder.push_dedent().push_dedent();
        Ok(())
    }

    /// The object's ancestry, root first, ending with the object itself.
    fn ancestors<'a>(&'a self, object: &'a ObjectType) -> Result<Vec<&'a ObjectType>> {
        let mut chain = vec![object];
        let mut seen = HashSet::from([object.name.as_str()]);
        let mut current = object;
        while let Some(parent) = &current.parent {
            let parent = match self.model.type_by_name(parent) {
                Some(AnyType::Object(parent)) => parent,
                Some(_) => bail!("parent '{}' of '{}' is not an object type", parent, current.name),
                None => bail!("unknown type '{}' referenced by '{}'", parent, current.name),
            };
            if !seen.insert(parent.name.as_str()) {
                bail!("type '{}' inherits from itself", object.name);
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }
}

impl FileProducer for ModelsModuleProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        self.modules()
            .iter()
            .map(|(module, types)| self.render_module(module, types))
            .collect()
    }
}

/// Properties rendered as attributes. Pattern properties are not.
fn fields(object: &ObjectType) -> impl Iterator<Item = &Property> {
    object.properties.iter().filter(|p| !p.is_pattern())
}

/// Fields of a chain of types, first declaration wins.
fn unique_fields<'a>(types: &[&'a ObjectType]) -> Vec<&'a Property> {
    let mut seen = HashSet::new();
    types
        .iter()
        .flat_map(|&t| fields(t))
        .filter(|p| seen.insert(p.name.as_str()))
        .collect()
}

fn annotation(mapper: &PythonTypeMapper, property: &Property) -> String {
    if property.required {
        mapper.map_type(&property.type_ref)
    } else {
        mapper.map_optional(&property.type_ref)
    }
}

fn render_map(builder: &mut CodeBuilder, object: &ObjectType) {
    let mapper = PythonTypeMapper::forward_references();
    let value = object
        .properties
        .first()
        .map(|p| mapper.map_type(&p.type_ref))
        .unwrap_or_else(|| "typing.Any".to_string());
    builder
        .push_line(&format!("class {}(typing.Dict[str, {}]):", object.name, value))
        .push_indent();
    match &object.description {
        Some(description) => builder.push_docstring(description),
        None => builder.push_line("pass"),
    };
    builder.push_dedent();
}

fn render_union(builder: &mut CodeBuilder, union: &UnionType) {
    let mapper = PythonTypeMapper::forward_references();
    if let Some(description) = &union.description {
        push_comment(builder, description);
    }
    let variants: Vec<_> = union.variants.iter().map(|v| mapper.map_named(v)).collect();
    builder.push_line(&format!(
        "{} = typing.Union[{}]",
        union.name,
        variants.join(", ")
    ));
}

fn render_string(builder: &mut CodeBuilder, string: &StringType) {
    match string.kind() {
        StringTypeKind::Enum => {
            builder
                .push_line(&format!("class {}(enum.Enum):", string.name))
                .push_indent();
            if let Some(description) = &string.description {
                builder.push_docstring(description).push_blank();
            }
            for value in &string.enum_values {
                builder.push_line(&format!("{} = \"{}\"", enum_member_name(value), value));
            }
            builder.push_dedent();
        }
        StringTypeKind::Pattern | StringTypeKind::NamedScalar => {
            if let Some(description) = &string.description {
                push_comment(builder, description);
            }
            if let Some(pattern) = &string.pattern {
                builder.push_line(&format!("# Matches {}", pattern));
            }
            builder.push_line(&format!("{} = str", string.name));
        }
    }
}

fn push_comment(builder: &mut CodeBuilder, text: &str) {
    for line in text.trim().lines() {
        builder.push_line(format!("# {}", line).trim_end());
    }
}

/// Order types so that a parent in the same module precedes its subtypes.
fn sort_by_parent<'a>(types: &[&'a AnyType]) -> Vec<&'a AnyType> {
    fn visit<'a>(
        ty: &'a AnyType,
        types: &[&'a AnyType],
        visited: &mut HashSet<&'a str>,
        sorted: &mut Vec<&'a AnyType>,
    ) {
        if !visited.insert(ty.name()) {
            return;
        }
        if let AnyType::Object(object) = ty
            && let Some(parent) = &object.parent
            && let Some(parent) = types.iter().copied().find(|t| t.name() == parent)
        {
            visit(parent, types, visited, sorted);
        }
        sorted.push(ty);
    }

    let mut visited = HashSet::new();
    let mut sorted = Vec::with_capacity(types.len());
    for &ty in types {
        visit(ty, types, &mut visited, &mut sorted);
    }
    sorted
}
