//! `models/__init__.py`: re-exports every model module.

use std::{collections::BTreeSet, sync::Arc};

use eyre::Result;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::TemplateFile;
use vrap_model::ApiModel;

use super::GENERATED_HEADER;
use crate::layout::{PackageLayout, relative_import};

/// Star-imports each model module so that `models.Cart` works.
pub struct ModelsInitProducer {
    model: Arc<ApiModel>,
    layout: PackageLayout,
}

impl ModelsInitProducer {
    pub fn new(model: Arc<ApiModel>, layout: PackageLayout) -> Self {
        Self { model, layout }
    }
}

impl FileProducer for ModelsInitProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let package = self.layout.model_package();
        let modules: BTreeSet<String> = self
            .model
            .types
            .iter()
            .map(|ty| relative_import(package, &self.layout.model_module(ty)))
            .collect();

        let content = CodeBuilder::python()
            .each(GENERATED_HEADER.lines(), |b, line| b.line(line))
            .blank()
            .each(modules, |b, module| {
                b.line(&format!("from {} import *  # noqa", module))
            })
            .build();

        Ok(vec![TemplateFile::new(
            self.layout.package_init_path(package),
            content,
        )])
    }
}
