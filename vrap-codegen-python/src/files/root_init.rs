//! Root `__init__.py`: exposes the client at the top of the package.

use eyre::Result;
use vrap_codegen::{FileProducer, builder::CodeBuilder};
use vrap_core::TemplateFile;

use super::GENERATED_HEADER;
use crate::layout::{PackageLayout, relative_import};

pub struct RootInitProducer {
    layout: PackageLayout,
}

impl RootInitProducer {
    pub fn new(layout: PackageLayout) -> Self {
        Self { layout }
    }
}

impl FileProducer for RootInitProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        let client = relative_import(&[], self.layout.client_package());
        let content = CodeBuilder::python()
            .each(GENERATED_HEADER.lines(), |b, line| b.line(line))
            .blank()
            .line(&format!("from {} import Client", client))
            .blank()
            .line("__all__ = [\"Client\"]")
            .build();

        Ok(vec![TemplateFile::new(self.layout.package_init_path(&[]), content)])
    }
}
