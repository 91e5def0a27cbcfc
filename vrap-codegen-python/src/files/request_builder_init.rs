//! The `__init__.py` of each request builder package.

use eyre::Result;
use vrap_codegen::Renderer;
use vrap_core::TemplateFile;
use vrap_model::ResourceInfo;

use crate::layout::PackageLayout;

/// Renders an empty `__init__.py` next to a resource's request builder.
///
/// Resources of the same collection share a package, so several
/// resources render the same, identical file.
pub struct RequestBuilderInitRenderer {
    layout: PackageLayout,
}

impl RequestBuilderInitRenderer {
    pub fn new(layout: PackageLayout) -> Self {
        Self { layout }
    }
}

impl Renderer<ResourceInfo> for RequestBuilderInitRenderer {
    fn render(&self, resource: &ResourceInfo) -> Result<TemplateFile> {
        let package = self.layout.request_builder_package(&resource.full_uri);
        Ok(TemplateFile::new(self.layout.package_init_path(&package), ""))
    }
}
