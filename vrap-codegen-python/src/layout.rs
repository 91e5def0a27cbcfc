//! Where generated modules live inside the Python package.
//!
//! Module paths are kept as segment lists relative to the base package, so
//! the same value yields a file path (`vrap/models/cart.py`) and a relative
//! import (`...models.cart`).

use vrap_codegen::naming::{resource_stem, request_builder_name};
use vrap_manifest::Packages;
use vrap_model::{AnyType, UriTemplate};

use crate::naming::PY_NAMING;

/// Module holding declared types without a package.
pub const DEFAULT_MODEL_MODULE: &str = "common";

/// Module holding the hand-off point to the HTTP layer.
pub const BASE_CLIENT_MODULE: &str = "base_client";

/// Package layout of the generated SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    base: Vec<String>,
    client: Vec<String>,
    model: Vec<String>,
}

impl PackageLayout {
    pub fn new(packages: &Packages) -> Self {
        Self {
            base: split_package(&packages.base),
            client: split_package(&packages.client),
            model: split_package(&packages.model),
        }
    }

    /// Segments of the client package.
    pub fn client_package(&self) -> &[String] {
        &self.client
    }

    /// Segments of the model package.
    pub fn model_package(&self) -> &[String] {
        &self.model
    }

    /// Module a declared type is rendered into.
    pub fn model_module(&self, ty: &AnyType) -> Vec<String> {
        let module = ty
            .package()
            .map(|package| PY_NAMING.module_name(package))
            .unwrap_or_else(|| DEFAULT_MODEL_MODULE.to_string());
        self.within(&self.model, [module])
    }

    /// Module of the `_abstract` base class.
    pub fn abstract_module(&self) -> Vec<String> {
        self.within(&self.model, ["_abstract".to_string()])
    }

    /// Module of the base client.
    pub fn base_client_module(&self) -> Vec<String> {
        vec![BASE_CLIENT_MODULE.to_string()]
    }

    /// Package holding the request builders of a resource's collection.
    ///
    /// Resources sharing a collection share a package, e.g. `/{projectKey}/carts`
    /// and `/{projectKey}/carts/{ID}` both live in `client/by_project_key_carts`.
    pub fn request_builder_package(&self, full_uri: &UriTemplate) -> Vec<String> {
        let collection = PY_NAMING.module_name(&resource_stem(&full_uri.collection()));
        self.within(&self.client, [collection])
    }

    /// Module of a resource's request builder.
    pub fn request_builder_module(&self, full_uri: &UriTemplate) -> Vec<String> {
        let mut module = self.request_builder_package(full_uri);
        module.push(PY_NAMING.module_name(&request_builder_name(full_uri)));
        module
    }

    /// File path of a module, e.g. `vrap/models/cart.py`.
    pub fn module_path(&self, module: &[String]) -> String {
        let mut segments = self.base.clone();
        segments.extend(module.iter().cloned());
        format!("{}.py", segments.join("/"))
    }

    /// File path of a package's `__init__.py`.
    pub fn package_init_path(&self, package: &[String]) -> String {
        let mut segments = self.base.clone();
        segments.extend(package.iter().cloned());
        segments.push("__init__.py".to_string());
        segments.join("/")
    }

    fn within<I>(&self, package: &[String], rest: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        package.iter().cloned().chain(rest).collect()
    }
}

impl Default for PackageLayout {
    fn default() -> Self {
        Self::new(&Packages::default())
    }
}

/// Relative import of `target` from a module inside `from_package`.
///
/// Both are segment lists relative to the base package:
/// `relative_import(["client", "carts"], ["models", "cart"])` is `...models.cart`.
pub fn relative_import(from_package: &[String], target: &[String]) -> String {
    let common = from_package
        .iter()
        .zip(target)
        .take_while(|(a, b)| a == b)
        .count();
    let dots = ".".repeat(from_package.len() - common + 1);
    format!("{}{}", dots, target[common..].join("."))
}

fn split_package(package: &str) -> Vec<String> {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
