use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use vrap_core::TemplateFile;
use vrap_model::{
    ApiModel, ObjectType, ResourceCollection, ResourceInfo, ResourceMethod, StringType, UnionType,
};

use super::{FileProducer, RenderFailure, Renderer};

/// Every renderer and producer registered for a build.
///
/// Each category is an ordered, possibly empty list. Renderers run once per
/// entity of their kind in [`ApiModel`]; producers run once per build.
///
/// # Example
///
/// ```ignore
/// let generators = GeneratorSet::new()
///     .with_object_type_renderer(ModelRenderer::new(packages))
///     .with_file_producer(ApiFileProducer::new(model.clone()));
/// ```
#[derive(Clone, Default)]
pub struct GeneratorSet {
    pub object_types: Vec<Arc<dyn Renderer<ObjectType>>>,
    pub union_types: Vec<Arc<dyn Renderer<UnionType>>>,
    pub enum_string_types: Vec<Arc<dyn Renderer<StringType>>>,
    pub pattern_string_types: Vec<Arc<dyn Renderer<StringType>>>,
    pub named_scalar_types: Vec<Arc<dyn Renderer<StringType>>>,
    pub resource_collections: Vec<Arc<dyn Renderer<ResourceCollection>>>,
    pub methods: Vec<Arc<dyn Renderer<ResourceMethod>>>,
    pub resources: Vec<Arc<dyn Renderer<ResourceInfo>>>,
    pub file_producers: Vec<Arc<dyn FileProducer>>,
}

impl GeneratorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_type_renderer(
        mut self,
        renderer: impl Renderer<ObjectType> + 'static,
    ) -> Self {
        self.object_types.push(Arc::new(renderer));
        self
    }

    pub fn with_union_type_renderer(mut self, renderer: impl Renderer<UnionType> + 'static) -> Self {
        self.union_types.push(Arc::new(renderer));
        self
    }

    pub fn with_enum_string_type_renderer(
        mut self,
        renderer: impl Renderer<StringType> + 'static,
    ) -> Self {
        self.enum_string_types.push(Arc::new(renderer));
        self
    }

    pub fn with_pattern_string_type_renderer(
        mut self,
        renderer: impl Renderer<StringType> + 'static,
    ) -> Self {
        self.pattern_string_types.push(Arc::new(renderer));
        self
    }

    pub fn with_named_scalar_type_renderer(
        mut self,
        renderer: impl Renderer<StringType> + 'static,
    ) -> Self {
        self.named_scalar_types.push(Arc::new(renderer));
        self
    }

    pub fn with_resource_collection_renderer(
        mut self,
        renderer: impl Renderer<ResourceCollection> + 'static,
    ) -> Self {
        self.resource_collections.push(Arc::new(renderer));
        self
    }

    pub fn with_method_renderer(mut self, renderer: impl Renderer<ResourceMethod> + 'static) -> Self {
        self.methods.push(Arc::new(renderer));
        self
    }

    pub fn with_resource_renderer(mut self, renderer: impl Renderer<ResourceInfo> + 'static) -> Self {
        self.resources.push(Arc::new(renderer));
        self
    }

    pub fn with_file_producer(mut self, producer: impl FileProducer + 'static) -> Self {
        self.file_producers.push(Arc::new(producer));
        self
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.renderer_count() == 0 && self.file_producers.is_empty()
    }

    /// Number of registered per-entity renderers across all categories.
    pub fn renderer_count(&self) -> usize {
        self.object_types.len()
            + self.union_types.len()
            + self.enum_string_types.len()
            + self.pattern_string_types.len()
            + self.named_scalar_types.len()
            + self.resource_collections.len()
            + self.methods.len()
            + self.resources.len()
    }

    /// Lazily enumerate every unit of the build.
    ///
    /// Renderers come first, category by category (object, union, enum,
    /// pattern and named scalar types, resource collections, methods,
    /// resources), each renderer over every entity of its kind. File
    /// producers follow in registration order. Nothing is rendered until
    /// the iterator is advanced.
    pub fn units<'a>(
        &'a self,
        model: &'a ApiModel,
    ) -> impl Iterator<Item = Result<TemplateFile, RenderFailure>> + 'a {
        render_all(&self.object_types, &model.object_types)
            .chain(render_all(&self.union_types, &model.union_types))
            .chain(render_all(&self.enum_string_types, &model.enum_string_types))
            .chain(render_all(
                &self.pattern_string_types,
                &model.pattern_string_types,
            ))
            .chain(render_all(&self.named_scalar_types, &model.named_scalar_types))
            .chain(render_all(
                &self.resource_collections,
                &model.resource_collections,
            ))
            .chain(render_all(&self.methods, &model.methods))
            .chain(render_all(&self.resources, &model.resources))
            .chain(self.file_producers.iter().flat_map(|producer| {
                let target = || format!("file producer '{}'", producer.name());
                match guarded(target, || producer.produce_files()) {
                    Ok(files) => files.into_iter().map(Ok).collect::<Vec<_>>(),
                    Err(failure) => vec![Err(failure)],
                }
            }))
    }
}

fn render_all<'a, T: Entity>(
    renderers: &'a [Arc<dyn Renderer<T>>],
    entities: &'a [T],
) -> impl Iterator<Item = Result<TemplateFile, RenderFailure>> + 'a {
    renderers.iter().flat_map(move |renderer| {
        entities
            .iter()
            .map(move |entity| guarded(|| entity.label(), || renderer.render(entity)))
    })
}

/// Run one renderer or producer call, turning an error or a panic into a
/// [`RenderFailure`] for `target`.
fn guarded<R>(
    target: impl FnOnce() -> String,
    call: impl FnOnce() -> eyre::Result<R>,
) -> Result<R, RenderFailure> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(RenderFailure::new(target(), &e)),
        Err(payload) => Err(RenderFailure::panicked(target(), payload)),
    }
}

/// Describes an entity in failure reports.
trait Entity {
    fn label(&self) -> String;
}

impl Entity for ObjectType {
    fn label(&self) -> String {
        format!("object type '{}'", self.name)
    }
}

impl Entity for UnionType {
    fn label(&self) -> String {
        format!("union type '{}'", self.name)
    }
}

impl Entity for StringType {
    fn label(&self) -> String {
        format!("string type '{}'", self.name)
    }
}

impl Entity for ResourceCollection {
    fn label(&self) -> String {
        format!("resource collection '{}'", self.uri)
    }
}

impl Entity for ResourceMethod {
    fn label(&self) -> String {
        format!(
            "method '{} {}'",
            self.method.method.as_str().to_uppercase(),
            self.full_uri
        )
    }
}

impl Entity for ResourceInfo {
    fn label(&self) -> String {
        format!("resource '{}'", self.full_uri)
    }
}

impl fmt::Debug for GeneratorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSet")
            .field("object_types", &self.object_types.len())
            .field("union_types", &self.union_types.len())
            .field("enum_string_types", &self.enum_string_types.len())
            .field("pattern_string_types", &self.pattern_string_types.len())
            .field("named_scalar_types", &self.named_scalar_types.len())
            .field("resource_collections", &self.resource_collections.len())
            .field("methods", &self.methods.len())
            .field("resources", &self.resources.len())
            .field("file_producers", &self.file_producers.len())
            .finish()
    }
}
