//! Request builder modules, one per resource.

use std::sync::Arc;

use eyre::{Result, bail};
use indexmap::IndexMap;
use vrap_codegen::{
    Renderer,
    builder::CodeBuilder,
    language::TypeMapper,
    naming::{request_builder_name, resource_method_name},
};
use vrap_core::TemplateFile;
use vrap_model::{
    AnyType, ApiModel, Method, QueryParameter, ResourceInfo, ScalarType, StringTypeKind,
    SubResource, TypeRef, UriTemplate,
};

use super::GENERATED_HEADER;
use crate::{
    imports::ImportSet,
    layout::{PackageLayout, relative_import},
    naming::PY_NAMING,
    type_mapper::PythonTypeMapper,
};

/// Renders the request builder class of a resource.
///
/// The builder stores the URI variables collected on the way down,
/// exposes one accessor per child resource and one function per HTTP
/// method.
pub struct RequestBuilderRenderer {
    model: Arc<ApiModel>,
    layout: PackageLayout,
}

impl RequestBuilderRenderer {
    pub fn new(model: Arc<ApiModel>, layout: PackageLayout) -> Self {
        Self { model, layout }
    }

    fn imports(&self, package: &[String], resource: &ResourceInfo) -> Result<ImportSet> {
        let mut imports = ImportSet::new();
        imports.import("typing");

        let referenced = resource.methods.iter().flat_map(|method| {
            method
                .body
                .iter()
                .chain(method.query_parameters.iter().map(|p| &p.type_ref))
                .chain(method.responses.iter().filter_map(|r| r.body.as_ref()))
        });
        for type_ref in referenced {
            if let Some(name) = type_ref.named() {
                let Some(ty) = self.model.type_by_name(name) else {
                    bail!("unknown type '{}' referenced by '{}'", name, resource.full_uri);
                };
                imports.import_from(relative_import(package, &self.layout.model_module(ty)), name);
            }
        }

        for child in &resource.sub_resources {
            import_builder(&mut imports, &self.layout, package, &child.full_uri);
        }
        Ok(imports)
    }

    fn push_method(&self, builder: &mut CodeBuilder, full_uri: &UriTemplate, method: &Method) {
        let mapper = PythonTypeMapper::direct();
        let name = method.method.as_str();
        let handlers = self.response_handlers(method);

        let mut return_type = method
            .return_type()
            .map(|t| mapper.map_type(t))
            .unwrap_or_else(|| "None".to_string());
        if return_type != "None" && handlers.contains_key(&ResponseHandler::ReturnNone) {
            return_type = format!("typing.Optional[{}]", return_type);
        }

        let (params, patterns): (Vec<&QueryParameter>, Vec<&QueryParameter>) = method
            .query_parameters
            .iter()
            .partition(|p| !p.is_pattern());

        builder
            .push_line(&format!("def {}(", name))
            .push_indent()
            .push_line("self,");
        if let Some(body) = &method.body {
            builder.push_line(&format!("body: {},", mapper.map_type(body)));
        }
        builder.push_line("*,");
        for param in &params {
            let arg = PY_NAMING.field_name(&param.name);
            if param.required {
                builder.push_line(&format!("{}: {},", arg, mapper.map_type(&param.type_ref)));
            } else {
                builder.push_line(&format!(
                    "{}: {} = None,",
                    arg,
                    mapper.map_optional(&param.type_ref)
                ));
            }
        }
        if !patterns.is_empty() {
            builder.push_line("extra_params: typing.Optional[typing.Dict[str, typing.Any]] = None,");
        }
        builder
            .push_line("headers: typing.Optional[typing.Dict[str, str]] = None,")
            .push_line("options: typing.Optional[typing.Dict[str, typing.Any]] = None,")
            .push_dedent()
            .push_line(&format!(") -> {}:", return_type))
            .push_indent();

        if let Some(description) = &method.description {
            builder.push_docstring(description);
        }
        let entries: Vec<String> = params
            .iter()
            .map(|p| format!("\"{}\": {}", p.name, PY_NAMING.field_name(&p.name)))
            .collect();
        let params_expr = format!("{{{}}}", entries.join(", "));
        if !patterns.is_empty() {
            builder
                .push_line(&format!("params = {}", params_expr))
                .push_line("if extra_params:")
                .push_indent()
                .push_line("params.update(extra_params)")
                .push_dedent();
        }
        builder
            .push_line("headers = {} if headers is None else headers")
            .push_line(&format!("response = self._client._{}(", name))
            .push_indent()
            .push_line(&format!("endpoint=f\"{}\",", endpoint(full_uri)));
        if patterns.is_empty() {
            builder.push_line(&format!("params={},", params_expr));
        } else {
            builder.push_line("params=params,");
        }
        if let Some(body) = &method.body {
            builder.push_line(&self.body_argument(body));
        }
        builder
            .push_line("headers=headers,")
            .push_line("options=options,")
            .push_dedent()
            .push_line(")");

        for (index, (handler, statuses)) in handlers.iter().enumerate() {
            let keyword = if index == 0 { "if" } else { "elif" };
            let condition = match statuses.as_slice() {
                [status] => format!("== {}", status),
                _ => {
                    let statuses: Vec<_> = statuses.iter().map(u16::to_string).collect();
                    format!("in ({})", statuses.join(", "))
                }
            };
            builder
                .push_line(&format!("{} response.status_code {}:", keyword, condition))
                .push_indent();
            handler.push_into(builder);
            builder.push_dedent();
        }
        builder
            .push_line("raise ValueError(\"Unhandled status code %s\", response.status_code)")
            .push_dedent();
    }

    /// Response handlers in declaration order, each with its status codes.
    fn response_handlers(&self, method: &Method) -> IndexMap<ResponseHandler, Vec<u16>> {
        let mut handlers: IndexMap<ResponseHandler, Vec<u16>> = IndexMap::new();
        for response in &method.responses {
            let handler = match (&response.body, response.is_success()) {
                (None, _) => ResponseHandler::ReturnNone,
                (Some(TypeRef::Named(name)), true) => ResponseHandler::Deserialize(name.clone()),
                (Some(TypeRef::Array(inner)), true) => match inner.as_ref() {
                    TypeRef::Named(name) => ResponseHandler::DeserializeList(name.clone()),
                    _ => ResponseHandler::ReturnJson,
                },
                (Some(_), true) => ResponseHandler::ReturnJson,
                (Some(TypeRef::Named(name)), false) => ResponseHandler::Raise(name.clone()),
                (Some(_), false) => ResponseHandler::RaiseJson,
            };
            handlers.entry(handler).or_default().push(response.status);
        }
        handlers
    }

    fn body_argument(&self, body: &TypeRef) -> String {
        match body {
            TypeRef::Scalar(ScalarType::File) => "data=body.read(),".to_string(),
            TypeRef::Named(name) => match self.model.type_by_name(name) {
                Some(AnyType::Object(object)) if !object.is_map() => {
                    "json=body.serialize(),".to_string()
                }
                Some(AnyType::String(string)) if string.kind() == StringTypeKind::Enum => {
                    "json=body.value,".to_string()
                }
                _ => "json=body,".to_string(),
            },
            _ => "json=body,".to_string(),
        }
    }
}

impl Renderer<ResourceInfo> for RequestBuilderRenderer {
    fn render(&self, resource: &ResourceInfo) -> Result<TemplateFile> {
        let module = self.layout.request_builder_module(&resource.full_uri);
        let package = &module[..module.len() - 1];
        let imports = self.imports(package, resource)?;
        let variables = resource.full_uri.variables();

        let mut builder = CodeBuilder::python();
        builder.push_lines(GENERATED_HEADER).push_blank();
        imports.push_into(&mut builder);
        builder
            .push_blank()
            .push_line("if typing.TYPE_CHECKING:")
            .push_indent()
            .push_line(&format!(
                "from {} import BaseClient",
                relative_import(package, &self.layout.base_client_module())
            ))
            .push_dedent()
            .push_blank()
            .push_blank()
            .push_line(&format!("class {}:", request_builder_name(&resource.full_uri)))
            .push_indent();
        if let Some(description) = &resource.description {
            builder.push_docstring(description);
        }

        builder.push_blank().push_line("_client: \"BaseClient\"");
        for variable in &variables {
            builder.push_line(&format!("_{}: str", PY_NAMING.field_name(variable)));
        }

        builder
            .push_blank()
            .push_line("def __init__(")
            .push_indent()
            .push_line("self,");
        for variable in &variables {
            builder.push_line(&format!("{}: str,", PY_NAMING.field_name(variable)));
        }
        builder
            .push_line("client: \"BaseClient\",")
            .push_dedent()
            .push_line("):")
            .push_indent();
        for variable in &variables {
            let name = PY_NAMING.field_name(variable);
            builder.push_line(&format!("self._{} = {}", name, name));
        }
        builder.push_line("self._client = client").push_dedent();

        for child in &resource.sub_resources {
            builder.push_blank();
            push_accessor(&mut builder, child, &variables, "self._client");
        }
        for method in &resource.methods {
            builder.push_blank();
            self.push_method(&mut builder, &resource.full_uri, method);
        }

        Ok(TemplateFile::new(
            self.layout.module_path(&module),
            builder.build(),
        ))
    }
}

/// What a method does for a group of status codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ResponseHandler {
    ReturnNone,
    ReturnJson,
    Deserialize(String),
    DeserializeList(String),
    Raise(String),
    RaiseJson,
}

impl ResponseHandler {
    fn push_into(&self, builder: &mut CodeBuilder) {
        match self {
            Self::ReturnNone => {
                builder.push_line("return None");
            }
            Self::ReturnJson => {
                builder.push_line("return response.json()");
            }
            Self::Deserialize(name) => {
                builder.push_line(&format!("return {}.deserialize(response.json())", name));
            }
            Self::DeserializeList(name) => {
                builder.push_line(&format!(
                    "return [{}.deserialize(item) for item in response.json()]",
                    name
                ));
            }
            Self::Raise(name) => {
                builder
                    .push_line(&format!("obj = {}.deserialize(response.json())", name))
                    .push_line("raise self._client._create_exception(obj, response)");
            }
            Self::RaiseJson => {
                builder.push_line("raise self._client._create_exception(response.json(), response)");
            }
        }
    }
}

/// Import the request builder of `full_uri` into a module of `from_package`.
pub(crate) fn import_builder(
    imports: &mut ImportSet,
    layout: &PackageLayout,
    from_package: &[String],
    full_uri: &UriTemplate,
) {
    imports.import_from(
        relative_import(from_package, &layout.request_builder_module(full_uri)),
        request_builder_name(full_uri),
    );
}

/// Write the accessor returning the builder of a child resource.
///
/// Variables already known to the parent are forwarded from its
/// attributes, the child's own variables become arguments.
pub(crate) fn push_accessor(
    builder: &mut CodeBuilder,
    child: &SubResource,
    parent_variables: &[String],
    client: &str,
) {
    let child_builder = request_builder_name(&child.full_uri);
    let arguments: Vec<String> = child
        .relative_uri
        .variables()
        .iter()
        .map(|v| format!("{}: str", PY_NAMING.field_name(v)))
        .collect();
    let mut signature = vec!["self".to_string()];
    signature.extend(arguments);

    builder
        .push_line(&format!(
            "def {}({}) -> {}:",
            PY_NAMING.field_name(&resource_method_name(&child.relative_uri)),
            signature.join(", "),
            child_builder
        ))
        .push_indent();
    if let Some(description) = &child.description {
        builder.push_docstring(description);
    }
    builder
        .push_line(&format!("return {}(", child_builder))
        .push_indent();
    for variable in child.full_uri.variables() {
        let name = PY_NAMING.field_name(&variable);
        if parent_variables.contains(&variable) {
            builder.push_line(&format!("{}=self._{},", name, name));
        } else {
            builder.push_line(&format!("{}={},", name, name));
        }
    }
    builder
        .push_line(&format!("client={},", client))
        .push_dedent()
        .push_line(")")
        .push_dedent();
}

/// The f-string path of a resource, e.g. `/{self._project_key}/carts`.
fn endpoint(full_uri: &UriTemplate) -> String {
    let mut endpoint = full_uri.as_str().to_string();
    for variable in full_uri.variables() {
        endpoint = endpoint.replace(
            &format!("{{{}}}", variable),
            &format!("{{self._{}}}", PY_NAMING.field_name(&variable)),
        );
    }
    if endpoint.is_empty() {
        endpoint.push('/');
    }
    endpoint
}

#[cfg(test)]
mod tests {
    use vrap_model::Api;

    use super::*;

    const SHOP: &str = r#"
        title = "Shop"

        [[types]]
        kind = "object"
        name = "Cart"
        package = "cart"

        [[types]]
        kind = "object"
        name = "CartDraft"
        package = "cart"

        [[types]]
        kind = "object"
        name = "ErrorResponse"
        package = "error"

        [[resources]]
        relative_uri = "/{projectKey}"

        [[resources.resources]]
        relative_uri = "/carts"
        description = "Carts of a project."

        [[resources.resources.methods]]
        method = "post"
        body = "CartDraft"

        [[resources.resources.methods.responses]]
        status = 201
        body = "Cart"

        [[resources.resources.methods.responses]]
        status = 400
        body = "ErrorResponse"

        [[resources.resources.methods.responses]]
        status = 401
        body = "ErrorResponse"

        [[resources.resources.resources]]
        relative_uri = "/{ID}"

        [[resources.resources.resources.methods]]
        method = "get"
        description = "Get a cart by id."

        [[resources.resources.resources.methods.query_parameters]]
        name = "expand"
        type = "string[]"

        [[resources.resources.resources.methods.query_parameters]]
        name = "/^var[.][a-z]+$/"
        type = "string"

        [[resources.resources.resources.methods.responses]]
        status = 200
        body = "Cart"

        [[resources.resources.resources.methods.responses]]
        status = 404
    "#;

    fn render(uri: &str) -> TemplateFile {
        let api: Api = toml::from_str(SHOP).expect("Failed to parse test api");
        let model = Arc::new(ApiModel::resolve(&api));
        let resource = model
            .resources
            .iter()
            .find(|r| r.full_uri.as_str() == uri)
            .cloned()
            .expect("resource not found");
        RequestBuilderRenderer::new(model, PackageLayout::default())
            .render(&resource)
            .unwrap()
    }

    #[test]
    fn test_collection_builder() {
        let file = render("/{projectKey}/carts");

        assert_eq!(
            file.relative_path(),
            "vrap/client/by_project_key_carts/by_project_key_carts_request_builder.py"
        );
        insta::assert_snapshot!(file.content(), @r#"
        # This file is automatically generated by the vrap code generator.
        # Do not change it manually.

        import typing

        from ...models.cart import Cart, CartDraft
        from ...models.error import ErrorResponse
        from .by_project_key_carts_by_id_request_builder import ByProjectKeyCartsByIDRequestBuilder

        if typing.TYPE_CHECKING:
            from ...base_client import BaseClient


        class ByProjectKeyCartsRequestBuilder:
            """Carts of a project."""

            _client: "BaseClient"
            _project_key: str

            def __init__(
                self,
                project_key: str,
                client: "BaseClient",
            ):
                self._project_key = project_key
                self._client = client

            def with_id(self, id: str) -> ByProjectKeyCartsByIDRequestBuilder:
                return ByProjectKeyCartsByIDRequestBuilder(
                    project_key=self._project_key,
                    id=id,
                    client=self._client,
                )

            def post(
                self,
                body: CartDraft,
                *,
                headers: typing.Optional[typing.Dict[str, str]] = None,
                options: typing.Optional[typing.Dict[str, typing.Any]] = None,
            ) -> Cart:
                headers = {} if headers is None else headers
                response = self._client._post(
                    endpoint=f"/{self._project_key}/carts",
                    params={},
                    json=body.serialize(),
                    headers=headers,
                    options=options,
                )
                if response.status_code == 201:
                    return Cart.deserialize(response.json())
                elif response.status_code in (400, 401):
                    obj = ErrorResponse.deserialize(response.json())
                    raise self._client._create_exception(obj, response)
                raise ValueError("Unhandled status code %s", response.status_code)
        "#);
    }

    #[test]
    fn test_item_builder_method() {
        let file = render("/{projectKey}/carts/{ID}");
        let content = file.content();

        assert!(content.contains("class ByProjectKeyCartsByIDRequestBuilder:\n"));
        assert!(content.contains("        project_key: str,\n        id: str,\n        client: \"BaseClient\",\n"));
        assert!(content.contains(
            "        expand: typing.Optional[typing.List[str]] = None,\n        extra_params: typing.Optional[typing.Dict[str, typing.Any]] = None,\n"
        ));
        assert!(content.contains(") -> typing.Optional[Cart]:\n        \"\"\"Get a cart by id.\"\"\"\n"));
        assert!(content.contains("        params = {\"expand\": expand}\n        if extra_params:\n            params.update(extra_params)\n"));
        assert!(content.contains("endpoint=f\"/{self._project_key}/carts/{self._id}\","));
        assert!(content.contains("        elif response.status_code == 404:\n            return None\n"));
    }

    #[test]
    fn test_unknown_type_fails() {
        let api: Api = toml::from_str(
            r#"
            title = "Shop"

            [[resources]]
            relative_uri = "/carts"

            [[resources.methods]]
            method = "get"

            [[resources.methods.responses]]
            status = 200
            body = "Cart"
            "#,
        )
        .unwrap();
        let model = Arc::new(ApiModel::resolve(&api));
        let resource = model.resources[0].clone();

        let error = RequestBuilderRenderer::new(model, PackageLayout::default())
            .render(&resource)
            .unwrap_err();

        assert_eq!(error.to_string(), "unknown type 'Cart' referenced by '/carts'");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint(&UriTemplate::new("/{projectKey}/products/key={key}")),
            "/{self._project_key}/products/key={self._key}"
        );
        assert_eq!(endpoint(&UriTemplate::new("")), "/");
    }
}
