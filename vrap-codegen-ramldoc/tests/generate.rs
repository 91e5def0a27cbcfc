//! End-to-end generation of the RAML documentation into a temporary directory.

use std::sync::Arc;

use vrap_codegen::{
    GenerationOptions,
    testing::{generate_to_temp, read_generated},
};
use vrap_model::{Api, ApiModel};

const SHOP: &str = r#"
    title = "Shop"

    [[types]]
    kind = "object"
    name = "Cart"
    package = "Cart"

    [[types.properties]]
    name = "cartState"
    type = "CartState"

    [[types]]
    kind = "string"
    name = "CartState"
    package = "Cart"
    enum = ["Active", "Merged"]

    [[types]]
    kind = "union"
    name = "CartReference"
    package = "Cart"
    variants = ["Cart"]

    [[types]]
    kind = "string"
    name = "Locale"
    pattern = "^[a-z]{2}$"

    [[types]]
    kind = "string"
    name = "CountryCode"

    [[resources]]
    relative_uri = "/carts"

    [[resources.methods]]
    method = "get"

    [[resources.methods.responses]]
    status = 200
    body = "Cart[]"

    [[resources.resources]]
    relative_uri = "/{ID}"

    [[resources.resources.methods]]
    method = "delete"

    [[resources.resources.methods.responses]]
    status = 200
    body = "Cart"
"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_generates_documentation_tree() {
    let api: Api = toml::from_str(SHOP).expect("Failed to parse test api");
    let model = Arc::new(ApiModel::resolve(&api));
    let generators = vrap_codegen_ramldoc::generator_set(&model);

    let (dir, report) = generate_to_temp(
        generators,
        Arc::unwrap_or_clone(model),
        GenerationOptions::default(),
    )
    .await
    .unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    // metadata + 5 types + 1 collection + 2 methods + 2 resources + api.raml
    assert_eq!(report.attempted, 12);

    let root = dir.path();
    for path in [
        "api.raml",
        "types/cart/Cart.raml",
        "types/cart/CartState.raml",
        "types/cart/CartReference.raml",
        "types/Locale.raml",
        "types/CountryCode.raml",
        "resources/carts.raml",
        "resources/carts-by-id.raml",
        "methods/carts-get.raml",
        "methods/carts-by-id-delete.raml",
        "collections/carts.md",
    ] {
        assert!(root.join(path).is_file(), "missing {}", path);
    }

    let api_raml = read_generated(root, "api.raml").unwrap();
    assert!(api_raml.contains("/carts: !include resources/carts.raml\n"));

    let carts = read_generated(root, "resources/carts.raml").unwrap();
    assert!(carts.contains("/{ID}: !include carts-by-id.raml\n"));

    let list = read_generated(root, "methods/carts-get.raml").unwrap();
    assert!(list.contains("        type: array\n        items: Cart\n"));
}
