//! Canonical handler names.
//!
//! When an application registers handlers by name instead of by route, the
//! binder looks them up under a controller name and a method name derived
//! from the operation:
//!
//! | Operation | Method name |
//! |-----------|-------------|
//! | `operationId: getPetById` | `getPetById` |
//! | `operationId: get-pet.byId` | `get_pet_byId` |
//! | `GET /pets/{petId}` (no id) | `petsPetIdGet` |
//! | `GET /` (no id) | `rootGet` |
//!
//! The controller comes from `x-swagger-router-controller`, then the first
//! tag, then `Default`, qualified with the controller package.

use inflector_core::Operation;

/// Vendor extension naming the controller of an operation.
pub const ROUTER_CONTROLLER_EXTENSION: &str = "x-swagger-router-controller";

/// Controller used when an operation has neither extension nor tags.
pub const DEFAULT_CONTROLLER: &str = "Default";

/// Suffix tried after the bare controller name.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Returns the handler method name of an operation.
#[must_use]
pub fn method_name(operation: &Operation) -> String {
    match operation.operation_id() {
        Some(id) if !id.is_empty() => sanitize(id),
        _ => path_method_name(operation.path(), operation.method().as_str()),
    }
}

/// Replaces every non-alphanumeric character with `_`.
#[must_use]
pub fn sanitize(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Derives a camel-case method name from a path template and verb.
///
/// ```
/// use inflector_server::naming::path_method_name;
///
/// assert_eq!(path_method_name("/pets/{petId}", "GET"), "petsPetIdGet");
/// assert_eq!(path_method_name("/", "POST"), "rootPost");
/// ```
#[must_use]
pub fn path_method_name(path: &str, verb: &str) -> String {
    let words: Vec<&str> = path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let mut name = String::new();
    match words.split_first() {
        Some((first, rest)) => {
            name.push_str(&first.to_ascii_lowercase());
            for word in rest {
                name.push_str(&capitalize(word));
            }
        }
        None => name.push_str("root"),
    }
    name.push_str(&capitalize(&verb.to_ascii_lowercase()));
    name
}

/// Returns the fully qualified controller name of an operation.
#[must_use]
pub fn controller_name(operation: &Operation, controller_package: &str) -> String {
    let declared = operation
        .extension(ROUTER_CONTROLLER_EXTENSION)
        .and_then(|value| value.as_str())
        .filter(|name| !name.is_empty());

    if let Some(name) = declared {
        if name.contains('.') {
            return name.to_string();
        }
        return qualify(controller_package, name);
    }

    match operation.tags().first().filter(|tag| !tag.is_empty()) {
        Some(tag) => qualify(controller_package, &capitalize(&sanitize(tag))),
        None => qualify(controller_package, DEFAULT_CONTROLLER),
    }
}

/// Returns the controller names tried in order: bare, then suffixed.
#[must_use]
pub fn controller_candidates(operation: &Operation, controller_package: &str) -> [String; 2] {
    let controller = controller_name(operation, controller_package);
    let suffixed = format!("{controller}{CONTROLLER_SUFFIX}");
    [controller, suffixed]
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    const PACKAGE: &str = "io.swagger.sample.controllers";

    // ==================== Method Name Tests ====================

    #[test]
    fn test_operation_id_wins() {
        let op = Operation::builder(Method::GET, "/pets/{petId}")
            .operation_id("getPetById")
            .build();
        assert_eq!(method_name(&op), "getPetById");
    }

    #[test]
    fn test_operation_id_is_sanitized() {
        let op = Operation::builder(Method::GET, "/pets")
            .operation_id("list-pets.v2")
            .build();
        assert_eq!(method_name(&op), "list_pets_v2");
    }

    #[test]
    fn test_path_derived_names() {
        let op = Operation::builder(Method::GET, "/pets/{petId}").build();
        assert_eq!(method_name(&op), "petsPetIdGet");

        assert_eq!(path_method_name("/", "GET"), "rootGet");
        assert_eq!(path_method_name("/store/order-items", "DELETE"), "storeOrderItemsDelete");
        assert_eq!(path_method_name("/Users/{id}/avatar", "put"), "usersIdAvatarPut");
    }

    // ==================== Controller Name Tests ====================

    #[test]
    fn test_router_controller_extension() {
        let op = Operation::builder(Method::GET, "/pets")
            .extension(ROUTER_CONTROLLER_EXTENSION, json!("PetController"))
            .tag("pet")
            .build();
        assert_eq!(
            controller_name(&op, PACKAGE),
            "io.swagger.sample.controllers.PetController"
        );

        let qualified = Operation::builder(Method::GET, "/pets")
            .extension(ROUTER_CONTROLLER_EXTENSION, json!("com.acme.Pets"))
            .build();
        assert_eq!(controller_name(&qualified, PACKAGE), "com.acme.Pets");
    }

    #[test]
    fn test_first_tag_capitalized() {
        let op = Operation::builder(Method::GET, "/pets")
            .tag("pet")
            .tag("store")
            .build();
        assert_eq!(controller_name(&op, PACKAGE), "io.swagger.sample.controllers.Pet");
    }

    #[test]
    fn test_default_controller() {
        let op = Operation::builder(Method::GET, "/pets").build();
        assert_eq!(controller_name(&op, PACKAGE), "io.swagger.sample.controllers.Default");
        assert_eq!(controller_name(&op, ""), "Default");
    }

    #[test]
    fn test_candidates_order() {
        let op = Operation::builder(Method::GET, "/pets").tag("pet").build();
        let [bare, suffixed] = controller_candidates(&op, "app");
        assert_eq!(bare, "app.Pet");
        assert_eq!(suffixed, "app.PetController");
    }
}
