//! Test fixtures for Inflector development and testing.
//!
//! This module provides a pre-built petstore contract, both as a Swagger 2.0
//! document and assembled with builders, for tests across the workspace.
//!
//! # Example
//!
//! ```
//! use inflector_core::fixtures;
//! use http::Method;
//!
//! let contract = fixtures::petstore_contract();
//! assert!(contract.get_operation(&Method::GET, "/pet/{petId}").is_some());
//! ```

use crate::contract::{
    CollectionFormat, Contract, Operation, Parameter, ParameterLocation, PrimitiveType, ResponseSpec,
};
use crate::schema::Schema;
use http::Method;
use serde_json::json;

/// A petstore contract in Swagger 2.0 YAML form.
pub const PETSTORE_YAML: &str = r##"
swagger: "2.0"
info:
  title: Swagger Petstore
  version: 1.0.0
basePath: /v2
consumes:
  - application/json
produces:
  - application/json
  - application/yaml
paths:
  /pet:
    post:
      tags: [pet]
      operationId: addPet
      parameters:
        - in: body
          name: body
          required: true
          schema:
            $ref: "#/definitions/Pet"
      responses:
        "200":
          description: successful operation
          schema:
            $ref: "#/definitions/Pet"
        "405":
          description: Invalid input
  /pet/findByStatus:
    get:
      tags: [pet]
      operationId: findPetsByStatus
      parameters:
        - name: status
          in: query
          required: true
          type: array
          items:
            type: string
          collectionFormat: csv
      responses:
        "200":
          description: successful operation
          schema:
            type: array
            items:
              $ref: "#/definitions/Pet"
        "400":
          description: Invalid status value
  /pet/{petId}:
    get:
      tags: [pet]
      operationId: getPetById
      parameters:
        - name: petId
          in: path
          required: true
          type: integer
          format: int64
      responses:
        "200":
          description: successful operation
          schema:
            $ref: "#/definitions/Pet"
        "404":
          description: Pet not found
    post:
      tags: [pet]
      operationId: updatePetWithForm
      consumes:
        - application/x-www-form-urlencoded
      parameters:
        - name: petId
          in: path
          required: true
          type: integer
          format: int64
        - name: name
          in: formData
          required: false
          type: string
        - name: status
          in: formData
          required: false
          type: string
      responses:
        "405":
          description: Invalid input
    delete:
      tags: [pet]
      operationId: deletePet
      parameters:
        - name: api_key
          in: header
          required: false
          type: string
        - name: petId
          in: path
          required: true
          type: integer
          format: int64
      responses:
        "400":
          description: Invalid pet value
  /store/inventory:
    get:
      tags: [store]
      operationId: getInventory
      responses:
        "200":
          description: successful operation
          schema:
            type: object
            additionalProperties:
              type: integer
              format: int32
  /user/login:
    get:
      tags: [user]
      operationId: loginUser
      parameters:
        - name: username
          in: query
          required: true
          type: string
        - name: password
          in: query
          required: true
          type: string
          format: password
      responses:
        default:
          description: session token
          schema:
            type: string
            example: token-123
definitions:
  Category:
    type: object
    properties:
      id:
        type: integer
        format: int64
      name:
        type: string
  Tag:
    type: object
    properties:
      id:
        type: integer
        format: int64
      name:
        type: string
  Pet:
    type: object
    required:
      - name
      - photoUrls
    properties:
      id:
        type: integer
        format: int64
      category:
        $ref: "#/definitions/Category"
      name:
        type: string
        example: doggie
      photoUrls:
        type: array
        items:
          type: string
      tags:
        type: array
        items:
          $ref: "#/definitions/Tag"
      status:
        type: string
        enum: [available, pending, sold]
"##;

/// Creates the petstore contract with builders.
///
/// Mirrors the shape of [`PETSTORE_YAML`] without a base path, plus a few
/// operations that exercise every parameter location:
/// - `getPetById` - GET /pet/{petId}
/// - `findPetsByTags` - GET /pet/findByTags (pipes-delimited array)
/// - `addPet` - POST /pet (body)
/// - `uploadFile` - POST /pet/{petId}/uploadImage (file form parameter)
/// - `searchPets` - GET /pets/search (query + header, no responses declared)
#[must_use]
pub fn petstore_contract() -> Contract {
    Contract::builder("Swagger Petstore")
        .version("1.0.0")
        .model("Category", category_schema())
        .model("Pet", pet_schema())
        .operation(
            Operation::builder(Method::GET, "/pet/{petId}")
                .operation_id("getPetById")
                .tag("pet")
                .parameter(Parameter::path("petId", PrimitiveType::Long))
                .response(
                    "200",
                    ResponseSpec::new("successful operation").with_schema(Schema::reference("Pet")),
                )
                .response("404", ResponseSpec::new("Pet not found"))
                .build(),
        )
        .operation(
            Operation::builder(Method::GET, "/pet/findByTags")
                .operation_id("findPetsByTags")
                .tag("pet")
                .parameter(
                    Parameter::array(
                        "tags",
                        ParameterLocation::Query,
                        PrimitiveType::String,
                        Some(CollectionFormat::Pipes),
                    )
                    .required(),
                )
                .response(
                    "200",
                    ResponseSpec::new("successful operation")
                        .with_schema(Schema::array(Schema::reference("Pet"))),
                )
                .build(),
        )
        .operation(
            Operation::builder(Method::POST, "/pet")
                .operation_id("addPet")
                .tag("pet")
                .parameter(Parameter::body("body", Schema::reference("Pet")).required())
                .response("405", ResponseSpec::new("Invalid input"))
                .build(),
        )
        .operation(
            Operation::builder(Method::POST, "/pet/{petId}/uploadImage")
                .operation_id("uploadFile")
                .tag("pet")
                .consumes("application/octet-stream")
                .parameter(Parameter::path("petId", PrimitiveType::Long))
                .parameter(Parameter::file("file"))
                .response(
                    "200",
                    ResponseSpec::new("successful operation").with_schema(Schema::object(vec![
                        ("code", Schema::integer()),
                        ("message", Schema::string()),
                    ])),
                )
                .build(),
        )
        .operation(
            Operation::builder(Method::GET, "/pets/search")
                .operation_id("searchPets")
                .parameter(Parameter::query("id", PrimitiveType::Integer).required())
                .parameter(Parameter::header("X-Token", PrimitiveType::String).required())
                .parameter(Parameter::query("limit", PrimitiveType::Integer))
                .build(),
        )
        .build()
}

/// Schema of the `Category` model.
#[must_use]
pub fn category_schema() -> Schema {
    Schema::object(vec![("id", Schema::long()), ("name", Schema::string())])
}

/// Schema of the `Pet` model.
#[must_use]
pub fn pet_schema() -> Schema {
    Schema::object(vec![
        ("id", Schema::long()),
        ("category", Schema::reference("Category")),
        ("name", Schema::string().with_example(json!("doggie"))),
        ("photoUrls", Schema::array(Schema::string())),
        (
            "status",
            Schema::string().with_enum(vec![json!("available"), json!("pending"), json!("sold")]),
        ),
    ])
    .with_required(vec!["name", "photoUrls"])
}
