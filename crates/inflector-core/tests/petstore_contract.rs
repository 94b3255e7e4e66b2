//! Contract loading and route matching against the petstore document.

use http::{Method, StatusCode};
use inflector_core::example::ExampleSynthesizer;
use inflector_core::fixtures::PETSTORE_YAML;
use inflector_core::Contract;
use proptest::prelude::*;

fn contract() -> Contract {
    Contract::from_yaml_str(PETSTORE_YAML).expect("petstore fixture loads")
}

#[test]
fn operations_keep_declaration_order() {
    let contract = contract();
    let ids: Vec<&str> = contract
        .operations()
        .iter()
        .filter_map(|operation| operation.operation_id())
        .collect();

    assert_eq!(
        ids,
        vec![
            "addPet",
            "findPetsByStatus",
            "getPetById",
            "updatePetWithForm",
            "deletePet",
            "getInventory",
            "loginUser",
        ]
    );
}

#[test]
fn literal_segment_beats_template() {
    let contract = contract();
    let (operation, params) = contract
        .match_operation(&Method::GET, "/v2/pet/findByStatus")
        .expect("operation matches");

    assert_eq!(operation.operation_id(), Some("findPetsByStatus"));
    assert!(params.is_empty());
}

#[test]
fn fallback_responses() {
    let contract = contract();

    let login = contract
        .find_by_operation_id("loginUser")
        .expect("loginUser declared");
    let (status, _) = login.fallback_response().expect("default response");
    assert_eq!(status, StatusCode::OK);

    let delete = contract
        .find_by_operation_id("deletePet")
        .expect("deletePet declared");
    assert!(delete.fallback_response().is_none());
}

#[test]
fn every_declared_schema_synthesizes_deterministically() {
    let contract = contract();
    let synthesizer = ExampleSynthesizer::new(contract.models());

    for operation in contract.operations() {
        for response in operation.responses().values() {
            if let Some(schema) = &response.schema {
                let first = synthesizer.synthesize(schema);
                assert!(first.is_some(), "{} has a synthesizable schema", operation.key());
                assert_eq!(first, synthesizer.synthesize(schema));
            }
        }
    }
}

proptest! {
    #[test]
    fn any_pet_id_reaches_get_pet_by_id(id in any::<i64>()) {
        let contract = contract();
        let path = format!("/v2/pet/{id}");
        let (operation, params) = contract
            .match_operation(&Method::GET, &path)
            .expect("operation matches");

        prop_assert_eq!(operation.operation_id(), Some("getPetById"));
        prop_assert_eq!(params.get("petId"), Some(&id.to_string()));
    }

    #[test]
    fn paths_outside_base_path_never_match(segment in "[a-z]{1,12}") {
        let contract = contract();
        let path = format!("/{segment}/pet/1");
        prop_assert!(contract.match_operation(&Method::GET, &path).is_none());
    }
}
