//! Extraction against operations loaded from the petstore document.

use http::Method;
use inflector_core::fixtures::PETSTORE_YAML;
use inflector_core::{Contract, ParamValue};
use inflector_extract::{missing_required, ExtractionContext, ParameterExtractor};

fn contract() -> Contract {
    Contract::from_yaml_str(PETSTORE_YAML).expect("petstore fixture loads")
}

#[test]
fn find_by_status_splits_csv() {
    let contract = contract();
    let (operation, params) = contract
        .match_operation(&Method::GET, "/v2/pet/findByStatus")
        .expect("operation matches");

    let ctx = ExtractionContext::builder()
        .uri("/v2/pet/findByStatus?status=available,pending")
        .build()
        .with_path_params(params);
    let args = ParameterExtractor::new(&ctx).extract_all(operation.parameters());

    assert_eq!(
        args.list("status"),
        Some(
            &[
                ParamValue::String("available".to_string()),
                ParamValue::String("pending".to_string()),
            ][..]
        )
    );
}

#[test]
fn get_pet_by_id_reads_path_variable() {
    let contract = contract();
    let (operation, params) = contract
        .match_operation(&Method::GET, "/v2/pet/42")
        .expect("operation matches");

    let ctx = ExtractionContext::builder()
        .uri("/v2/pet/42")
        .build()
        .with_path_params(params);
    let args = ParameterExtractor::new(&ctx).extract_all(operation.parameters());

    assert_eq!(args.i64("petId"), Some(42));
}

#[test]
fn login_reports_every_missing_parameter() {
    let contract = contract();
    let (operation, params) = contract
        .match_operation(&Method::GET, "/v2/user/login")
        .expect("operation matches");

    let ctx = ExtractionContext::builder()
        .uri("/v2/user/login")
        .build()
        .with_path_params(params);
    let args = ParameterExtractor::new(&ctx).extract_all(operation.parameters());
    let missing: Vec<String> = missing_required(operation.parameters(), &args)
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(missing, vec!["username (query)", "password (query)"]);
}

#[test]
fn update_with_form_decodes_fields() {
    let contract = contract();
    let (operation, params) = contract
        .match_operation(&Method::POST, "/v2/pet/9")
        .expect("operation matches");

    let ctx = ExtractionContext::builder()
        .method(Method::POST)
        .uri("/v2/pet/9")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Rex&status=pending")
        .build()
        .with_path_params(params);
    let args = ParameterExtractor::new(&ctx).extract_all(operation.parameters());

    assert_eq!(args.i64("petId"), Some(9));
    assert_eq!(args.string("name"), Some("Rex"));
    assert_eq!(args.string("status"), Some("pending"));
}
