//! Per-parameter value extraction.
//!
//! [`ParameterExtractor`] pulls the raw value(s) of each declared parameter
//! from the matching part of the request and coerces them. A repeated scalar
//! form field takes its last value; query and header scalars take their
//! first. The form body and the model body are each decoded at most once per
//! request, on first use.

use crate::coerce::coerce;
use crate::{decode_body, ExtractionContext, FormFields};
use inflector_core::{
    Arguments, MissingParameter, ParamValue, Parameter, ParameterLocation, ParameterType,
};
use serde_json::Value;
use std::cell::OnceCell;

/// Extracts typed parameter values from one request.
///
/// # Example
///
/// ```rust
/// use inflector_core::{Parameter, PrimitiveType};
/// use inflector_extract::{ExtractionContext, ParameterExtractor};
///
/// let ctx = ExtractionContext::builder()
///     .uri("/pet/7?limit=10")
///     .path_param("petId", "7")
///     .build();
/// let parameters = vec![
///     Parameter::path("petId", PrimitiveType::Long),
///     Parameter::query("limit", PrimitiveType::Integer),
/// ];
///
/// let args = ParameterExtractor::new(&ctx).extract_all(&parameters);
/// assert_eq!(args.i64("petId"), Some(7));
/// assert_eq!(args.i32("limit"), Some(10));
/// ```
#[derive(Debug)]
pub struct ParameterExtractor<'a> {
    ctx: &'a ExtractionContext,
    form: OnceCell<FormFields>,
    body: OnceCell<Option<Value>>,
}

impl<'a> ParameterExtractor<'a> {
    /// Creates an extractor over a request.
    #[must_use]
    pub fn new(ctx: &'a ExtractionContext) -> Self {
        Self {
            ctx,
            form: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    /// Extracts every parameter, in declaration order.
    #[must_use]
    pub fn extract_all(&self, parameters: &[Parameter]) -> Arguments {
        Arguments::new(
            parameters
                .iter()
                .map(|parameter| (parameter.name().to_string(), self.extract(parameter)))
                .collect(),
        )
    }

    /// Extracts one parameter.
    ///
    /// Returns `None` when the value is absent or does not coerce.
    #[must_use]
    pub fn extract(&self, parameter: &Parameter) -> Option<ParamValue> {
        let name = parameter.name();
        match (parameter.location(), parameter.param_type()) {
            (ParameterLocation::Body, _) | (_, ParameterType::Body { .. }) => {
                self.body().cloned().map(ParamValue::Model)
            }
            (ParameterLocation::FormData, ParameterType::File) => {
                let body = self.ctx.body();
                (!body.is_empty()).then(|| ParamValue::File(body.clone()))
            }
            (ParameterLocation::FormData, ParameterType::Primitive { .. }) => {
                let values = self.form().values(name);
                coerce(&values[values.len().saturating_sub(1)..], parameter)
            }
            (ParameterLocation::FormData, _) => coerce(&self.form().values(name), parameter),
            (ParameterLocation::Query, _) => coerce(&self.ctx.query_values(name), parameter),
            (ParameterLocation::Header, _) => coerce(&self.ctx.header_values(name), parameter),
            (ParameterLocation::Path, _) => {
                let raw: Vec<&str> = self.ctx.path_param(name).into_iter().collect();
                coerce(&raw, parameter)
            }
        }
    }

    fn form(&self) -> &FormFields {
        self.form.get_or_init(|| {
            FormFields::decode(self.ctx.body()).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "form body did not decode");
                FormFields::default()
            })
        })
    }

    fn body(&self) -> Option<&Value> {
        self.body
            .get_or_init(|| {
                let payload = self.ctx.body();
                if payload.is_empty() {
                    return None;
                }
                let media_type = self.ctx.media_type();
                match decode_body(payload, media_type.as_deref()) {
                    Ok(Value::Null) => None,
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::debug!(error = %e, "request body did not decode");
                        None
                    }
                }
            })
            .as_ref()
    }
}

/// Lists required parameters that have no value, in declaration order.
///
/// `arguments` must come from [`ParameterExtractor::extract_all`] over the
/// same parameter list.
#[must_use]
pub fn missing_required(parameters: &[Parameter], arguments: &Arguments) -> Vec<MissingParameter> {
    parameters
        .iter()
        .enumerate()
        .filter(|(index, parameter)| parameter.is_required() && arguments.at(*index).is_none())
        .map(|(_, parameter)| MissingParameter::new(parameter.name(), parameter.location()))
        .collect()
}
