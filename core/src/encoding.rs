//! Parameter encoding onto a request in progress.
//!
//! Body parameters and URL parameters are encoded independently: a single
//! request may carry a JSON body and a query string at the same time.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::builder::RequestDraft;
use crate::endpoint::{ParameterEncoding, Parameters};
use crate::error::BuildError;
use crate::http::{header, set_header};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Convert any serializable value into a parameter set.
///
/// Fails when the value does not serialize, or serializes to something other
/// than a JSON object.
pub fn parameters<T: Serialize>(value: &T) -> Result<Parameters, BuildError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(BuildError::Encoding(format!(
            "expected a key/value object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(BuildError::Encoding(e.to_string())),
    }
}

/// Encode body and URL parameters onto `draft`.
///
/// `body` goes through `encoding`; `url` is always appended to the query.
pub fn encode_parameters(
    draft: &mut RequestDraft,
    body: Option<&Parameters>,
    encoding: ParameterEncoding,
    url: Option<&Parameters>,
) -> Result<(), BuildError> {
    if let Some(params) = body {
        match encoding {
            ParameterEncoding::JsonBody => encode_json_body(draft, params)?,
            ParameterEncoding::FormBody => encode_form_body(draft, params),
            ParameterEncoding::UrlQuery => encode_query(draft, params)?,
        }
    }
    if let Some(params) = url {
        encode_query(draft, params)?;
    }
    Ok(())
}

fn encode_json_body(draft: &mut RequestDraft, params: &Parameters) -> Result<(), BuildError> {
    let bytes = serde_json::to_vec(params).map_err(|e| BuildError::Encoding(e.to_string()))?;
    draft.body = Some(bytes);
    set_default_content_type(draft, JSON_CONTENT_TYPE);
    Ok(())
}

fn encode_form_body(draft: &mut RequestDraft, params: &Parameters) {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, &query_value(value));
    }
    draft.body = Some(serializer.finish().into_bytes());
    set_default_content_type(draft, FORM_CONTENT_TYPE);
}

fn encode_query(draft: &mut RequestDraft, params: &Parameters) -> Result<(), BuildError> {
    if params.is_empty() {
        return Ok(());
    }
    if draft.url.cannot_be_a_base() {
        return Err(BuildError::Encoding(format!(
            "cannot append query parameters to `{}`",
            draft.url
        )));
    }
    {
        let mut pairs = draft.url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, &query_value(value));
        }
    }
    set_default_content_type(draft, FORM_CONTENT_TYPE);
    Ok(())
}

fn set_default_content_type(draft: &mut RequestDraft, value: &str) {
    if header(&draft.headers, CONTENT_TYPE).is_none() {
        set_header(&mut draft.headers, CONTENT_TYPE, value);
    }
}

/// Render a parameter value for a query string or form body.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
