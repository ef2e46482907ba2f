//! Lenient decoding of the webservice's JSON payloads.
//!
//! The JSON output of PrestaShop is loosely typed: numbers arrive as strings
//! (`"12.500000"`), localized fields arrive either as a plain string or as a
//! `[{"id": "1", "value": "..."}]` list, and an empty collection is answered
//! with a bare `[]` instead of `{"products": []}`. The payloads we send back
//! use [`CoreProduct`]'s own field names, so both spellings are accepted.

use catalog_core::CoreProduct;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::document::DEFAULT_LANGUAGE_ID;
use crate::error::PrestashopError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireProduct {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(deserialize_with = "localized_text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    price: Option<f64>,
    #[serde(alias = "wholesale_price", deserialize_with = "lenient_f64")]
    cost_price: Option<f64>,
    #[serde(alias = "id_tax_rules_group", deserialize_with = "lenient_i64")]
    tax_id: Option<i64>,
    #[serde(alias = "reference", deserialize_with = "localized_text")]
    sku: Option<String>,
    #[serde(alias = "ean13", deserialize_with = "localized_text")]
    barcode: Option<String>,
    #[serde(deserialize_with = "localized_text")]
    description: Option<String>,
    #[serde(alias = "description_short", deserialize_with = "localized_text")]
    short_description: Option<String>,
    #[serde(deserialize_with = "id_list")]
    categories: Vec<String>,
    associations: Option<WireAssociations>,
    tags: Vec<String>,
    images_base64: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireAssociations {
    #[serde(deserialize_with = "id_list")]
    categories: Vec<String>,
}

/// Decodes a JSON product object into a [`CoreProduct`].
///
/// Categories listed under `associations.categories` are used when the
/// top-level `categories` list is empty.
///
/// # Errors
///
/// Returns [`PrestashopError::Json`] if a field has an unusable shape, e.g.
/// a price that is not a number.
pub fn product_from_json(value: Value, context: &str) -> Result<CoreProduct, PrestashopError> {
    let wire: WireProduct =
        serde_json::from_value(value).map_err(|e| PrestashopError::Json {
            context: context.to_owned(),
            source: e,
        })?;

    let categories = if wire.categories.is_empty() {
        wire.associations.map(|a| a.categories).unwrap_or_default()
    } else {
        wire.categories
    };

    Ok(CoreProduct {
        id: wire.id,
        name: wire.name,
        price: wire.price,
        cost_price: wire.cost_price,
        tax_id: wire.tax_id,
        sku: wire.sku,
        barcode: wire.barcode,
        description: wire.description,
        short_description: wire.short_description,
        categories,
        tags: wire.tags,
        images_base64: wire.images_base64,
    })
}

/// Takes the single entity stored under `key`, e.g. `{"product": {...}}`.
pub(crate) fn take_entity(
    mut body: Value,
    key: &str,
    context: &str,
) -> Result<Value, PrestashopError> {
    match body.get_mut(key).map(Value::take) {
        Some(entity) if entity.is_object() => Ok(entity),
        _ => Err(PrestashopError::malformed(
            context,
            format!("response has no '{key}' object"),
        )),
    }
}

/// Returns the entries of the collection stored under `key`.
///
/// A bare array body, a missing key or `null` all count as an empty
/// collection.
pub(crate) fn collection<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Reads an identifier that may be a JSON number or a numeric string.
pub(crate) fn id_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders an identifier as a string, whichever JSON type it arrived as.
pub(crate) fn id_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("'{s}' is not a number: {e}"))),
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => id_as_i64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {value}"))),
    }
}

fn localized_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(languages)) => languages
            .iter()
            .find(|l| l.get("id").and_then(id_as_string).as_deref() == Some(DEFAULT_LANGUAGE_ID))
            .and_then(|l| l.get("value"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        None | Some(Value::Null) => None,
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected text or a language list, got {other}"
            )))
        }
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(_) => entry.get("id").and_then(id_as_string),
            other => id_as_string(other),
        })
        .collect())
}
