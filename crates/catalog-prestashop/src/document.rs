//! Model of the PrestaShop webservice product document.
//!
//! ## Observed shape
//!
//! ```xml
//! <prestashop xmlns:xlink="http://www.w3.org/1999/xlink">
//!   <product>
//!     <id><![CDATA[42]]></id>
//!     <id_tax_rules_group xlink:href="..."><![CDATA[1]]></id_tax_rules_group>
//!     <price><![CDATA[12.500000]]></price>
//!     <name><language id="1" xlink:href="..."><![CDATA[Espresso]]></language></name>
//!     <description><language id="1"><![CDATA[<p>Dark roast</p>]]></language></description>
//!     <associations>
//!       <categories nodeType="category" api="categories">
//!         <category xlink:href="..."><id><![CDATA[2]]></id></category>
//!       </categories>
//!     </associations>
//!   </product>
//! </prestashop>
//! ```
//!
//! Descriptions come back either as plain text or with one `<language>` child
//! per shop language, depending on the shop's configuration.
//!
//! Writing goes through serde. Reading walks the event stream with
//! [`read_product`] so element text keeps its surrounding whitespace, which
//! the serde deserializer trims. Scalars are kept as raw text here; defaulting
//! and number parsing live in [`crate::mapper`]. Attributes such as
//! `xlink:href` and every element not modelled below are ignored on read.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::PrestashopError;

/// Language used for every localized field the adapter reads or writes.
pub const DEFAULT_LANGUAGE_ID: &str = "1";

/// The `<prestashop>` wrapper element.
#[derive(Debug, Default, Serialize)]
#[serde(rename = "prestashop")]
pub struct ProductDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductNode>,
}

/// The `<product>` element. Field order is the serialization order.
#[derive(Debug, Default, Serialize)]
pub struct ProductNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wholesale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_tax_rules_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TextField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_short: Option<TextField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associations: Option<Associations>,
}

/// A field with one `<language id="..">` child per shop language.
#[derive(Debug, Default, Serialize)]
pub struct LocalizedText {
    #[serde(rename = "language")]
    pub languages: Vec<LanguageValue>,
}

impl LocalizedText {
    /// Wraps `value` as the only translation, in the default language.
    #[must_use]
    pub fn single(value: &str) -> Self {
        Self {
            languages: vec![LanguageValue {
                id: DEFAULT_LANGUAGE_ID.to_owned(),
                value: Some(value.to_owned()),
            }],
        }
    }

    /// Text for `language_id`, or `None` when that language is missing.
    #[must_use]
    pub fn get(&self, language_id: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|l| l.id == language_id)
            .and_then(|l| l.value.as_deref())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct LanguageValue {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "$text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A text element that is either plain or localized.
#[derive(Debug, Default, Serialize)]
pub struct TextField {
    #[serde(rename = "language", skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageValue>,
    #[serde(rename = "$text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextField {
    #[must_use]
    pub fn plain(value: &str) -> Self {
        Self {
            languages: Vec::new(),
            text: Some(value.to_owned()),
        }
    }

    /// The value in `language_id` when the element is localized, otherwise
    /// its own text.
    #[must_use]
    pub fn resolve(&self, language_id: &str) -> Option<&str> {
        if self.languages.is_empty() {
            return self.text.as_deref();
        }
        self.languages
            .iter()
            .find(|l| l.id == language_id)
            .and_then(|l| l.value.as_deref())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Associations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryList>,
}

#[derive(Debug, Default, Serialize)]
pub struct CategoryList {
    #[serde(rename = "category")]
    pub items: Vec<CategoryRef>,
}

#[derive(Debug, Default, Serialize)]
pub struct CategoryRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Reads the first `<product>` child of the document root.
///
/// Returns `Ok(None)` when the root has no `<product>` child. Text and CDATA
/// inside an element are concatenated verbatim.
///
/// # Errors
///
/// Returns [`PrestashopError::Xml`] if `xml` is not well-formed.
pub fn read_product(xml: &str) -> Result<Option<ProductNode>, PrestashopError> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut node: Option<ProductNode> = None;
    let mut inside_product = false;
    let mut text = String::new();
    let mut language: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if path.len() == 1 && name == "product" && node.is_none() {
                    node = Some(ProductNode::default());
                    inside_product = true;
                }
                if name == "language" {
                    language = language_id(&e)?;
                }
                path.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                if path.len() == 1 && name == "product" && node.is_none() {
                    node = Some(ProductNode::default());
                }
                let id = if name == "language" { language_id(&e)? } else { None };
                path.push(name);
                if inside_product {
                    if let Some(node) = node.as_mut() {
                        assign(node, &path[2..], String::new(), id);
                    }
                }
                path.pop();
            }
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::End(_) => {
                if inside_product && path.len() > 2 {
                    if let Some(node) = node.as_mut() {
                        let id = if path.last().is_some_and(|n| n == "language") {
                            language.take()
                        } else {
                            None
                        };
                        assign(node, &path[2..], std::mem::take(&mut text), id);
                    }
                }
                if path.len() == 2 && inside_product {
                    inside_product = false;
                }
                path.pop();
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(node)
}

/// Stores `text` at `path`, relative to `<product>`. Unmodelled paths are
/// dropped.
fn assign(node: &mut ProductNode, path: &[String], text: String, language: Option<String>) {
    let path: Vec<&str> = path.iter().map(String::as_str).collect();

    match path.as_slice() {
        ["id"] => node.id = Some(text),
        ["price"] => node.price = Some(text),
        ["wholesale_price"] => node.wholesale_price = Some(text),
        ["id_tax_rules_group"] => node.id_tax_rules_group = Some(text),
        ["reference"] => node.reference = Some(text),
        ["ean13"] => node.ean13 = Some(text),
        ["active"] => node.active = Some(text),
        ["name", "language"] => node
            .name
            .get_or_insert_with(LocalizedText::default)
            .languages
            .push(translation(language, text)),
        ["description"] => {
            node.description.get_or_insert_with(TextField::default).text = Some(text);
        }
        ["description", "language"] => node
            .description
            .get_or_insert_with(TextField::default)
            .languages
            .push(translation(language, text)),
        ["description_short"] => {
            node.description_short
                .get_or_insert_with(TextField::default)
                .text = Some(text);
        }
        ["description_short", "language"] => node
            .description_short
            .get_or_insert_with(TextField::default)
            .languages
            .push(translation(language, text)),
        ["associations", "categories", "category", "id"] => node
            .associations
            .get_or_insert_with(Associations::default)
            .categories
            .get_or_insert_with(CategoryList::default)
            .items
            .push(CategoryRef { id: Some(text) }),
        _ => {}
    }
}

fn translation(language: Option<String>, text: String) -> LanguageValue {
    LanguageValue {
        id: language.unwrap_or_default(),
        value: Some(text),
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn language_id(e: &BytesStart<'_>) -> Result<Option<String>, PrestashopError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == b"id" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
