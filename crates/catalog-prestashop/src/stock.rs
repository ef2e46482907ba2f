//! Stock record discovery and quantity patching.
//!
//! PrestaShop does not embed stock in the product document. Each product has
//! a separate `stock_available` record that is found through a filtered
//! collection query and then edited as a whole document.

use std::borrow::Cow;

use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::PrestashopError;

/// Quantity written to the stock record of every newly created product.
pub const INITIAL_STOCK_QUANTITY: u32 = 1;

/// Hyperlink and identifier of one `stock_available` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLink {
    /// Value of the `xlink:href` attribute, usually an absolute URL.
    pub href: String,
    pub id: String,
}

/// Extracts the first `<stock_available>` entry from a
/// `GET /api/stock_availables?filter[id_product]=..` response.
///
/// # Errors
///
/// - [`PrestashopError::NotFound`] if the collection has no entry.
/// - [`PrestashopError::MalformedResponse`] if the entry lacks its `id` or
///   `xlink:href` attribute.
/// - [`PrestashopError::Xml`] if the body is not well-formed XML.
pub fn parse_stock_link(xml: &str, product_id: i64) -> Result<StockLink, PrestashopError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"stock_available" => {
                let mut href = None;
                let mut id = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"href" => href = Some(value),
                        b"id" => id = Some(value),
                        _ => {}
                    }
                }

                let context = format!("stock lookup for product {product_id}");
                let href = href
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| PrestashopError::malformed(&context, "missing xlink:href attribute"))?;
                let id = id
                    .filter(|i| !i.is_empty())
                    .ok_or_else(|| PrestashopError::malformed(&context, "missing id attribute"))?;
                return Ok(StockLink { href, id });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(PrestashopError::NotFound {
        resource: format!("stock_available for product {product_id}"),
    })
}

/// Rewrites a stock document so its first `<quantity>` element holds
/// `quantity`. Every other node is copied through unchanged.
///
/// # Errors
///
/// - [`PrestashopError::MalformedResponse`] if the document has no
///   `<quantity>` element.
/// - [`PrestashopError::Xml`] if the document is not well-formed XML.
pub fn set_quantity(xml: &str, quantity: u32) -> Result<String, PrestashopError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let value = quantity.to_string();
    let mut in_quantity = false;
    let mut replaced = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if !replaced && e.local_name().as_ref() == b"quantity" => {
                writer.write_event(Event::Start(e)).map_err(write_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&value)))
                    .map_err(write_error)?;
                in_quantity = true;
                replaced = true;
            }
            Event::Empty(e) if !replaced && e.local_name().as_ref() == b"quantity" => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::Start(e)).map_err(write_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&value)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(Cow::Owned(name))))
                    .map_err(write_error)?;
                replaced = true;
            }
            Event::Text(_) | Event::CData(_) if in_quantity => {}
            Event::End(e) if in_quantity => {
                in_quantity = false;
                writer.write_event(Event::End(e)).map_err(write_error)?;
            }
            Event::Eof => break,
            event => writer.write_event(event).map_err(write_error)?,
        }
    }

    if !replaced {
        return Err(PrestashopError::malformed(
            "stock document",
            "missing <quantity> element",
        ));
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| PrestashopError::malformed("stock document", e.to_string()))
}

fn write_error(e: impl std::fmt::Display) -> PrestashopError {
    PrestashopError::XmlSerialize(e.to_string())
}

#[cfg(test)]
#[path = "stock_test.rs"]
mod tests;
