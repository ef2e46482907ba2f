use super::*;

fn full_product() -> CoreProduct {
    CoreProduct {
        id: Some(42),
        name: Some("Espresso Blend 1kg".to_string()),
        price: Some(24.9),
        cost_price: Some(11.25),
        tax_id: Some(3),
        sku: Some("ESP-1KG".to_string()),
        barcode: Some("8412345678905".to_string()),
        description: Some("Dark roast, notes of cocoa".to_string()),
        short_description: Some("Dark roast".to_string()),
        categories: vec!["3".to_string(), "7".to_string()],
        tags: vec!["coffee".to_string()],
        images_base64: vec!["AAEC".to_string()],
    }
}

/// Trimmed-down product document as returned by `POST /api/products`.
const CREATED_PRODUCT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<prestashop xmlns:xlink="http://www.w3.org/1999/xlink">
<product>
<id><![CDATA[42]]></id>
<id_manufacturer><![CDATA[0]]></id_manufacturer>
<id_tax_rules_group xlink:href="https://shop.example.com/api/tax_rule_groups/3"><![CDATA[3]]></id_tax_rules_group>
<reference><![CDATA[ESP-1KG]]></reference>
<ean13><![CDATA[]]></ean13>
<price><![CDATA[24.900000]]></price>
<wholesale_price><![CDATA[11.250000]]></wholesale_price>
<active><![CDATA[1]]></active>
<name><language id="1" xlink:href="https://shop.example.com/api/languages/1"><![CDATA[Espresso Blend 1kg]]></language><language id="2" xlink:href="https://shop.example.com/api/languages/2"><![CDATA[Mezcla Espresso 1kg]]></language></name>
<description><![CDATA[Dark roast]]></description>
<associations>
<categories nodeType="category" api="categories">
<category xlink:href="https://shop.example.com/api/categories/2"><id><![CDATA[2]]></id></category>
<category xlink:href="https://shop.example.com/api/categories/9"><id><![CDATA[9]]></id></category>
</categories>
</associations>
</product>
</prestashop>"#;

#[test]
fn round_trip_preserves_populated_fields() {
    let product = full_product();
    let xml = to_external(&product).expect("serialize");
    let parsed = from_external(&xml).expect("deserialize");

    assert_eq!(parsed.id, Some(42));
    assert_eq!(parsed.name, product.name);
    assert_eq!(parsed.price, product.price);
    assert_eq!(parsed.cost_price, product.cost_price);
    assert_eq!(parsed.tax_id, product.tax_id);
    assert_eq!(parsed.sku, product.sku);
    assert_eq!(parsed.barcode, product.barcode);
    assert_eq!(parsed.description, product.description);
    assert_eq!(parsed.short_description, product.short_description);
    assert_eq!(parsed.categories, product.categories);
    assert!(parsed.tags.is_empty(), "tags never survive the XML schema");
    assert!(parsed.images_base64.is_empty());
}

#[test]
fn round_trip_without_id_yields_no_id() {
    let product = CoreProduct {
        id: None,
        ..full_product()
    };
    let xml = to_external(&product).expect("serialize");
    assert!(!xml.contains("<id>42</id>"));

    let parsed = from_external(&xml).expect("deserialize");
    assert_eq!(parsed.id, None);
}

#[test]
fn round_trip_keeps_surrounding_whitespace() {
    let product = CoreProduct {
        sku: Some(" A ".to_string()),
        description: Some("  <p>x</p>\n".to_string()),
        short_description: Some("\tshort ".to_string()),
        name: Some(" Espresso".to_string()),
        ..full_product()
    };
    let xml = to_external(&product).expect("serialize");
    let parsed = from_external(&xml).expect("deserialize");

    assert_eq!(parsed.sku.as_deref(), Some(" A "));
    assert_eq!(parsed.description.as_deref(), Some("  <p>x</p>\n"));
    assert_eq!(parsed.short_description.as_deref(), Some("\tshort "));
    assert_eq!(parsed.name.as_deref(), Some(" Espresso"));
}

#[test]
fn whitespace_only_text_is_absent() {
    let xml = "<prestashop><product><reference>   </reference>\
               <description>\n</description></product></prestashop>";
    let product = from_external(xml).expect("parse");
    assert_eq!(product.sku, None);
    assert_eq!(product.description, None);
}

#[test]
fn create_payload_never_carries_an_id() {
    let xml = to_create_payload(&full_product()).expect("serialize");
    assert!(!xml.contains("<id>42</id>"), "{xml}");
    assert!(xml.starts_with("<prestashop><product><name>"), "{xml}");
    assert!(
        xml.contains("<category><id>3</id></category>"),
        "category ids are still written: {xml}"
    );
}

#[test]
fn serializes_defaults_for_missing_fields() {
    let xml = to_external(&CoreProduct::default()).expect("serialize");

    assert!(xml.starts_with("<prestashop>"), "unexpected root: {xml}");
    assert!(xml.contains("<price>0.0</price>"), "{xml}");
    assert!(xml.contains("<wholesale_price>0.0</wholesale_price>"), "{xml}");
    assert!(xml.contains("<id_tax_rules_group>1</id_tax_rules_group>"), "{xml}");
    assert!(xml.contains("<active>1</active>"), "{xml}");
    assert!(
        xml.contains(r#"<language id="1">Unnamed product</language>"#),
        "{xml}"
    );
}

#[test]
fn defaults_parse_back_as_zero_and_absent() {
    let xml = to_external(&CoreProduct::default()).expect("serialize");
    let parsed = from_external(&xml).expect("deserialize");

    assert_eq!(parsed.name.as_deref(), Some(PLACEHOLDER_NAME));
    assert_eq!(parsed.price, Some(0.0));
    assert_eq!(parsed.cost_price, Some(0.0));
    assert_eq!(parsed.tax_id, Some(1));
    assert_eq!(parsed.sku, None);
    assert_eq!(parsed.barcode, None);
    assert_eq!(parsed.description, None);
    assert_eq!(parsed.short_description, None);
}

#[test]
fn active_is_forced_on() {
    let xml = to_external(&full_product()).expect("serialize");
    assert!(xml.contains("<active>1</active>"));
}

#[test]
fn categories_serialize_in_order() {
    let xml = to_external(&full_product()).expect("serialize");
    assert!(
        xml.contains(
            "<associations><categories><category><id>3</id></category><category><id>7</id></category></categories></associations>"
        ),
        "{xml}"
    );
}

#[test]
fn associations_omitted_without_categories() {
    let product = CoreProduct {
        categories: Vec::new(),
        ..full_product()
    };
    let xml = to_external(&product).expect("serialize");
    assert!(!xml.contains("<associations"), "{xml}");
}

#[test]
fn parses_webservice_response_with_cdata_and_links() {
    let product = from_external(CREATED_PRODUCT_XML).expect("parse created product");

    assert_eq!(product.id, Some(42));
    assert_eq!(product.name.as_deref(), Some("Espresso Blend 1kg"));
    assert_eq!(product.price, Some(24.9));
    assert_eq!(product.cost_price, Some(11.25));
    assert_eq!(product.tax_id, Some(3));
    assert_eq!(product.sku.as_deref(), Some("ESP-1KG"));
    assert_eq!(product.barcode, None, "empty CDATA is treated as absent");
    assert_eq!(product.description.as_deref(), Some("Dark roast"));
    assert_eq!(product.short_description, None);
    assert_eq!(product.categories, vec!["2".to_string(), "9".to_string()]);
}

#[test]
fn localized_descriptions_resolve_default_language() {
    let xml = r#"<prestashop xmlns:xlink="http://www.w3.org/1999/xlink">
<product>
<id><![CDATA[5]]></id>
<description>
  <language id="2" xlink:href="https://shop.example.com/api/languages/2"><![CDATA[Tueste oscuro]]></language>
  <language id="1" xlink:href="https://shop.example.com/api/languages/1"><![CDATA[<p>Long</p>]]></language>
</description>
<description_short><language id="1">Short</language></description_short>
</product>
</prestashop>"#;
    let product = from_external(xml).expect("parse localized descriptions");

    assert_eq!(product.id, Some(5));
    assert_eq!(product.description.as_deref(), Some("<p>Long</p>"));
    assert_eq!(product.short_description.as_deref(), Some("Short"));
}

#[test]
fn localized_description_without_default_language_is_absent() {
    let xml = r#"<prestashop><product><description><language id="2">Largo</language></description>
<description_short><language id="1"/></description_short></product></prestashop>"#;
    let product = from_external(xml).expect("parse");
    assert_eq!(product.description, None);
    assert_eq!(product.short_description, None);
}

#[test]
fn missing_numeric_fields_default_to_zero() {
    let xml = "<prestashop><product><id>5</id></product></prestashop>";
    let product = from_external(xml).expect("parse");

    assert_eq!(product.id, Some(5));
    assert_eq!(product.price, Some(0.0));
    assert_eq!(product.cost_price, Some(0.0));
    assert_eq!(product.tax_id, Some(0));
    assert_eq!(product.name, None);
    assert!(product.categories.is_empty());
}

#[test]
fn empty_id_is_absent() {
    let xml = "<prestashop><product><id></id><price>1.5</price></product></prestashop>";
    let product = from_external(xml).expect("parse");
    assert_eq!(product.id, None);
    assert_eq!(product.price, Some(1.5));
}

#[test]
fn name_in_other_language_only_is_absent() {
    let xml = r#"<prestashop><product><name><language id="2">Nombre</language></name></product></prestashop>"#;
    let product = from_external(xml).expect("parse");
    assert_eq!(product.name, None);
}

#[test]
fn category_entries_without_id_are_skipped() {
    let xml = "<prestashop><product><associations><categories>\
               <category><id>4</id></category>\
               <category></category>\
               <category><id>8</id></category>\
               </categories></associations></product></prestashop>";
    let product = from_external(xml).expect("parse");
    assert_eq!(product.categories, vec!["4".to_string(), "8".to_string()]);
}

#[test]
fn missing_product_element_is_malformed() {
    let result = from_external("<prestashop></prestashop>");
    assert!(
        matches!(result, Err(PrestashopError::MalformedResponse { .. })),
        "expected MalformedResponse, got: {result:?}"
    );
}

#[test]
fn non_numeric_price_is_malformed() {
    let xml = "<prestashop><product><price>twelve</price></product></prestashop>";
    let result = from_external(xml);
    assert!(
        matches!(result, Err(PrestashopError::MalformedResponse { ref context, .. }) if context.contains("price")),
        "expected MalformedResponse for price, got: {result:?}"
    );
}

#[test]
fn broken_xml_surfaces_parse_error() {
    let result = from_external("<prestashop><product><price>1</product>");
    assert!(
        matches!(result, Err(PrestashopError::Xml(_))),
        "expected Xml, got: {result:?}"
    );
}

#[test]
fn format_decimal_keeps_one_decimal_for_integers() {
    assert_eq!(format_decimal(0.0), "0.0");
    assert_eq!(format_decimal(12.0), "12.0");
    assert_eq!(format_decimal(12.5), "12.5");
    assert_eq!(format_decimal(0.1), "0.1");
}
