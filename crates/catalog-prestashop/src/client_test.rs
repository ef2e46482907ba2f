use super::*;

fn test_client(base_url: &str) -> PrestashopClient {
    PrestashopClient::new(&PrestashopConfig::new(base_url, "test-key"))
        .expect("client construction should not fail")
}

#[test]
fn endpoint_appends_below_shop_root() {
    let client = test_client("https://shop.example.com");
    let url = client.endpoint("api/products/12").expect("endpoint");
    assert_eq!(url.as_str(), "https://shop.example.com/api/products/12");
}

#[test]
fn endpoint_keeps_shop_subdirectory() {
    let client = test_client("https://example.com/store/");
    let url = client.endpoint("api/products").expect("endpoint");
    assert_eq!(url.as_str(), "https://example.com/store/api/products");
}

#[test]
fn new_rejects_unparseable_base_url() {
    let result = PrestashopClient::new(&PrestashopConfig::new("not a url", "key"));
    assert!(matches!(result, Err(PrestashopError::InvalidArgument(_))));
}

#[test]
fn page_offset_is_zero_based() {
    assert_eq!(page_offset(1, 20).expect("offset"), 0);
    assert_eq!(page_offset(3, 20).expect("offset"), 40);
    assert_eq!(
        page_offset(u32::MAX, u32::MAX).expect("offset"),
        u64::from(u32::MAX - 1) * u64::from(u32::MAX)
    );
}

#[test]
fn page_offset_rejects_page_zero_and_empty_pages() {
    assert!(matches!(
        page_offset(0, 20),
        Err(PrestashopError::InvalidArgument(_))
    ));
    assert!(matches!(
        page_offset(1, 0),
        Err(PrestashopError::InvalidArgument(_))
    ));
}

#[test]
fn image_file_names_are_one_based_per_product() {
    assert_eq!(image_file_name(42, 1), "product_42_1.jpg");
    assert_eq!(image_file_name(42, 3), "product_42_3.jpg");
}
