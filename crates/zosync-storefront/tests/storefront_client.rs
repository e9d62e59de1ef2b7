//! Integration tests for `StorefrontClient` and `export_mapping` using a
//! local `wiremock` server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zosync_core::read_catalog;
use zosync_storefront::{export_mapping, StorefrontClient, StorefrontError};

const TOKEN: &str = "test-token";

fn test_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::new(&server.uri(), TOKEN, 5, "zosync-test/0.1", 0, 0)
        .expect("failed to build test StorefrontClient")
}

fn product(id: i64, published: bool, variant_ids: &[i64]) -> serde_json::Value {
    let variants: Vec<_> = variant_ids
        .iter()
        .map(|vid| {
            json!({
                "id": vid,
                "sku": format!("SKU-{vid}"),
                "price": "1990.00",
                "compare_at_price": "2990.00"
            })
        })
        .collect();
    json!({ "id": id, "title": format!("Product {id}"), "is_published": published, "variants": variants })
}

async fn mount_page(server: &MockServer, page: &str, products: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": products })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn requests_carry_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(header("EasyStore-Access-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server).fetch_products_page(1).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn fetch_all_stops_at_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!([product(1, true, &[11]), product(2, false, &[21])])).await;
    mount_page(&server, "2", json!([product(3, true, &[31, 32])])).await;
    mount_page(&server, "3", json!([])).await;

    let products = test_client(&server)
        .fetch_all_published_products(0)
        .await
        .unwrap();
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn fetch_all_stops_at_page_without_published_products() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!([product(1, true, &[11])])).await;
    mount_page(&server, "2", json!([product(2, false, &[21])])).await;
    // Never requested: the loop stops at page 2.
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [product(3, true, &[31])] })))
        .expect(0)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_all_published_products(0)
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, 1);
}

#[tokio::test]
async fn fetch_product_variants_coerces_prices() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/501.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": {
                "id": 501,
                "variants": [
                    {"id": 1, "sku": "A", "price": "6000.00", "compare_at_price": null},
                    {"id": 2, "sku": "B", "price": 4500, "compare_at_price": "5000"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let variants = test_client(&server).fetch_product_variants(501).await.unwrap();
    let prices: Vec<_> = variants.iter().map(zosync_storefront::StoreVariant::prices).collect();
    assert_eq!(prices[0].price, 6000);
    assert_eq!(prices[0].compare_at_price, None);
    assert_eq!(prices[1].price, 4500);
    assert_eq!(prices[1].compare_at_price, Some(5000));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_product_variants(999)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).fetch_product_variants(1).await.unwrap_err();
    assert!(matches!(err, StorefrontError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn update_variant_price_puts_price_payload() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/products/501/variants/1001.json"))
        .and(header("EasyStore-Access-Token", TOKEN))
        .and(body_json(json!({ "variant": { "price": 2243 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 1001 } })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .update_variant_price(501, 1001, 2243, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_variant_price_can_pin_compare_at_price() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/products/501/variants/1001.json"))
        .and(body_json(json!({ "variant": { "price": 2243, "compare_at_price": 2990 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 1001 } })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .update_variant_price(501, 1001, 2243, Some(2990))
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_update_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .update_variant_price(1, 2, 100, None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, StorefrontError::UnexpectedStatus { status: 422, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limited_request_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/7.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": { "id": 7, "variants": [] }
        })))
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&server.uri(), TOKEN, 5, "zosync-test/0.1", 1, 0).unwrap();
    let variants = client.fetch_product_variants(7).await.unwrap();
    assert!(variants.is_empty());
}

#[tokio::test]
async fn export_mapping_writes_catalog_snapshot() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!([product(1, true, &[11, 12])])).await;
    mount_page(&server, "2", json!([])).await;

    let path = std::env::temp_dir().join(format!("zosync-export-{}.csv", uuid::Uuid::new_v4()));
    let rows = export_mapping(&test_client(&server), &path, 0).await.unwrap();
    assert_eq!(rows, 2);

    let file = std::fs::File::open(&path).unwrap();
    let records = read_catalog(file).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sku, "SKU-11");
    assert_eq!(records[0].product_id, 1);
    assert_eq!(records[1].variant_id, 12);
    assert_eq!(records[1].compare_at_price, Some(2990));
}

#[tokio::test]
async fn export_mapping_fails_without_published_variants() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!([])).await;

    let path = std::env::temp_dir().join(format!("zosync-export-{}.csv", uuid::Uuid::new_v4()));
    let err = export_mapping(&test_client(&server), &path, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::NoPublishedVariants), "got: {err:?}");
    assert!(!path.exists());
}
