mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use common::{sized_draft, tee_draft, TestApp};
use serde_json::{json, Value};

const BOUNDARY: &str = "shop-test-boundary";

fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
         filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/admin/products/upload-image")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_admin_product_lifecycle() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let res = app
        .post("/api/admin/products/add", Some(&admin), tee_draft(5))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let product = &res.body["data"];
    assert_eq!(product["price"], json!({ "amount": 50000, "currency": "INR" }));
    assert_eq!(product["salePrice"]["amount"], 45000);
    assert_eq!(product["totalStock"], 5);
    assert_eq!(product["averageReview"], 0.0);
    let id = product["id"].as_str().unwrap().to_string();

    let mut edit = tee_draft(8);
    edit["title"] = json!("Cotton Tee v2");
    let res = app
        .put(&format!("/api/admin/products/edit/{id}"), Some(&admin), edit)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["title"], "Cotton Tee v2");
    assert_eq!(res.body["data"]["totalStock"], 8);

    let res = app.get(&format!("/api/shop/products/get/{id}"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["title"], "Cotton Tee v2");

    let res = app
        .delete(&format!("/api/admin/products/delete/{id}"), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Product deleted successfully");

    let res = app.get(&format!("/api/shop/products/get/{id}"), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .delete(&format!("/api/admin/products/delete/{id}"), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_product_validation() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let mut draft = tee_draft(5);
    draft["title"] = json!("");
    let res = app
        .post("/api/admin/products/add", Some(&admin), draft)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let mut draft = tee_draft(5);
    draft["price"] = json!(0);
    let res = app
        .post("/api/admin/products/add", Some(&admin), draft)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let mut draft = tee_draft(5);
    draft["salePrice"] = json!(900.0);
    let res = app
        .post("/api/admin/products/add", Some(&admin), draft)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Sizes hold 3 units, more than the declared total.
    let mut draft = sized_draft();
    draft["totalStock"] = json!(1);
    let res = app
        .post("/api/admin/products/add", Some(&admin), draft)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post("/api/admin/products/add", Some(&admin), json!("not an object"))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn test_sized_product_totals_stock() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let id = app.product(&admin, sized_draft()).await;
    let res = app.get(&format!("/api/shop/products/get/{id}"), None).await;
    assert_eq!(res.body["data"]["totalStock"], 3);
    assert_eq!(res.body["data"]["sizes"]["9"]["price"]["amount"], 220000);
    assert!(res.body["data"]["sizes"]["8"].get("price").is_none());
}

#[tokio::test]
async fn test_filter_and_sort_listing() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let mut cap = tee_draft(3);
    cap["title"] = json!("Baseball Cap");
    cap["category"] = json!("accessories");
    cap["price"] = json!(300.0);
    cap["salePrice"] = json!(0);
    app.product(&admin, cap).await;
    app.product(&admin, tee_draft(3)).await;
    app.product(&admin, sized_draft()).await;

    let res = app.get("/api/shop/products/get", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        titles(&res.body),
        vec!["Baseball Cap", "Cotton Tee", "Running Shoe"]
    );

    let res = app
        .get("/api/shop/products/get?sortBy=price-hightolow", None)
        .await;
    assert_eq!(
        titles(&res.body),
        vec!["Running Shoe", "Cotton Tee", "Baseball Cap"]
    );

    let res = app
        .get("/api/shop/products/get?sortBy=title-ztoa", None)
        .await;
    assert_eq!(
        titles(&res.body),
        vec!["Running Shoe", "Cotton Tee", "Baseball Cap"]
    );

    let res = app
        .get("/api/shop/products/get?category=men,footwear", None)
        .await;
    assert_eq!(titles(&res.body), vec!["Cotton Tee", "Running Shoe"]);

    let res = app
        .get("/api/shop/products/get?category=men&brand=adidas", None)
        .await;
    assert!(titles(&res.body).is_empty());
}

#[tokio::test]
async fn test_search_by_keyword() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.product(&admin, tee_draft(3)).await;
    app.product(&admin, sized_draft()).await;

    let res = app.get("/api/shop/search/TRAINER", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(titles(&res.body), vec!["Running Shoe"]);

    let res = app.get("/api/shop/search/nike", None).await;
    assert_eq!(titles(&res.body), vec!["Cotton Tee"]);

    let res = app.get("/api/shop/search/hat", None).await;
    assert!(titles(&res.body).is_empty());

    let res = app.get("/api/shop/search/%20", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_image_is_served() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let png = b"\x89PNG\r\n\x1a\nfake-image";
    let res = app
        .send(upload_request(
            &admin,
            multipart_body("my_file", "shirt.png", "image/png", png),
        ))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["success"], true);
    let file_name = res.body["result"]["fileName"].as_str().unwrap();
    assert!(file_name.ends_with(".png"));
    assert_eq!(res.body["result"]["bytes"], png.len());
    let url = res.body["result"]["url"].as_str().unwrap();
    assert!(url.ends_with(&format!("/uploads/{file_name}")));

    let stored = std::fs::read(app.upload_dir.join(file_name)).unwrap();
    assert_eq!(stored, png);

    let request = Request::builder()
        .uri(format!("/uploads/{file_name}"))
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_wrong_field_and_type() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let res = app
        .send(upload_request(
            &admin,
            multipart_body("avatar", "a.png", "image/png", b"data"),
        ))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .send(upload_request(
            &admin,
            multipart_body("my_file", "notes.txt", "text/plain", b"hello"),
        ))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let (customer, _) = app.customer("c@example.com").await;
    let res = app
        .send(upload_request(
            &customer,
            multipart_body("my_file", "a.png", "image/png", b"data"),
        ))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feature_images() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let (customer, _) = app.customer("c@example.com").await;

    let res = app
        .post(
            "/api/common/feature/add",
            Some(&customer),
            json!({ "image": "http://cdn/banner.png" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .post("/api/common/feature/add", Some(&admin), json!({ "image": "" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/common/feature/add",
            Some(&admin),
            json!({ "image": "http://cdn/banner.png" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["data"]["id"].as_str().unwrap().to_string();

    let res = app.get("/api/common/feature/get", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"][0]["image"], "http://cdn/banner.png");

    let res = app
        .delete(&format!("/api/common/feature/delete/{id}"), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .delete(&format!("/api/common/feature/delete/{id}"), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/common/feature/get", None).await;
    assert_eq!(res.body["data"], json!([]));
}
