use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use folio_app::books::{Book, BookRepository, SqliteBookRepository};
use folio_db::Database;
use folio_kernel::settings::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

fn book(id: i64, title: &str, author: &str, pages: i64, rating: f64, price: f64) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        pages,
        rating,
        price,
    }
}

async fn app() -> Router {
    let db = Database::connect_in_memory().await.unwrap();
    let registry = folio_app::registry(&db);
    folio_app::apply_migrations(&db, &registry).await.unwrap();

    {
        let mut conn = db.acquire().await.unwrap();
        let mut repo = SqliteBookRepository::new(&mut conn);
        for seed in [
            book(1, "1984", "George Orwell", 328, 4.7, 12.95),
            book(2, "Dune", "Frank Herbert", 412, 4.8, 14.99),
            book(3, "The Hobbit", "Tolkien", 300, 4.9, 10.99),
        ] {
            repo.add(seed).await.unwrap();
        }
    }

    folio_http::build_router(&registry, &Settings::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ids(books: &Value) -> Vec<i64> {
    books
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["id"].as_i64().unwrap())
        .collect()
}

fn new_book(id: Option<i64>) -> Value {
    let mut body = json!({
        "title": "The Added Book",
        "author": "Adder Addition",
        "pages": 50,
        "rating": 2.2,
        "price": 5.99
    });
    if let Some(id) = id {
        body["id"] = json!(id);
    }
    body
}

#[tokio::test]
async fn health_check_responds() {
    let app = app().await;

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn root_and_books_list_every_book() {
    let app = app().await;

    for uri in ["/", "/books"] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ids(&json_body(response).await), vec![1, 2, 3]);
    }
}

#[tokio::test]
async fn get_book_by_id() {
    let app = app().await;

    let response = send(&app, "GET", "/books/1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "id": 1,
            "title": "1984",
            "author": "George Orwell",
            "pages": 328,
            "rating": 4.7,
            "price": 12.95
        })
    );
}

#[tokio::test]
async fn get_missing_book_is_not_found() {
    let app = app().await;

    let response = send(&app, "GET", "/books/100", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "Book with ID=100 doesn't exist");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = app().await;

    let response = send(&app, "GET", "/books/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_book_with_explicit_id() {
    let app = app().await;

    let response = send(&app, "POST", "/books", Some(new_book(Some(4)))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["id"], 4);
    assert_eq!(created["title"], "The Added Book");

    let listed = json_body(send(&app, "GET", "/books", None).await).await;
    assert_eq!(ids(&listed), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn create_book_without_id_draws_one() {
    let app = app().await;

    let response = send(&app, "POST", "/books", Some(new_book(None))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"].as_i64().unwrap();
    assert!((1000..=9999).contains(&id));

    let fetched = send(&app, "GET", &format!("/books/{id}"), None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_duplicate_id_conflicts() {
    let app = app().await;

    let response = send(&app, "POST", "/books", Some(new_book(Some(1)))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "Book with ID=1 already exists");

    let existing = json_body(send(&app, "GET", "/books/1", None).await).await;
    assert_eq!(existing["title"], "1984");
}

#[tokio::test]
async fn create_out_of_bounds_book_is_rejected() {
    let app = app().await;
    let mut body = new_book(Some(5));
    body["rating"] = json!(7.5);
    body["title"] = json!("");

    let response = send(&app, "POST", "/books", Some(body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "rating"]);

    let missing = send(&app, "GET", "/books/5", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_accepts_whitespace_title() {
    let app = app().await;
    let mut body = new_book(Some(6));
    body["title"] = json!(" ");

    let response = send(&app, "POST", "/books", Some(body)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["title"], " ");
}

#[tokio::test]
async fn create_with_missing_field_is_unprocessable() {
    let app = app().await;

    let response = send(&app, "POST", "/books", Some(json!({ "title": "Only" }))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = app().await;

    let response = send(
        &app,
        "PUT",
        "/books/2",
        Some(json!({ "price": 9.5, "rating": null })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "id": 2,
            "title": "Dune",
            "author": "Frank Herbert",
            "pages": 412,
            "rating": 4.8,
            "price": 9.5
        })
    );
}

#[tokio::test]
async fn update_missing_book_is_not_found() {
    let app = app().await;

    let response = send(&app, "PUT", "/books/100", Some(json!({ "title": "X" }))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_rejected_by_storage_is_internal_error() {
    let app = app().await;

    let response = send(
        &app,
        "PUT",
        "/books/3",
        Some(json!({ "pages": 3_000_000_000_i64 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "internal_error");

    let unchanged = json_body(send(&app, "GET", "/books/3", None).await).await;
    assert_eq!(unchanged["pages"], 300);
}

#[tokio::test]
async fn delete_book_then_it_is_gone() {
    let app = app().await;

    let response = send(&app, "DELETE", "/books/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone = send(&app, "GET", "/books/1", None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let listed = json_body(send(&app, "GET", "/books", None).await).await;
    assert_eq!(ids(&listed), vec![2, 3]);
}

#[tokio::test]
async fn delete_missing_book_is_not_found() {
    let app = app().await;

    let response = send(&app, "DELETE", "/books/100", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_applies_filters() {
    let app = app().await;

    let by_title = json_body(send(&app, "GET", "/books?title=HOBBIT", None).await).await;
    assert_eq!(ids(&by_title), vec![3]);

    let by_range = json_body(
        send(
            &app,
            "GET",
            "/books?min_pages=310&max_price=13.0",
            None,
        )
        .await,
    )
    .await;
    assert_eq!(ids(&by_range), vec![1]);

    let on_root = json_body(send(&app, "GET", "/?min_rating=4.8", None).await).await;
    assert_eq!(ids(&on_root), vec![2, 3]);

    let none = json_body(send(&app, "GET", "/books?min_pages=1000", None).await).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_filter_bounds_are_rejected() {
    let app = app().await;

    let out_of_range = send(&app, "GET", "/books?max_rating=9", None).await;
    assert_eq!(out_of_range.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let not_a_number = send(&app, "GET", "/books?min_pages=lots", None).await;
    assert_eq!(not_a_number.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;

    let response = send(&app, "GET", "/books", None).await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_lists_book_paths() {
    let app = app().await;

    let response = send(&app, "GET", "/docs/openapi.json", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let spec = json_body(response).await;
    assert!(spec["paths"]["/books/{id}"].is_object());
    assert!(spec["paths"]["/health"].is_object());
}
