pub mod error;
pub mod mapper;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use folio_db::Database;
use folio_kernel::{InitCtx, Migration, Module};
use serde_json::json;

pub use error::BookError;
pub use models::{Book, BookFilter, BookPatch, NewBook};
pub use repository::{BookRepository, SqliteBookRepository};
pub use service::BookService;

/// Book records served at the server root
pub struct BooksModule {
    db: Database,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: schema::CREATE_BOOKS_TABLE,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let list_parameters: Vec<serde_json::Value> = [
        ("title", "string", "Case-insensitive substring of the title"),
        ("min_pages", "integer", "Minimum page count, inclusive"),
        ("max_pages", "integer", "Maximum page count, inclusive"),
        ("min_rating", "number", "Minimum rating, inclusive"),
        ("max_rating", "number", "Maximum rating, inclusive"),
        ("min_price", "number", "Minimum price, inclusive"),
        ("max_price", "number", "Maximum price, inclusive"),
    ]
    .into_iter()
    .map(|(name, kind, description)| {
        json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": description,
            "schema": { "type": kind }
        })
    })
    .collect();

    let list_operation = json!({
        "summary": "List books, optionally filtered",
        "tags": ["Books"],
        "parameters": list_parameters,
        "responses": {
            "200": {
                "description": "List of books",
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        }
                    }
                }
            },
            "400": error_response("Malformed query string"),
            "422": error_response("Filter bound out of range")
        }
    });

    let id_parameter = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    }]);

    json!({
        "paths": {
            "/": { "get": list_operation.clone() },
            "/books": {
                "get": list_operation,
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_response("Created book"),
                        "409": error_response("A book with this id already exists"),
                        "422": error_response("Validation error"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/books/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": id_parameter.clone(),
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update some fields of a book",
                    "tags": ["Books"],
                    "parameters": id_parameter.clone(),
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/UpdateBook" }
                            }
                        }
                    },
                    "responses": {
                        "200": book_response("Updated book"),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": id_parameter,
                    "responses": {
                        "204": { "description": "Book deleted" },
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64", "minimum": 1 },
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "pages": { "type": "integer", "minimum": 0 },
                        "rating": { "type": "number", "minimum": 0, "maximum": 5 },
                        "price": { "type": "number", "minimum": 0, "maximum": 9999.99 }
                    },
                    "required": ["id", "title", "author", "pages", "rating", "price"]
                },
                "CreateBook": {
                    "type": "object",
                    "description": "A missing id is assigned from 1000..=9999",
                    "properties": {
                        "id": { "type": "integer", "format": "int64", "minimum": 1 },
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "pages": { "type": "integer", "minimum": 0 },
                        "rating": { "type": "number", "minimum": 0, "maximum": 5 },
                        "price": { "type": "number", "minimum": 0, "maximum": 9999.99 }
                    },
                    "required": ["title", "author", "pages", "rating", "price"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "pages": { "type": "integer", "minimum": 0 },
                        "rating": { "type": "number", "minimum": 0, "maximum": 5 },
                        "price": { "type": "number", "minimum": 0, "maximum": 9999.99 }
                    }
                }
            }
        }
    })
}
