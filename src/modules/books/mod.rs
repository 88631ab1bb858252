pub mod models;
pub mod repository;
mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;
use sqlx::SqlitePool;

pub use models::{Book, BookPayload};
pub use service::BookService;

/// Books resource: create, update and lookup by ISBN
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            service: BookService::new(pool),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
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
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let isbn_param = json!({
            "name": "isbn",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": body,
                        "responses": {
                            "201": book("Book created"),
                            "400": error("Missing or malformed fields"),
                            "422": error("ISBN already exists")
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Get a book by ISBN",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": {
                            "200": book("The book"),
                            "404": error("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "requestBody": body,
                        "responses": {
                            "200": book("Updated book"),
                            "400": error("ISBN mismatch or invalid fields"),
                            "404": error("Book not found")
                        }
                    }
                },
                "/isbn/{isbn}": {
                    "get": {
                        "summary": "Get a book by ISBN",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": {
                            "200": book("The book"),
                            "404": error("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "ISBN": { "type": "string", "description": "Natural key, also accepted as `isbn`" },
                            "title": { "type": "string" },
                            "Author": { "type": "string", "description": "Also accepted as `author`" },
                            "description": { "type": "string" },
                            "genre": { "type": "string" },
                            "price": { "type": "number", "minimum": 0, "description": "At most 8 integer digits and 2 decimals" },
                            "quantity": { "type": "integer", "minimum": 0, "default": 0 }
                        },
                        "required": ["ISBN", "title", "Author", "description", "genre", "price"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    isbn        TEXT PRIMARY KEY NOT NULL,
                    title       TEXT NOT NULL,
                    author      TEXT NOT NULL,
                    description TEXT NOT NULL,
                    genre       TEXT NOT NULL,
                    price       TEXT NOT NULL,
                    quantity    INTEGER NOT NULL CHECK (quantity >= 0)
                );
                "#,
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
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(pool))
}
