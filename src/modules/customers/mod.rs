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

pub use models::{Customer, CustomerPayload};
pub use service::CustomerService;

/// Customers resource: create and lookup by id or userId
pub struct CustomersModule {
    service: CustomerService,
}

impl CustomersModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            service: CustomerService::new(pool),
        }
    }
}

#[async_trait]
impl Module for CustomersModule {
    fn name(&self) -> &'static str {
        "customers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "customers module initialized"
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
        let customer = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Customer" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create a customer",
                        "tags": ["Customers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Customer" }
                                }
                            }
                        },
                        "responses": {
                            "201": customer("Customer created; Location header points at it"),
                            "400": error("Missing or malformed fields"),
                            "422": error("userId already exists")
                        }
                    },
                    "get": {
                        "summary": "Find a customer by userId",
                        "tags": ["Customers"],
                        "parameters": [{
                            "name": "userId",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string", "format": "email" }
                        }],
                        "responses": {
                            "200": customer("The customer"),
                            "400": error("userId missing or blank"),
                            "404": error("Customer not found")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a customer by id",
                        "tags": ["Customers"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "minimum": 1 }
                        }],
                        "responses": {
                            "200": customer("The customer"),
                            "400": error("id is not a positive integer"),
                            "404": error("Customer not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Customer": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "readOnly": true },
                            "userId": { "type": "string", "format": "email" },
                            "name": { "type": "string" },
                            "phone": { "type": "string" },
                            "address": { "type": "string" },
                            "address2": { "type": ["string", "null"] },
                            "city": { "type": "string" },
                            "state": { "type": "string", "description": "2-letter US state or DC code" },
                            "zipcode": { "type": "string", "pattern": "^[0-9]{5}(-[0-9]{4})?$" }
                        },
                        "required": ["userId", "name", "phone", "address", "city", "state", "zipcode"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE customers (
                    id       INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id  TEXT NOT NULL UNIQUE,
                    name     TEXT NOT NULL,
                    phone    TEXT NOT NULL,
                    address  TEXT NOT NULL,
                    address2 TEXT,
                    city     TEXT NOT NULL,
                    state    TEXT NOT NULL,
                    zipcode  TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "customers module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "customers module stopped");
        Ok(())
    }
}

/// Create a new instance of the customers module
pub fn create_module(pool: SqlitePool) -> Arc<dyn Module> {
    Arc::new(CustomersModule::new(pool))
}
