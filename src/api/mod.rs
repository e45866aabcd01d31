//! API Module
//!
//! HTTP handlers and routing exposing the cache as a JSON API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /exists/:key` - Check whether a key is live
//! - `POST /flush` - Remove every entry
//! - `GET /keys` - Count live entries
//! - `PUT /max-memory` - Change the memory budget
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
