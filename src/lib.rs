pub mod api_docs;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod utils;
