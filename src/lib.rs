pub mod api;
pub mod config;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod seed;
pub mod service;
pub mod utils;
