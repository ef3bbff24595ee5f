pub mod api;
pub mod config;
pub mod generation_client;
pub mod http_client;
pub mod kv_store_client;
pub mod render;
pub mod services;
