pub mod api;
pub mod config;
pub mod o11y;
pub mod routes;
pub mod services;
pub mod upstream;
