pub mod config;
pub mod environment;
pub mod errors;
pub mod movie;
pub mod origin;
pub mod routes;
pub mod seed;
pub mod store;
pub mod validation;
