pub mod agent;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod translate;
