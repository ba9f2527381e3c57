pub mod auth;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod frontend;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod schema;
pub mod startup;
#[cfg(test)]
pub mod test_fixtures;
pub mod util;
