pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod forms;
pub mod repository;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
