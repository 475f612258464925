// Request and response models exposed through the OpenAPI surface
pub mod auth;
pub mod common;
pub mod herd;
pub mod health;
pub mod production;
pub mod reproduction;
pub mod user;
