pub mod audit;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod product;
pub mod sale;
