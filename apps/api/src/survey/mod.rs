pub mod handlers;
pub mod queries;
pub mod validation;
pub mod views;
