pub mod export;
pub mod handlers;
pub mod import;
pub mod queries;
pub mod search_terms;
pub mod views;
