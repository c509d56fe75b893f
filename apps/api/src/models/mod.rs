pub mod candidate;
pub mod career;
pub mod catalog;
pub mod credit;
pub mod cv;
pub mod job;
pub mod notification;
pub mod scraping;
pub mod settings;
pub mod survey;
pub mod user;

/// Primary key type shared by every table.
pub type DbId = i64;
