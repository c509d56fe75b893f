//! CVs and the templates they are rendered with.

pub mod handlers;
pub mod language;
pub mod lifecycle;
pub mod naming;
pub mod template_defaults;
pub mod views;

pub use lifecycle::CvServices;
