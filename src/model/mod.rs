//! Problem model: symbols, templates and problem instances

pub mod problem;
pub mod symbol;
pub mod template;

pub use problem::Problem;
pub use symbol::Symbol;
pub use template::{Template, TemplatePart};
