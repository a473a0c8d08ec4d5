pub mod schema;
pub mod tool;
pub mod types;
