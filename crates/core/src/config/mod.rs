//! Configuration loading and schema definitions
//!
//! Settings come from `annaseva.toml` (or an explicit path) and are then
//! overridden by environment variables such as `PORT`.

mod loader;
mod schema;

pub use loader::*;
pub use schema::*;
