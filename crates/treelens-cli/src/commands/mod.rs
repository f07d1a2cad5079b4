pub mod lang_resolver;
pub mod langs;
pub mod layers;
pub mod node;
pub mod query;
pub mod run_common;
pub mod tree;
