pub mod header;
pub mod selector;
