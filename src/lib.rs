pub mod common;
pub mod frontend;
