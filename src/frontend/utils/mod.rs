pub mod errors;
pub mod formatting;
