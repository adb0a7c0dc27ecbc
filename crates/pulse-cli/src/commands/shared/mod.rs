pub mod parse;
pub mod upload;
