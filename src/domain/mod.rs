pub mod document;
pub mod push;
