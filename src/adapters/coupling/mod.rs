pub mod derived;
pub mod json;
