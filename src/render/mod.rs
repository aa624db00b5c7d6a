pub mod diagram;
pub mod dot;
pub mod validate;
