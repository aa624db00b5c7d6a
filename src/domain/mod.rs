pub mod descriptor;
pub mod tag;
pub mod node;
pub mod edge;
pub mod graph;
pub mod builder;
pub mod style;
pub mod selector;
pub mod reduction;
pub mod overview;
pub mod error;
pub mod ports;
