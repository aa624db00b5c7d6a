//! apiviz library — UML relationship graph construction and Graphviz DOT rendering.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod render;
