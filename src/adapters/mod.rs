pub mod coupling;
pub mod descriptor;
pub mod fs;
