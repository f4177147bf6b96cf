pub mod code_generator;
pub mod jwt;

pub use code_generator::{display_code, random_suffix};
pub use jwt::*;
