pub mod product;

#[cfg(test)]
pub mod factories;

pub use product::*;
