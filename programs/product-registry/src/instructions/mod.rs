pub mod initialize;
pub mod verify_product;

pub use initialize::*;
pub use verify_product::*;
