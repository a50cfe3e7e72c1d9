pub mod mode;
pub mod recipe;

pub use mode::FileMode;
pub use recipe::*;
