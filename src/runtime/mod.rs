pub mod error;
pub mod executor;
pub mod state;

pub use error::*;
pub use executor::*;
pub use state::*;
