//! Configuration: node attributes and solo settings

pub mod error;
pub mod format;
pub mod node;
pub mod solo;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use node::NodeAttributes;
pub use solo::SoloConfig;
