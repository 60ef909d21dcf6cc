//! Action inputs and label configuration.

pub mod inputs;
pub mod labels;

pub use inputs::ActionInputs;
pub use labels::parse_label_config;
