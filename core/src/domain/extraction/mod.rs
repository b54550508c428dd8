pub mod dedupe;
pub mod entities;
pub mod errors;
pub mod fallback;
pub mod normalizer;
pub mod parser;
pub mod ports;
pub mod prompts;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
