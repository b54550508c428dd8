pub mod common;
pub mod extraction;
