pub mod commands;
pub mod failure;
pub mod logging;
pub mod state;
