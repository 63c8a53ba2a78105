pub mod action_handlers;

pub use action_handlers::*;
