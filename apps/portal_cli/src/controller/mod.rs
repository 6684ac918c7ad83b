//! Adapter layer: CLI commands in, controller calls and terminal output out.

pub mod events;
pub mod orchestration;
