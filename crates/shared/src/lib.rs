//! Domain vocabulary shared by the portal core and its adapters.

pub mod domain;
pub mod error;
pub mod protocol;
