//! Domain-based type organization
//!
//! - form: generation form values, validation schema and pickers
//! - generation: generation results and output panel state

pub mod form;
pub mod generation;

pub use form::*;
pub use generation::*;
