//! Domain models with validation at the boundary
//!
//! All user input is validated before it reaches the store.
//! Invalid input returns FieldErrors, not panic.

pub mod item;
pub mod validation;

pub use item::{ItemFields, ItemPayload};
pub use validation::{FieldErrors, ValidationError};
