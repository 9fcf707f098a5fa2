//! Value generation logic for each generator kind.
//!
//! These functions take the random source explicitly; [`crate::Generator`]
//! dispatches to them.

pub mod binary;
pub mod json;
pub mod numeric;
pub mod pick;
pub mod string;
pub mod temporal;
