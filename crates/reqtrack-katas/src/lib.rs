#![doc = include_str!("../README.md")]

mod error;
mod fibonacci;
mod id_number;

pub use crate::error::*;
pub use crate::fibonacci::*;
pub use crate::id_number::*;
