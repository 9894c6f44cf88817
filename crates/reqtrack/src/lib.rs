#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod lock;
mod rand;
mod registry;
mod request;
mod state;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::registry::*;
pub use crate::request::*;
pub use crate::state::*;
