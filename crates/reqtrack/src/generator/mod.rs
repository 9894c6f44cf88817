mod alpha;
mod interface;

pub use alpha::*;
pub use interface::*;
