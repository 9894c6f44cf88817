mod interface;
#[cfg(feature = "std")]
mod seeded;
#[cfg(feature = "std")]
mod thread;

pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use seeded::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use thread::*;
