/** Rust strtod implementation, reporting consumed chars like the C interface. */
mod accum;

mod chars;
pub use chars::IntoCharIter;

mod compose;

mod errors;
pub use errors::Error;

mod strtod;
pub use crate::strtod::{strtod, strtod_checked};
