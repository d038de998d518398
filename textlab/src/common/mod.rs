mod constants;
mod value;
pub mod stream;
pub mod util;

pub use constants::*;
pub use util::*;
pub use value::*;
