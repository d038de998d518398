mod regex_utils;
mod text_utils;
mod type_utils;

pub use regex_utils::*;
pub use text_utils::*;
pub use type_utils::*;
