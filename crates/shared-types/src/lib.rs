pub mod common;
pub mod error;
pub mod feature_flags;
pub mod todo;

pub use common::*;
pub use error::*;
pub use feature_flags::*;
pub use todo::*;
