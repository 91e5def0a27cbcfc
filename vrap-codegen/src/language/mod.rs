//! Language-specific abstractions shared by the target crates.

mod naming;
mod traits;

pub use naming::NamingConvention;
pub use traits::TypeMapper;
