//! Building blocks for rendering text files.

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
