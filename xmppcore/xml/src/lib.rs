pub mod attrs;
pub mod builder;
pub mod error;
pub mod node;
mod reader;
mod writer;

pub use attrs::AttrParser;
pub use builder::NodeBuilder;
pub use error::{Result, XmlError};
pub use node::{Attrs, Node, NodeContent};
pub use reader::parse_str;
pub use writer::escape_text;
