pub mod reader;
pub mod writer;

pub use reader::Table;
