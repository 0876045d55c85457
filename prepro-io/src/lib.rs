mod error;
mod reader;
mod tokenizer;
mod writer;

pub use error::{ReaderError, WriterError};
pub use reader::read_problem;
pub use writer::{rewrite_runtime_expr, write_problem};
