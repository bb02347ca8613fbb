pub mod editor;

pub use editor::{parse_line, Output};
