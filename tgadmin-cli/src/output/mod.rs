//! Output formatting for CLI.

mod json;
mod text;

pub use json::{ActionOutput, JsonFormatter, ListOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
