//! Interactive chat module
//!
//! Streams campus assistant answers to the terminal as they arrive.

mod repl;
mod stream_printer;

pub use repl::ChatRepl;
pub use stream_printer::print_stream;
