//! Output formatting for flow results

pub mod console;
