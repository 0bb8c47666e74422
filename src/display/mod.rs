//! Display layer - table and JSON rendering for command output

pub mod table;

pub use table::{OutputFormat, TableDisplay, TableRow};
