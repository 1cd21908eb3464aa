//! Everything that leaves the interpreter as text: the exported table
//! and the results summary.
pub mod csv;
pub mod report;
