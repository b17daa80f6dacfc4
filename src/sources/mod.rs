//! Table source implementations

pub mod delimited;
pub mod spreadsheet;

pub use delimited::DelimitedSource;
pub use spreadsheet::SpreadsheetSource;
