pub mod report;
pub mod terminal;

pub use report::{ReportSection, ReportView};
