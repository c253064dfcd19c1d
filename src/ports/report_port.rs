//! Report output port trait.

use std::path::Path;

use crate::domain::error::HhhlError;
use crate::domain::report::Report;

/// Port for writing the finished report.
pub trait ReportPort {
    fn write(&self, report: &Report, output_path: &Path) -> Result<(), HhhlError>;
}
