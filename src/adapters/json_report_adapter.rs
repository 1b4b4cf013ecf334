//! JSON report adapter: serializes command results to stdout or a file.

use crate::domain::error::StockerError;
use crate::ports::report_port::{Report, ReportPort};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub struct JsonReportAdapter {
    output: Option<PathBuf>,
}

impl JsonReportAdapter {
    pub fn stdout() -> Self {
        Self { output: None }
    }

    pub fn to_file(path: PathBuf) -> Self {
        Self { output: Some(path) }
    }

    pub fn render(report: &Report) -> Result<String, StockerError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &Report) -> Result<(), StockerError> {
        let body = Self::render(report)?;
        match &self.output {
            Some(path) => fs::write(path, format!("{body}\n"))?,
            None => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{body}")?;
            }
        }
        Ok(())
    }
}
