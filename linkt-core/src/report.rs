// Link test reporting: console blocks and the JSON results file

use crate::page::Page;
use crate::util::sanitize_file_stem;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Status some sites (LinkedIn, notably) return to crawlers they refuse.
pub const REQUEST_DENIED_STATUS: u16 = 999;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write report file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("could not encode test results: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBand {
    Informational,
    Success,
    Redirection,
    Error,
    Denied,
    Other,
}

impl StatusBand {
    pub fn from_code(code: u16) -> Self {
        match code {
            100..=199 => StatusBand::Informational,
            200..=299 => StatusBand::Success,
            300..=399 => StatusBand::Redirection,
            400..=599 => StatusBand::Error,
            REQUEST_DENIED_STATUS => StatusBand::Denied,
            _ => StatusBand::Other,
        }
    }

    pub fn is_broken(self) -> bool {
        matches!(self, StatusBand::Error | StatusBand::Denied)
    }
}

/// One tested link, as written to the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    pub status: String,
    #[serde(rename = "requestTime")]
    pub request_time: String,
    #[serde(rename = "parentURL")]
    pub parent_url: String,
}

impl Record {
    /// Builds a record from a fetched page; `None` if the page was never fetched.
    pub fn from_page(page: &Page) -> Option<Self> {
        let response = page.response.as_ref()?;
        Some(Self {
            url: page.url().to_string(),
            status: status_text(response.status_code, &response.status_line()),
            request_time: page.request_time_display(),
            parent_url: page.parent_url.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub root: String,
    pub results: Vec<Record>,
}

fn status_text(code: u16, status_line: &str) -> String {
    if code == REQUEST_DENIED_STATUS {
        "999 Request Denied".to_string()
    } else {
        status_line.to_string()
    }
}

/// Multi-line console block for one tested page, colored by status band.
pub fn format_test_result(page: &Page) -> Option<String> {
    let response = page.response.as_ref()?;
    let status = status_text(response.status_code, &response.status_line());
    let status = match StatusBand::from_code(response.status_code) {
        StatusBand::Informational => status.blue(),
        StatusBand::Success => status.green(),
        StatusBand::Redirection => status.yellow(),
        StatusBand::Error => status.red(),
        StatusBand::Denied => status.purple(),
        StatusBand::Other => status.normal(),
    };
    Some(format!(
        "\n{}\n\tStatus\t\t\t{}\n\tRequest Time\t\t{}\n\tParent URL\t\t{}\n",
        page.url(),
        status,
        page.request_time_display().dimmed(),
        page.parent_url.dimmed(),
    ))
}

/// Path of the JSON report for `root` inside `dir`.
pub fn report_path(dir: &Path, root: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_file_stem(root)))
}

/// Makes sure the report directory exists before a crawl starts.
pub fn prepare_report_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Appends the report for `root` to `<dir>/<sanitized-root>.json`.
pub fn write_report(dir: &Path, root: &str, results: Vec<Record>) -> Result<PathBuf, ReportError> {
    prepare_report_dir(dir)?;
    let path = report_path(dir, root);
    let report = TestReport {
        root: root.to_string(),
        results,
    };
    let data = serde_json::to_vec(&report)?;

    let write_err = |source| ReportError::Write {
        path: path.clone(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(write_err)?;
    file.write_all(&data).map_err(write_err)?;
    Ok(path)
}
