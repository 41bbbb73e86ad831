use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::json;
use shared_logging::LogLevel;

use crate::{error::StudioError, ideas::IdeaRow, telemetry::StudioTelemetry};

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 4] = ["platform", "persona", "moods", "idea"];

/// Files written by one export.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportPaths {
    /// CSV file.
    pub csv: PathBuf,
    /// JSON file.
    pub json: PathBuf,
}

/// Writes idea rows as timestamped CSV and JSON files.
#[derive(Debug, Clone)]
pub struct IdeaExporter {
    dir: PathBuf,
    telemetry: StudioTelemetry,
}

impl IdeaExporter {
    /// Exporter targeting `dir`; the directory is created on first export.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            telemetry: StudioTelemetry::disabled(),
        }
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: StudioTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Exports `rows` stamped with the current local time.
    pub fn export(&self, rows: &[IdeaRow]) -> Result<ExportPaths, StudioError> {
        self.export_at(rows, Local::now())
    }

    /// Exports `rows` as `ideas_<YYYYMMDD_HHMMSS>.{csv,json}`. A numeric
    /// suffix is added when files for the same second already exist.
    pub fn export_at(
        &self,
        rows: &[IdeaRow],
        at: DateTime<Local>,
    ) -> Result<ExportPaths, StudioError> {
        fs::create_dir_all(&self.dir).map_err(|source| StudioError::Export {
            path: self.dir.clone(),
            source,
        })?;
        let paths = self.free_paths(&at.format("%Y%m%d_%H%M%S").to_string());

        write_file(&paths.csv, render_csv(rows).as_bytes())?;
        write_file(&paths.json, &serde_json::to_vec_pretty(rows)?)?;

        self.telemetry.note(
            LogLevel::Info,
            "studio.export.written",
            json!({
                "rows": rows.len(),
                "csv": paths.csv,
                "json": paths.json,
            }),
        );
        Ok(paths)
    }

    fn free_paths(&self, stamp: &str) -> ExportPaths {
        let mut attempt = 0_u32;
        loop {
            let stem = if attempt == 0 {
                format!("ideas_{stamp}")
            } else {
                format!("ideas_{stamp}_{attempt}")
            };
            let paths = ExportPaths {
                csv: self.dir.join(format!("{stem}.csv")),
                json: self.dir.join(format!("{stem}.json")),
            };
            if !paths.csv.exists() && !paths.json.exists() {
                return paths;
            }
            attempt += 1;
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), StudioError> {
    fs::write(path, contents).map_err(|source| StudioError::Export {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders rows as CSV with a header line, quoting fields as RFC 4180 does.
#[must_use]
pub fn render_csv(rows: &[IdeaRow]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for row in rows {
        let fields = [
            csv_field(&row.platform),
            csv_field(&row.persona),
            csv_field(&row.moods),
            csv_field(&row.idea),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
