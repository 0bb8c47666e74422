use crate::api::models::{
    Attendance, Branch, ClassSession, Feature, Registration, Score, SignedUpload, User,
};
use crate::error::{AppError, CliError};
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets};
use serde::Serialize;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Cli(CliError::InvalidArguments(format!(
                "Unknown output format '{}': expected table or json",
                other
            )))),
        }
    }
}

/// A record that can be rendered as one table row
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

pub struct TableDisplay {
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn header_cell(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold)
        } else {
            Cell::new(text)
        }
    }

    pub fn render<T: TableRow>(&self, items: &[T]) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(T::headers().into_iter().map(|h| self.header_cell(h)));

        for item in items {
            table.add_row(item.row());
        }

        table.to_string()
    }

    /// Render `items` in the requested format
    pub fn format<T>(&self, items: &[T], format: OutputFormat) -> Result<String, AppError>
    where
        T: TableRow + Serialize,
    {
        match format {
            OutputFormat::Table if items.is_empty() => Ok("No results.".to_string()),
            OutputFormat::Table => Ok(self.render(items)),
            OutputFormat::Json => to_json(items),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        AppError::Cli(CliError::InvalidArguments(format!(
            "Failed to render JSON output: {}",
            e
        )))
    })
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl TableRow for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Role", "Account"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            self.email.clone(),
            opt(&self.role),
            opt(&self.id_account),
        ]
    }
}

impl TableRow for Branch {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Address", "Phone"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt(&self.address),
            opt(&self.phone),
        ]
    }
}

impl TableRow for ClassSession {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Branch", "Start", "End", "Coach"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.branch_id.to_string(),
            self.start_time.format(DATE_FORMAT).to_string(),
            self.end_time.format(DATE_FORMAT).to_string(),
            opt(&self.coach_name),
        ]
    }
}

impl TableRow for Attendance {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Session", "Student", "Status", "Checked in"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.class_session_id.to_string(),
            self.student_id.to_string(),
            format!("{:?}", self.status),
            self.checked_in_at
                .map(|t| t.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }
}

impl TableRow for Registration {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Student", "Session", "Status", "Registered"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.class_session_id.to_string(),
            format!("{:?}", self.status),
            self.registered_at
                .map(|t| t.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }
}

impl TableRow for Score {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Student", "Subject", "Score", "Recorded"]
    }

    fn row(&self) -> Vec<String> {
        let value = match self.max_value {
            Some(max) => format!("{}/{}", self.value, max),
            None => self.value.to_string(),
        };
        vec![
            self.id.to_string(),
            self.student_id.to_string(),
            self.subject.clone(),
            value,
            opt(&self.recorded_on),
        ]
    }
}

impl TableRow for Feature {
    fn headers() -> Vec<&'static str> {
        vec!["Key", "Enabled", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.key.clone(),
            if self.enabled { "yes" } else { "no" }.to_string(),
            opt(&self.description),
        ]
    }
}

impl TableRow for SignedUpload {
    fn headers() -> Vec<&'static str> {
        vec!["Upload URL", "File URL", "Expires"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.upload_url.clone(),
            self.file_url.clone(),
            self.expires_at
                .map(|t| t.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }
}
