use crate::item::csv::provider::{APPLICATION_EXCEL, TEXT_CSV};

pub const VALUE_SEPARATOR: &str = ",";
/// Joins the elements of a nested sequence. The space keeps spreadsheets from
/// splitting a quoted list such as `9780073371856,9780077474034`.
pub const SPACED_VALUE_SEPARATOR: &str = ", ";
pub const QUOTE: &str = "\"";
pub const ESCAPED_QUOTE: &str = "\"\"";
pub const NULL_TEXT: &str = "null";
/// Prefix making spreadsheets keep the quoted text as-is.
pub const ZERO_PRESERVER: &str = "=";

#[cfg(windows)]
pub const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NEWLINE: &str = "\n";

/// Consumer the output is shaped for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CsvFlavor {
    /// Plain CSV.
    #[default]
    Csv,
    /// CSV that spreadsheets open without coercing values: leading zeros are
    /// kept and long digit strings are not turned into scientific notation.
    Excel,
}

impl CsvFlavor {
    pub fn is_spreadsheet_safe(self) -> bool {
        self == CsvFlavor::Excel
    }

    pub fn media_type(self) -> &'static str {
        match self {
            CsvFlavor::Csv => TEXT_CSV,
            CsvFlavor::Excel => APPLICATION_EXCEL,
        }
    }

    /// Excel for `application/vnd.ms-excel` (parameters and case ignored),
    /// plain CSV for anything else.
    pub fn from_media_type(media_type: &str) -> CsvFlavor {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(APPLICATION_EXCEL) {
            CsvFlavor::Excel
        } else {
            CsvFlavor::Csv
        }
    }

    /// Renders text as a quoted field.
    ///
    /// ```
    /// use csv_mapper::item::csv::quoting::CsvFlavor;
    ///
    /// assert_eq!(CsvFlavor::Csv.quote_text(Some("say \"hi\"")), "\"say \"\"hi\"\"\"");
    /// assert_eq!(CsvFlavor::Excel.quote_text(Some("0071208413")), "=\"0071208413\"");
    /// assert_eq!(CsvFlavor::Excel.quote_text(Some("a,b")), "\"a,b\"");
    /// assert_eq!(CsvFlavor::Csv.quote_text(None), "null");
    /// ```
    pub fn quote_text(self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return NULL_TEXT.to_string();
        };

        let mut field = String::with_capacity(text.len() + 3);
        // a leading '=' makes spreadsheets ignore the quotes and split on the comma
        if self.is_spreadsheet_safe() && !text.contains(VALUE_SEPARATOR) {
            field.push_str(ZERO_PRESERVER);
        }
        field.push_str(QUOTE);
        field.push_str(&text.replace(QUOTE, ESCAPED_QUOTE));
        field.push_str(QUOTE);
        field
    }

    /// Renders a number or boolean.
    ///
    /// Plain CSV leaves it bare unless it holds a quote; spreadsheet-safe
    /// output always quotes it behind a `=`.
    pub fn quote_value(self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return NULL_TEXT.to_string();
        };

        if !self.is_spreadsheet_safe() && !text.contains(QUOTE) {
            return text.to_string();
        }

        let escaped = text.replace(QUOTE, ESCAPED_QUOTE);
        if self.is_spreadsheet_safe() {
            format!("{ZERO_PRESERVER}{QUOTE}{escaped}{QUOTE}")
        } else {
            format!("{QUOTE}{escaped}{QUOTE}")
        }
    }
}
