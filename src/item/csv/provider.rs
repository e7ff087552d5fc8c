use std::sync::Arc;

use crate::{
    core::registry::ClassMappingRegistry,
    item::csv::{
        csv_writer::{CsvObjectWriter, CsvObjectWriterBuilder},
        quoting::CsvFlavor,
    },
};

pub const TEXT_CSV: &str = "text/csv";
pub const APPLICATION_EXCEL: &str = "application/vnd.ms-excel";

/// A plain and a spreadsheet-safe writer sharing one registry.
///
/// ```
/// use std::sync::Arc;
/// use csv_mapper::core::registry::ClassMappingRegistry;
/// use csv_mapper::item::csv::provider::CsvWriters;
/// use csv_mapper::item::csv::quoting::CsvFlavor;
///
/// let writers = CsvWriters::new(Arc::new(ClassMappingRegistry::default()));
///
/// assert_eq!(writers.for_media_type("application/vnd.ms-excel").flavor(), CsvFlavor::Excel);
/// assert_eq!(writers.for_media_type("text/csv").flavor(), CsvFlavor::Csv);
/// ```
#[derive(Debug, Clone)]
pub struct CsvWriters {
    csv: CsvObjectWriter,
    excel: CsvObjectWriter,
}

impl CsvWriters {
    pub fn new(registry: Arc<ClassMappingRegistry>) -> CsvWriters {
        let writer = |flavor| {
            CsvObjectWriterBuilder::new()
                .registry(Arc::clone(&registry))
                .flavor(flavor)
                .build()
        };

        CsvWriters {
            csv: writer(CsvFlavor::Csv),
            excel: writer(CsvFlavor::Excel),
        }
    }

    pub fn csv(&self) -> &CsvObjectWriter {
        &self.csv
    }

    pub fn excel(&self) -> &CsvObjectWriter {
        &self.excel
    }

    pub fn for_flavor(&self, flavor: CsvFlavor) -> &CsvObjectWriter {
        match flavor {
            CsvFlavor::Csv => &self.csv,
            CsvFlavor::Excel => &self.excel,
        }
    }

    /// Writer for a requested media type; unknown types get plain CSV.
    pub fn for_media_type(&self, media_type: &str) -> &CsvObjectWriter {
        self.for_flavor(CsvFlavor::from_media_type(media_type))
    }

    /// Media types this pair can produce.
    pub fn media_types() -> [&'static str; 2] {
        [TEXT_CSV, APPLICATION_EXCEL]
    }
}
