/// CSV output of object graphs.
///
/// This module turns values into CSV rows, using the column layouts decided
/// by a [`ClassMappingRegistry`](crate::core::registry::ClassMappingRegistry).
///
/// # Module Architecture
///
/// The CSV module consists of three components:
///
/// 1. **CsvObjectWriter**: walks a value and writes its header row and data
///    rows to any destination implementing `Write`.
///
/// 2. **CsvFlavor**: the quoting rules of the two output variants, plain CSV
///    and spreadsheet-safe CSV.
///
/// 3. **CsvWriters**: a pair of writers, one per flavor, sharing one registry
///    and selected by media type.
///
/// Writers are built with [`CsvObjectWriterBuilder`](csv_writer::CsvObjectWriterBuilder)
/// and can be shared between threads.
///
/// # Output
///
/// - Text is always quoted, embedded quotes are doubled
/// - Numbers and booleans are bare, unless the flavor is spreadsheet-safe
/// - A nested object contributes one column per column of its own mapping
/// - A missing nested object still contributes its (empty) columns
/// - A collection inside a row is joined with `", "` into a single field
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use csv_mapper::core::class::{Class, Method, STRING};
/// use csv_mapper::core::item::{Record, Value};
/// use csv_mapper::core::mapping::AttributeMapping;
/// use csv_mapper::core::registry::ClassMappingRegistryBuilder;
/// use csv_mapper::item::csv::csv_writer::CsvObjectWriterBuilder;
/// use csv_mapper::AccessError;
///
/// struct Part {
///     sku: String,
/// }
///
/// static PART_METHODS: [Method; 1] = [Method::getter("getSku", &STRING)];
/// static PART: Class = Class::object("Part", &PART_METHODS);
///
/// impl Record for Part {
///     fn class(&self) -> &'static Class {
///         &PART
///     }
///
///     fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
///         match method {
///             "getSku" => Ok(self.sku.as_str().into()),
///             _ => Err(AccessError::no_such_method(method)),
///         }
///     }
/// }
///
/// let registry = ClassMappingRegistryBuilder::new()
///     .write_headers(true)
///     .decompose_class(&PART)
///     .mapping(&PART, AttributeMapping::new().column("SKU", "sku"))
///     .build();
/// let writer = CsvObjectWriterBuilder::new()
///     .registry(Arc::new(registry))
///     .improve_formatting_for_excel(true)
///     .line_terminator("\n")
///     .build();
///
/// let part = Part { sku: "0042".to_string() };
/// let output = writer.write_to_string(&Value::record(&part)).unwrap();
///
/// assert_eq!(output, "=\"SKU\"\n=\"0042\"");
/// ```
pub mod csv_writer;

/// Media types and the writer pair selected by them.
pub mod provider;

/// Quoting rules of the output variants.
pub mod quoting;
