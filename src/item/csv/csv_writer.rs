use std::{
    io::{self, Write},
    sync::Arc,
};

use log::debug;

use crate::{
    core::{
        item::{Record, Value},
        mapping::{AttributeMapping, ColumnKind},
        registry::{ClassMappingRegistry, Resolution},
    },
    error::CsvError,
    item::csv::quoting::{CsvFlavor, NEWLINE, QUOTE, SPACED_VALUE_SEPARATOR, VALUE_SEPARATOR},
};

/// Writes values as CSV rows, laid out by a [`ClassMappingRegistry`].
///
/// A sequence at the root produces one row per element; a single record
/// produces one row without a trailing line terminator. Nested sequences
/// collapse into a single quoted field.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use csv_mapper::core::class::{Class, Method, STRING, I32};
/// use csv_mapper::core::item::{Record, Value};
/// use csv_mapper::core::registry::ClassMappingRegistryBuilder;
/// use csv_mapper::item::csv::csv_writer::CsvObjectWriterBuilder;
/// use csv_mapper::AccessError;
///
/// struct City {
///     name: &'static str,
///     zip: &'static str,
///     population: u32,
/// }
///
/// static CITY_METHODS: [Method; 3] = [
///     Method::getter("getName", &STRING),
///     Method::getter("getZip", &STRING),
///     Method::getter("getPopulation", &I32),
/// ];
/// static CITY: Class = Class::object("City", &CITY_METHODS);
///
/// impl Record for City {
///     fn class(&self) -> &'static Class {
///         &CITY
///     }
///
///     fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
///         match method {
///             "getName" => Ok(self.name.into()),
///             "getZip" => Ok(self.zip.into()),
///             "getPopulation" => Ok(self.population.into()),
///             _ => Err(AccessError::no_such_method(method)),
///         }
///     }
/// }
///
/// let registry = ClassMappingRegistryBuilder::new()
///     .write_headers(true)
///     .decompose_by_default(true)
///     .build();
/// let writer = CsvObjectWriterBuilder::new()
///     .registry(Arc::new(registry))
///     .line_terminator("\n")
///     .build();
///
/// let cities = [
///     City { name: "Boston", zip: "02108", population: 4628910 },
///     City { name: "Concord", zip: "01742", population: 42695 },
/// ];
/// let rows = Value::seq(cities.iter().map(Value::record));
///
/// assert_eq!(
///     writer.write_to_string(&rows).unwrap(),
///     "\"name\",\"zip\",\"population\"\n\
///      \"Boston\",\"02108\",4628910\n\
///      \"Concord\",\"01742\",42695\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CsvObjectWriter {
    registry: Arc<ClassMappingRegistry>,
    flavor: CsvFlavor,
    line_terminator: String,
}

impl CsvObjectWriter {
    pub fn registry(&self) -> &Arc<ClassMappingRegistry> {
        &self.registry
    }

    pub fn flavor(&self) -> CsvFlavor {
        self.flavor
    }

    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    /// Writes the header row, if enabled, then the rows of `root`.
    ///
    /// Only failures of `sink` are reported; see the crate documentation for
    /// how mapping problems degrade the output.
    pub fn serialize<W: Write>(&self, root: &Value<'_>, mut sink: W) -> Result<(), CsvError> {
        let out: &mut dyn Write = &mut sink;

        if self.registry.write_headers() {
            self.write_headers(root, out)?;
        }

        if !root.is_null() {
            let resolution = self.resolve(root);
            self.write_value(root, out, true, mapping_of(&resolution), true)?;
        }

        out.flush()?;
        Ok(())
    }

    /// Serializes `root` into a string.
    pub fn write_to_string(&self, root: &Value<'_>) -> Result<String, CsvError> {
        let mut buffer = Vec::new();
        self.serialize(root, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn resolve(&self, value: &Value<'_>) -> Option<Resolution> {
        value.class().map(|class| self.registry.resolve(class))
    }

    /// Writes the header row for the first element found by unwrapping
    /// nested sequences. An empty sequence on the way ends silently.
    fn write_headers(&self, root: &Value<'_>, out: &mut dyn Write) -> io::Result<()> {
        let mut representative = root;
        while let Value::Seq(items) = representative {
            match items.first() {
                Some(first) => representative = first,
                None => return Ok(()),
            }
        }

        let Value::Record(record) = representative else {
            return Ok(());
        };

        let class = record.class();
        if let Resolution::Composed(mapping) = self.registry.resolve(class) {
            self.write_header_names(&mapping, out, "")?;
            out.write_all(self.line_terminator.as_bytes())?;
            mapping.prepare(class);
        }
        Ok(())
    }

    fn write_header_names(&self, mapping: &AttributeMapping, out: &mut dyn Write, div: &str) -> io::Result<()> {
        let mut div = div;
        for spec in mapping.columns() {
            match spec.kind() {
                ColumnKind::Leaf { header, .. } => {
                    out.write_all(div.as_bytes())?;
                    out.write_all(self.flavor.quote_text(Some(header.as_str())).as_bytes())?;
                }
                ColumnKind::Group { mapping, .. } => self.write_header_names(mapping, out, div)?,
            }
            div = VALUE_SEPARATOR;
        }
        Ok(())
    }

    /// Writes one value.
    ///
    /// * `top_level`: elements of a sequence become rows of their own;
    ///   otherwise the sequence collapses into one field.
    /// * `mapping`: layout of a record value, if it has one.
    /// * `quote`: quote scalars and opaque text.
    fn write_value(
        &self,
        value: &Value<'_>,
        out: &mut dyn Write,
        top_level: bool,
        mapping: Option<&AttributeMapping>,
        quote: bool,
    ) -> io::Result<()> {
        match value {
            Value::Null => {
                // keep the row aligned when an absent value spans several columns
                if let Some(mapping) = mapping {
                    for _ in 1..mapping.len() {
                        out.write_all(VALUE_SEPARATOR.as_bytes())?;
                    }
                }
                Ok(())
            }
            Value::Seq(items) if top_level => {
                for item in items {
                    let resolution = self.resolve(item);
                    self.write_value(item, out, false, mapping_of(&resolution), true)?;
                    out.write_all(self.line_terminator.as_bytes())?;
                }
                Ok(())
            }
            Value::Seq(items) => {
                if quote {
                    out.write_all(QUOTE.as_bytes())?;
                }
                let mut div = "";
                for item in items {
                    out.write_all(div.as_bytes())?;
                    match mapping {
                        Some(mapping) => self.write_value(item, out, false, Some(mapping), false)?,
                        None => {
                            let resolution = self.resolve(item);
                            self.write_value(item, out, false, mapping_of(&resolution), false)?
                        }
                    }
                    div = SPACED_VALUE_SEPARATOR;
                }
                if quote {
                    out.write_all(QUOTE.as_bytes())?;
                }
                Ok(())
            }
            Value::Text(text) => {
                if quote {
                    out.write_all(self.flavor.quote_text(Some(&**text)).as_bytes())
                } else {
                    out.write_all(text.as_bytes())
                }
            }
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float32(_) | Value::Float(_) => {
                let text = value.scalar_text().unwrap_or_default();
                if quote {
                    out.write_all(self.flavor.quote_value(Some(&*text)).as_bytes())
                } else {
                    out.write_all(text.as_bytes())
                }
            }
            Value::Record(record) => self.write_record(*record, out, mapping, quote),
        }
    }

    fn write_record(
        &self,
        record: &dyn Record,
        out: &mut dyn Write,
        mapping: Option<&AttributeMapping>,
        mut quote: bool,
    ) -> io::Result<()> {
        let class = record.class();
        let mapping = match mapping {
            Some(mapping) if !self.registry.needs_to_string(class) => mapping,
            _ => {
                let text = record.opaque_text();
                return if quote {
                    out.write_all(self.flavor.quote_text(Some(text.as_str())).as_bytes())
                } else {
                    out.write_all(text.as_bytes())
                };
            }
        };

        let mut div = "";
        for spec in mapping.columns() {
            let plan = spec.getters_for(class);

            out.write_all(div.as_bytes())?;
            let quote_before = quote;
            if plan.is_composed() {
                quote = false;
                out.write_all(QUOTE.as_bytes())?;
            }

            let mut abandoned = false;
            for getter in plan.getters() {
                match getter.read(record) {
                    Ok(value) => self.write_value(&value, out, false, spec.child(), quote)?,
                    Err(error) => {
                        debug!("Skipping {:?} of {}: {}", spec.properties(), class.name(), error);
                        abandoned = true;
                        break;
                    }
                }
            }
            // an abandoned column keeps the separator state, and a composed
            // one stays open with quoting off
            if abandoned {
                continue;
            }

            if plan.is_composed() {
                out.write_all(QUOTE.as_bytes())?;
            }
            quote = quote_before;
            div = VALUE_SEPARATOR;
        }
        Ok(())
    }
}

fn mapping_of(resolution: &Option<Resolution>) -> Option<&AttributeMapping> {
    resolution.as_ref().and_then(Resolution::mapping)
}

/// Builder of a [`CsvObjectWriter`].
pub struct CsvObjectWriterBuilder {
    registry: Option<Arc<ClassMappingRegistry>>,
    flavor: CsvFlavor,
    line_terminator: String,
}

impl Default for CsvObjectWriterBuilder {
    fn default() -> Self {
        CsvObjectWriterBuilder {
            registry: None,
            flavor: CsvFlavor::default(),
            line_terminator: NEWLINE.to_string(),
        }
    }
}

impl CsvObjectWriterBuilder {
    pub fn new() -> CsvObjectWriterBuilder {
        CsvObjectWriterBuilder::default()
    }

    /// Registry deciding the layout. Writers sharing a registry share its cache.
    pub fn registry(mut self, registry: Arc<ClassMappingRegistry>) -> CsvObjectWriterBuilder {
        self.registry = Some(registry);
        self
    }

    pub fn flavor(mut self, flavor: CsvFlavor) -> CsvObjectWriterBuilder {
        self.flavor = flavor;
        self
    }

    /// Shortcut for [`CsvFlavor::Excel`] or [`CsvFlavor::Csv`].
    pub fn improve_formatting_for_excel(self, yes: bool) -> CsvObjectWriterBuilder {
        self.flavor(if yes { CsvFlavor::Excel } else { CsvFlavor::Csv })
    }

    /// Line terminator, the platform one by default.
    pub fn line_terminator(mut self, terminator: &str) -> CsvObjectWriterBuilder {
        self.line_terminator = terminator.to_string();
        self
    }

    pub fn build(self) -> CsvObjectWriter {
        CsvObjectWriter {
            registry: self.registry.unwrap_or_default(),
            flavor: self.flavor,
            line_terminator: self.line_terminator,
        }
    }
}
