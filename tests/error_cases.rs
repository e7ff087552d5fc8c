mod common;

use std::{
    error::Error,
    io::{self, ErrorKind},
    sync::Arc,
};

use common::{init_logger, person_registry, writer, MockSink};
use csv_mapper::{
    core::{
        item::Value,
        mapping::AttributeMapping,
        registry::{ClassMappingRegistry, ClassMappingRegistryBuilder},
        test_support::{Gauge, Node, Person, UsAddress, GAUGE},
    },
    error::CsvError,
    item::csv::quoting::CsvFlavor,
};

fn gauge(broken: Vec<&'static str>) -> Gauge {
    Gauge {
        label: "boiler".to_string(),
        reading: 71.5,
        active: true,
        broken,
    }
}

fn gauge_output(registry: ClassMappingRegistry, gauge: &Gauge) -> Result<String, CsvError> {
    writer(Arc::new(registry), CsvFlavor::Csv).write_to_string(&Value::record(gauge))
}

fn pojo_registry() -> ClassMappingRegistry {
    ClassMappingRegistryBuilder::new().decompose_by_default(true).build()
}

#[test]
fn failing_sink_is_reported() {
    init_logger();
    let joe = Person::new("Joe", "Doe", 30, Some(UsAddress::new("101 1st str", "San Francisco", "CA")));

    let mut sink = MockSink::default();
    sink.expect_write()
        .times(1)
        .returning(|_buf| Err(io::Error::from(ErrorKind::PermissionDenied)));

    let result = writer(person_registry(true), CsvFlavor::Csv).serialize(&Value::record(&joe), sink);

    assert!(matches!(result, Err(CsvError::Io(error)) if error.kind() == ErrorKind::PermissionDenied));
}

#[test]
fn failing_flush_is_reported() {
    let joe = Person::new("Joe", "Doe", 30, None);

    let mut sink = MockSink::default();
    sink.expect_write().returning(|buf| Ok(buf.len()));
    sink.expect_flush()
        .times(1)
        .returning(|| Err(io::Error::from(ErrorKind::BrokenPipe)));

    let result = writer(person_registry(false), CsvFlavor::Csv).serialize(&Value::record(&joe), sink);

    assert!(matches!(result, Err(CsvError::Io(error)) if error.kind() == ErrorKind::BrokenPipe));
}

#[test]
fn failing_accessor_in_the_middle_leaves_an_empty_field() -> Result<(), CsvError> {
    init_logger();

    let output = gauge_output(pojo_registry(), &gauge(vec!["getReading"]))?;

    assert_eq!(output, "\"boiler\",,true");
    Ok(())
}

#[test]
fn failing_first_accessor_drops_the_next_separator() -> Result<(), CsvError> {
    let output = gauge_output(pojo_registry(), &gauge(vec!["getLabel"]))?;

    assert_eq!(output, "71.5,true");
    Ok(())
}

#[test]
fn record_with_only_failing_accessors_is_empty() -> Result<(), CsvError> {
    let output = gauge_output(pojo_registry(), &gauge(vec!["getLabel", "getReading", "isActive"]))?;

    assert!(output.is_empty());
    Ok(())
}

#[test]
fn failing_accessor_inside_a_composed_column_leaves_it_open() -> Result<(), CsvError> {
    let mapping = AttributeMapping::new()
        .composed("Summary", ["label", "reading"])
        .column("Label", "label");
    let registry = ClassMappingRegistryBuilder::new()
        .mapping(&GAUGE, mapping)
        .decompose_class(&GAUGE)
        .build();

    let output = gauge_output(registry, &gauge(vec!["getReading"]))?;

    // no closing quote, and the following text is written unquoted
    assert_eq!(output, "\"boilerboiler");
    Ok(())
}

#[test]
fn property_without_accessor_writes_its_name() -> Result<(), CsvError> {
    let mapping = AttributeMapping::new()
        .column("Label", "label")
        .column("Unit", "unit");
    let registry = ClassMappingRegistryBuilder::new()
        .mapping(&GAUGE, mapping)
        .decompose_class(&GAUGE)
        .build();

    let output = gauge_output(registry, &gauge(Vec::new()))?;

    assert_eq!(output, "\"boiler\",\"Unit\"");
    Ok(())
}

#[test]
fn empty_root_sequence_writes_nothing() -> Result<(), Box<dyn Error>> {
    let output = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&Value::Seq(Vec::new()))?;

    assert!(output.is_empty());
    Ok(())
}

#[test]
fn empty_nested_sequence_writes_an_empty_field() -> Result<(), Box<dyn Error>> {
    let rows = Value::seq([Value::Seq(Vec::new())]);

    let output = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&rows)?;

    assert_eq!(output, "\"\"\n");
    Ok(())
}

#[test]
fn null_root_writes_nothing() -> Result<(), Box<dyn Error>> {
    let output = writer(person_registry(true), CsvFlavor::Excel).write_to_string(&Value::Null)?;

    assert!(output.is_empty());
    Ok(())
}

#[test]
fn undecomposed_classes_are_written_as_one_field_without_header() -> Result<(), Box<dyn Error>> {
    let registry = ClassMappingRegistryBuilder::new().write_headers(true).build();
    let joe = Person::new("Joe", "Doe", 30, None);

    let output = writer(Arc::new(registry), CsvFlavor::Csv).write_to_string(&Value::record(&joe))?;

    assert_eq!(output, "\"Person\"");
    Ok(())
}

#[test]
fn self_referencing_records_fall_back_to_their_text() -> Result<(), Box<dyn Error>> {
    let registry = ClassMappingRegistryBuilder::new()
        .write_headers(true)
        .decompose_by_default(true)
        .build();
    let root = Node {
        name: "root".to_string(),
        parent: None,
    };
    let leaf = Node {
        name: "leaf".to_string(),
        parent: Some(Box::new(Node {
            name: "root".to_string(),
            parent: None,
        })),
    };
    let rows = Value::seq([Value::record(&leaf), Value::record(&root)]);

    let output = writer(Arc::new(registry), CsvFlavor::Csv).write_to_string(&rows)?;

    assert_eq!(output, "\"name\",\"parent\"\n\"leaf\",\"Node(root)\"\n\"root\",\n");
    Ok(())
}

#[test]
fn malformed_configuration_is_a_config_error() {
    let result = AttributeMapping::from_json("{\"header\": \"Age\"}");

    assert!(matches!(result, Err(CsvError::Config(_))));
}
