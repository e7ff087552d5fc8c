pub mod common;

use std::{error::Error, fs, sync::Arc, thread};

use csv::ReaderBuilder;
use tempfile::NamedTempFile;

use common::{init_logger, person_registry, writer};
use csv_mapper::{
    core::{
        class::{Class, Method, I32},
        config::SerializationConfig,
        item::{Record, Value},
        registry::{ClassMappingRegistry, ClassMappingRegistryBuilder},
        test_support::{Book, Person, UsAddress, PERSON},
    },
    error::AccessError,
    item::csv::{provider::CsvWriters, quoting::CsvFlavor},
};

const PERSON_HEADER: &str = "\"Street\",\"City\",\"State\",\"LastName\",\"FirstName\",\"Age\"";

static EMPLOYEE_SUPERTYPES: [&Class; 1] = [&PERSON];
static EMPLOYEE_METHODS: [Method; 1] = [Method::getter("getBadge", &I32)];
static EMPLOYEE: Class = Class::object("Employee", &EMPLOYEE_METHODS).extends(&EMPLOYEE_SUPERTYPES);

struct Employee {
    person: Person,
    badge: i32,
}

impl Record for Employee {
    fn class(&self) -> &'static Class {
        &EMPLOYEE
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getBadge" => Ok(self.badge.into()),
            _ => self.person.invoke(method),
        }
    }
}

fn people() -> Vec<Person> {
    vec![
        Person::new("Joe", "Doe", 30, Some(UsAddress::new("101 1st str", "San Francisco", "CA"))),
        Person::new("Jane", "Roe", 27, None),
        Person::new("Said \"Sam\"", "Smith", 45, Some(UsAddress::new("9 Elm, Apt 2", "Austin", "TX"))),
    ]
}

#[test]
fn sequence_of_records_writes_one_row_each() -> Result<(), Box<dyn Error>> {
    init_logger();
    let people = people();
    let rows = Value::seq(people.iter().map(Value::record));

    let output = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&rows)?;

    let expected = [
        PERSON_HEADER,
        "\"101 1st str\",\"San Francisco\",\"CA\",\"Doe\",\"Joe\",30",
        ",,,\"Roe\",\"Jane\",27",
        "\"9 Elm, Apt 2\",\"Austin\",\"TX\",\"Smith\",\"Said \"\"Sam\"\"\",45",
    ];
    assert_eq!(output, format!("{}\n", expected.join("\n")));
    Ok(())
}

#[test]
fn output_reads_back_as_standard_csv() -> Result<(), Box<dyn Error>> {
    let people = people();
    let rows = Value::seq(people.iter().map(Value::record));
    let output = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&rows)?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(output.as_bytes());

    let headers = reader.headers()?.clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), ["Street", "City", "State", "LastName", "FirstName", "Age"]);

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][0], "101 1st str");
    assert_eq!(&records[1][0], "");
    assert_eq!(&records[1][3], "Roe");
    assert_eq!(&records[2][0], "9 Elm, Apt 2");
    assert_eq!(&records[2][4], "Said \"Sam\"");
    assert!(records.iter().all(|record| record.len() == headers.len()));
    Ok(())
}

#[test]
fn excel_flavor_keeps_leading_zeros() -> Result<(), Box<dyn Error>> {
    let registry = ClassMappingRegistryBuilder::new()
        .write_headers(true)
        .decompose_by_default(true)
        .build();
    let office = UsAddress::new("1 Main str", "Boston", "MA").with_zip("0071208413");

    let output = writer(Arc::new(registry), CsvFlavor::Excel).write_to_string(&Value::seq([Value::record(&office)]))?;

    assert_eq!(
        output,
        "=\"street\",=\"city\",=\"state\",=\"zip\"\n\
         =\"1 Main str\",=\"Boston\",=\"MA\",=\"0071208413\"\n"
    );
    Ok(())
}

#[test]
fn excel_flavor_leaves_fields_with_commas_unprefixed() -> Result<(), Box<dyn Error>> {
    let people = people();

    let output = writer(person_registry(false), CsvFlavor::Excel).write_to_string(&Value::record(&people[2]))?;

    assert_eq!(output, "\"9 Elm, Apt 2\",=\"Austin\",=\"TX\",=\"Smith\",=\"Said \"\"Sam\"\"\",=\"45\"");
    Ok(())
}

#[test]
fn subclasses_share_the_mapping_of_their_supertype() -> Result<(), Box<dyn Error>> {
    let people = people();
    let employee = Employee {
        person: Person::new("Ann", "Lee", 38, None),
        badge: 7,
    };
    let rows = Value::seq([Value::record(&people[0]), Value::record(&employee), Value::record(&people[1])]);

    let output = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&rows)?;

    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[0], PERSON_HEADER);
    assert_eq!(lines[1], "\"101 1st str\",\"San Francisco\",\"CA\",\"Doe\",\"Joe\",30");
    assert_eq!(lines[2], ",,,\"Lee\",\"Ann\",38");
    assert_eq!(lines[3], ",,,\"Roe\",\"Jane\",27");
    Ok(())
}

#[test]
fn nested_sequences_become_single_fields() -> Result<(), Box<dyn Error>> {
    let rows = Value::seq([Value::seq(["a", "b"]), Value::seq(["c"])]);

    let output = writer(Arc::new(ClassMappingRegistry::default()), CsvFlavor::Csv).write_to_string(&rows)?;

    assert_eq!(output, "\"a, b\"\n\"c\"\n");
    Ok(())
}

#[test]
fn collection_properties_join_their_elements() -> Result<(), Box<dyn Error>> {
    let registry = ClassMappingRegistryBuilder::new()
        .decompose_by_default(true)
        .build();
    let book = Book {
        title: "The Rust Programming Language".to_string(),
        isbns: vec!["9781718503106".to_string(), "9781718503113".to_string()],
    };

    let output = writer(Arc::new(registry), CsvFlavor::Excel).write_to_string(&Value::record(&book))?;

    assert_eq!(output, "=\"The Rust Programming Language\",\"9781718503106, 9781718503113\"");
    Ok(())
}

#[test]
fn records_are_written_to_files() -> Result<(), Box<dyn Error>> {
    let people = people();
    let rows = Value::seq(people.iter().map(Value::record));
    let file = NamedTempFile::new()?;

    writer(person_registry(true), CsvFlavor::Csv).serialize(&rows, file.reopen()?)?;

    let content = fs::read_to_string(file.path())?;
    assert!(content.starts_with(PERSON_HEADER));
    assert_eq!(content.lines().count(), 4);
    Ok(())
}

#[test]
fn json_configuration_matches_the_builder() -> Result<(), Box<dyn Error>> {
    let config = SerializationConfig::from_json(
        r#"{
            "write_headers": true,
            "decompose_classes": ["Person", "UsAddress"],
            "mappings": [
                {"class": "Person", "columns": [
                    {"property": "address", "mapping": [
                        {"header": "Street", "property": "street"},
                        {"header": "City", "property": "city"},
                        {"header": "State", "property": "state"}
                    ]},
                    {"header": "LastName", "property": "lastName"},
                    {"header": "FirstName", "property": "firstName"},
                    {"header": "Age", "property": "age"}
                ]}
            ]
        }"#,
    )?;
    let people = people();
    let rows = Value::seq(people.iter().map(Value::record));

    let from_json = writer(Arc::new(ClassMappingRegistry::new(config)), CsvFlavor::Csv).write_to_string(&rows)?;
    let from_builder = writer(person_registry(true), CsvFlavor::Csv).write_to_string(&rows)?;

    assert_eq!(from_json, from_builder);
    Ok(())
}

#[test]
fn writers_share_one_registry_across_threads() -> Result<(), Box<dyn Error>> {
    let registry = person_registry(true);
    let writers = CsvWriters::new(Arc::clone(&registry));
    let people = people();

    let outputs = thread::scope(|scope| {
        let handles: Vec<_> = ["text/csv", "application/vnd.ms-excel", "text/csv", "application/vnd.ms-excel"]
            .into_iter()
            .map(|media_type| {
                let writers = &writers;
                let people = &people;
                scope.spawn(move || {
                    let rows = Value::seq(people.iter().map(Value::record));
                    writers.for_media_type(media_type).write_to_string(&rows)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    assert_eq!(outputs[0], outputs[2]);
    assert_eq!(outputs[1], outputs[3]);
    assert!(outputs[1].starts_with("=\"Street\""));
    assert!(registry.cached(&PERSON).is_some());
    Ok(())
}
