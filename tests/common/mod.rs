#![allow(dead_code)]

pub mod mocks;

pub use mocks::MockSink;

use std::sync::Arc;

use csv_mapper::{
    core::{
        registry::{ClassMappingRegistry, ClassMappingRegistryBuilder},
        test_support::{person_mapping, PERSON, US_ADDRESS},
    },
    item::csv::{
        csv_writer::{CsvObjectWriter, CsvObjectWriterBuilder},
        quoting::CsvFlavor,
    },
};

/// Registry laying out persons with their address first.
pub fn person_registry(write_headers: bool) -> Arc<ClassMappingRegistry> {
    Arc::new(
        ClassMappingRegistryBuilder::new()
            .write_headers(write_headers)
            .mapping(&PERSON, person_mapping())
            .decompose_class(&PERSON)
            .decompose_class(&US_ADDRESS)
            .build(),
    )
}

pub fn writer(registry: Arc<ClassMappingRegistry>, flavor: CsvFlavor) -> CsvObjectWriter {
    CsvObjectWriterBuilder::new()
        .registry(registry)
        .flavor(flavor)
        .line_terminator("\n")
        .build()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
