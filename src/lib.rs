#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 <div align="center">
   <h1>CSV Mapper for Rust</h1>
   <h3>Object graphs to CSV, with column layouts decided per class</h3>

   ![license](https://shields.io/badge/license-MIT%2FApache--2.0-blue)

  </div>

 # CSV Mapper for Rust

 **CSV Mapper** writes domain objects as CSV. It decides once per class which columns an object
 produces, flattens nested objects into sibling columns, and writes either plain CSV or CSV that
 spreadsheets open without mangling leading zeros and long numbers.

 ## Core Concepts

- **Record:** A domain object. It exposes its runtime `Class` (name, supertypes, declared accessor methods) and
  answers calls to those accessors by name.
- **AttributeMapping:** An ordered list of `ColumnSpec`s. A spec is either a column (a header plus one or more
  properties concatenated into one field) or a group (a property whose object is laid out by a nested mapping).
- **ClassMappingRegistry:** Decides, and caches, the layout of every class it meets: an explicitly registered
  mapping, a mapping derived from the accessors of the class, or a single opaque field.
- **CsvObjectWriter:** Walks a value and writes the header row and the data rows.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| json          | Reads `SerializationConfig` and `AttributeMapping` from JSON  |
| full          | Enables all available features                                |

 ## Getting Started

```rust
# use std::sync::Arc;
# use csv_mapper::{
#     core::{
#         class::{Class, Method, I32, STRING},
#         item::{Record, Value},
#         mapping::AttributeMapping,
#         registry::ClassMappingRegistryBuilder,
#     },
#     error::{AccessError, CsvError},
#     item::csv::csv_writer::CsvObjectWriterBuilder,
# };
struct Address {
    street: String,
    city: String,
}

static ADDRESS_METHODS: [Method; 2] = [
    Method::getter("getStreet", &STRING),
    Method::getter("getCity", &STRING),
];
static ADDRESS: Class = Class::object("Address", &ADDRESS_METHODS);

impl Record for Address {
    fn class(&self) -> &'static Class {
        &ADDRESS
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getStreet" => Ok(self.street.as_str().into()),
            "getCity" => Ok(self.city.as_str().into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

struct Person {
    name: String,
    age: i32,
    address: Option<Address>,
}

static PERSON_METHODS: [Method; 3] = [
    Method::getter("getName", &STRING),
    Method::getter("getAge", &I32),
    Method::getter("getAddress", &ADDRESS),
];
static PERSON: Class = Class::object("Person", &PERSON_METHODS);

impl Record for Person {
    fn class(&self) -> &'static Class {
        &PERSON
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getName" => Ok(self.name.as_str().into()),
            "getAge" => Ok(self.age.into()),
            "getAddress" => Ok(self.address.as_ref().map(Value::record).into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

fn main() -> Result<(), CsvError> {
    let address = AttributeMapping::new()
        .column("Street", "street")
        .column("City", "city");

    let registry = ClassMappingRegistryBuilder::new()
        .write_headers(true)
        .decompose_class(&PERSON)
        .decompose_class(&ADDRESS)
        .mapping(&PERSON, AttributeMapping::new()
            .column("Name", "name")
            .group("address", address)
            .column("Age", "age"))
        .build();

    let writer = CsvObjectWriterBuilder::new()
        .registry(Arc::new(registry))
        .line_terminator("\n")
        .build();

    let people = [
        Person {
            name: "Joe".to_string(),
            age: 30,
            address: Some(Address { street: "101 1st str".to_string(), city: "San Francisco".to_string() }),
        },
        Person { name: "Ann".to_string(), age: 41, address: None },
    ];

    let rows = Value::seq(people.iter().map(Value::record));
    let output = writer.write_to_string(&rows)?;

    assert_eq!(
        output,
        "\"Name\",\"Street\",\"City\",\"Age\"\n\
         \"Joe\",\"101 1st str\",\"San Francisco\",30\n\
         \"Ann\",,,41\n"
    );

    Ok(())
}
```

 ## Mapping failures

 Writing only fails when the destination fails. A class that cannot be decomposed is written as a
 single opaque field, and an accessor that fails leaves its field out of the row; both are logged at
 `debug` level through the `log` facade.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Classes, records, mappings and the registry deciding them
pub mod core;

/// Error types for serialization
pub mod error;

#[doc(inline)]
pub use error::*;

/// Writers (csv object writer and its variants)
pub mod item;
