//! Sample records shared by unit and integration tests.

use crate::{
    core::{
        class::{Class, Method, BOOL, F64, I32, STRING},
        item::{Record, Value},
        mapping::AttributeMapping,
    },
    error::AccessError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
}

impl UsAddress {
    pub fn new(street: &str, city: &str, state: &str) -> UsAddress {
        UsAddress {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: None,
        }
    }

    pub fn with_zip(mut self, zip: &str) -> UsAddress {
        self.zip = Some(zip.to_string());
        self
    }
}

pub static US_ADDRESS_METHODS: [Method; 4] = [
    Method::getter("getStreet", &STRING),
    Method::getter("getCity", &STRING),
    Method::getter("getState", &STRING),
    Method::getter("getZip", &STRING),
];
pub static US_ADDRESS: Class = Class::object("UsAddress", &US_ADDRESS_METHODS);

impl Record for UsAddress {
    fn class(&self) -> &'static Class {
        &US_ADDRESS
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getStreet" => Ok(self.street.as_str().into()),
            "getCity" => Ok(self.city.as_str().into()),
            "getState" => Ok(self.state.as_str().into()),
            "getZip" => Ok(self.zip.as_deref().into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }

    fn opaque_text(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.state)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub address: Option<UsAddress>,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str, age: i32, address: Option<UsAddress>) -> Person {
        Person {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            address,
        }
    }
}

pub static PERSON_METHODS: [Method; 6] = [
    Method::getter("getFirstName", &STRING),
    Method::new("setFirstName", &STRING, 1),
    Method::getter("getLastName", &STRING),
    Method::getter("getAge", &I32),
    Method::getter("getAddress", &US_ADDRESS),
    Method::getter("getInternalId", &I32).private(),
];
pub static PERSON: Class = Class::object("Person", &PERSON_METHODS);

impl Record for Person {
    fn class(&self) -> &'static Class {
        &PERSON
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getFirstName" => Ok(self.first_name.as_str().into()),
            "getLastName" => Ok(self.last_name.as_str().into()),
            "getAge" => Ok(self.age.into()),
            "getAddress" => Ok(self.address.as_ref().map(Value::record).into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

/// The default person mapping: address expanded first, then names and age.
pub fn person_mapping() -> AttributeMapping {
    let address = AttributeMapping::new()
        .column("Street", "street")
        .column("City", "city")
        .column("State", "state");

    AttributeMapping::new()
        .group("address", address)
        .column("LastName", "lastName")
        .column("FirstName", "firstName")
        .column("Age", "age")
}

/// A record whose accessors can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    pub label: String,
    pub reading: f64,
    pub active: bool,
    pub broken: Vec<&'static str>,
}

pub static GAUGE_METHODS: [Method; 3] = [
    Method::getter("getLabel", &STRING),
    Method::getter("getReading", &F64),
    Method::getter("isActive", &BOOL),
];
pub static GAUGE: Class = Class::object("Gauge", &GAUGE_METHODS);

impl Record for Gauge {
    fn class(&self) -> &'static Class {
        &GAUGE
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        if self.broken.iter().any(|broken| *broken == method) {
            return Err(AccessError::failed(method, "sensor offline"));
        }
        match method {
            "getLabel" => Ok(self.label.as_str().into()),
            "getReading" => Ok(self.reading.into()),
            "isActive" => Ok(self.active.into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

/// A self-referencing class.
#[derive(Debug, Default)]
pub struct Node {
    pub name: String,
    pub parent: Option<Box<Node>>,
}

pub static NODE_METHODS: [Method; 2] = [
    Method::getter("getName", &STRING),
    Method::getter("getParent", &NODE),
];
pub static NODE: Class = Class::object("Node", &NODE_METHODS);

impl Record for Node {
    fn class(&self) -> &'static Class {
        &NODE
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getName" => Ok(self.name.as_str().into()),
            "getParent" => Ok(self.parent.as_deref().map(Value::record).into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }

    fn opaque_text(&self) -> String {
        format!("Node({})", self.name)
    }
}

/// A record holding a list of strings.
#[derive(Debug, Default)]
pub struct Book {
    pub title: String,
    pub isbns: Vec<String>,
}

pub static STRINGS: Class = Class::collection("Vec<String>", Some(&STRING));
pub static BOOK_METHODS: [Method; 2] = [
    Method::getter("getTitle", &STRING),
    Method::getter("getIsbns", &STRINGS),
];
pub static BOOK: Class = Class::object("Book", &BOOK_METHODS);

impl Record for Book {
    fn class(&self) -> &'static Class {
        &BOOK
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getTitle" => Ok(self.title.as_str().into()),
            "getIsbns" => Ok(Value::seq(self.isbns.iter())),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}
