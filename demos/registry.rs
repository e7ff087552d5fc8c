use std::{env::temp_dir, fs::File, io, sync::Arc};

use csv_mapper::{
    core::{
        class::{Class, Method, F64, STRING},
        config::SerializationConfig,
        item::{Record, Value},
        registry::ClassMappingRegistry,
    },
    error::{AccessError, CsvError},
    item::csv::provider::CsvWriters,
};

use log::info;

struct Supplier {
    name: String,
    zip: String,
}

static SUPPLIER_METHODS: [Method; 2] = [
    Method::getter("getName", &STRING),
    Method::getter("getZip", &STRING),
];
static SUPPLIER: Class = Class::object("Supplier", &SUPPLIER_METHODS);

impl Record for Supplier {
    fn class(&self) -> &'static Class {
        &SUPPLIER
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getName" => Ok(self.name.as_str().into()),
            "getZip" => Ok(self.zip.as_str().into()),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

struct Product {
    isbn: String,
    title: String,
    price: f64,
    supplier: Option<Supplier>,
    tags: Vec<&'static str>,
}

static TAGS: Class = Class::collection("Vec<&str>", Some(&STRING));
static PRODUCT_METHODS: [Method; 5] = [
    Method::getter("getIsbn", &STRING),
    Method::getter("getTitle", &STRING),
    Method::getter("getPrice", &F64),
    Method::getter("getSupplier", &SUPPLIER),
    Method::getter("getTags", &TAGS),
];
static PRODUCT: Class = Class::object("Product", &PRODUCT_METHODS);

impl Record for Product {
    fn class(&self) -> &'static Class {
        &PRODUCT
    }

    fn invoke(&self, method: &str) -> Result<Value<'_>, AccessError> {
        match method {
            "getIsbn" => Ok(self.isbn.as_str().into()),
            "getTitle" => Ok(self.title.as_str().into()),
            "getPrice" => Ok(self.price.into()),
            "getSupplier" => Ok(self.supplier.as_ref().map(Value::record).into()),
            "getTags" => Ok(Value::seq(self.tags.iter().copied())),
            _ => Err(AccessError::no_such_method(method)),
        }
    }
}

const CONFIG: &str = r#"{
    "write_headers": true,
    "decompose_classes": ["Product", "Supplier"],
    "mappings": [
        {"class": "Product", "columns": [
            {"header": "ISBN", "property": "isbn"},
            {"header": "Title", "property": "title"},
            {"header": "Price", "property": "price"},
            {"property": "supplier", "mapping": [
                {"header": "Supplier", "properties": ["name", " (", "zip", ")"]}
            ]},
            {"header": "Tags", "property": "tags"}
        ]}
    ]
}"#;

fn main() -> Result<(), CsvError> {
    env_logger::init();

    let registry = Arc::new(ClassMappingRegistry::new(SerializationConfig::from_json(CONFIG)?));
    let writers = CsvWriters::new(registry);

    let products = vec![
        Product {
            isbn: "0071208413".to_string(),
            title: "Compilers".to_string(),
            price: 89.5,
            supplier: Some(Supplier {
                name: "Acme Books".to_string(),
                zip: "02108".to_string(),
            }),
            tags: vec!["theory", "textbook"],
        },
        Product {
            isbn: "9780077406691".to_string(),
            title: "Operating Systems".to_string(),
            price: 112.0,
            supplier: None,
            tags: Vec::new(),
        },
    ];
    let rows = Value::seq(products.iter().map(Value::record));

    info!("Writing {} products as {}", products.len(), writers.csv().flavor().media_type());
    writers.for_media_type("text/csv").serialize(&rows, io::stdout().lock())?;

    let path = temp_dir().join("example-products-excel.csv");
    info!("Writing {} products as {} to {:?}", products.len(), writers.excel().flavor().media_type(), path);
    writers
        .for_media_type("application/vnd.ms-excel")
        .serialize(&rows, File::create(&path)?)?;

    Ok(())
}
