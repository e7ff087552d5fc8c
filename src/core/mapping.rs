use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use log::trace;
use serde::{Deserialize, Deserializer};

use crate::{
    core::{
        class::{capitalize, Class, Method, Shape},
        item::{Record, Value},
    },
    error::AccessError,
};

/// One way of reading a column value from a record.
#[derive(Debug, Clone)]
pub enum Getter {
    /// Accessor method of the record's class.
    Method(&'static Method),
    /// Fixed text, used when the class has no accessor for the property.
    Literal(String),
}

impl Getter {
    pub fn read<'r>(&self, record: &'r dyn Record) -> Result<Value<'r>, AccessError> {
        match self {
            Getter::Method(method) => record.invoke(method.name()),
            Getter::Literal(text) => Ok(Value::Text(Cow::Owned(text.clone()))),
        }
    }
}

/// Getters of one column spec, resolved against one concrete class.
#[derive(Debug)]
pub struct GetterPlan {
    class: &'static str,
    getters: Vec<Getter>,
}

impl GetterPlan {
    /// Looks up an accessor for each property; a property without one
    /// becomes its capitalized name as a literal.
    pub fn resolve(class: &'static Class, properties: &[String]) -> GetterPlan {
        let getters = properties
            .iter()
            .map(|property| match class.find_getter(property) {
                Some(method) => Getter::Method(method),
                None => Getter::Literal(capitalize(property)),
            })
            .collect();

        GetterPlan {
            class: class.name(),
            getters,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class
    }

    pub fn getters(&self) -> &[Getter] {
        &self.getters
    }

    pub fn len(&self) -> usize {
        self.getters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// True when several getters compose a single column.
    pub fn is_composed(&self) -> bool {
        self.getters.len() > 1
    }
}

/// What a column spec produces.
#[derive(Debug)]
pub enum ColumnKind {
    /// One column, composed from one or more properties.
    Leaf {
        header: String,
        properties: Vec<String>,
    },
    /// The columns of a nested object, described by a child mapping.
    Group {
        property: String,
        mapping: Arc<AttributeMapping>,
    },
}

/// One unit of column-producing configuration.
pub struct ColumnSpec {
    kind: ColumnKind,
    plan: RwLock<Option<Arc<GetterPlan>>>,
}

impl ColumnSpec {
    pub fn new(kind: ColumnKind) -> ColumnSpec {
        ColumnSpec {
            kind,
            plan: RwLock::new(None),
        }
    }

    /// A column named `header` reading a single property.
    pub fn column(header: impl Into<String>, property: impl Into<String>) -> ColumnSpec {
        ColumnSpec::leaf(header, [property])
    }

    /// A column named `header` concatenating several properties.
    pub fn leaf<I, S>(header: impl Into<String>, properties: I) -> ColumnSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSpec::new(ColumnKind::Leaf {
            header: header.into(),
            properties: properties.into_iter().map(Into::into).collect(),
        })
    }

    /// Columns of the object held by `property`, laid out by `mapping`.
    pub fn group(property: impl Into<String>, mapping: impl Into<Arc<AttributeMapping>>) -> ColumnSpec {
        ColumnSpec::new(ColumnKind::Group {
            property: property.into(),
            mapping: mapping.into(),
        })
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn header(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Leaf { header, .. } => Some(header.as_str()),
            ColumnKind::Group { .. } => None,
        }
    }

    pub fn properties(&self) -> &[String] {
        match &self.kind {
            ColumnKind::Leaf { properties, .. } => properties.as_slice(),
            ColumnKind::Group { property, .. } => std::slice::from_ref(property),
        }
    }

    pub fn child(&self) -> Option<&AttributeMapping> {
        match &self.kind {
            ColumnKind::Leaf { .. } => None,
            ColumnKind::Group { mapping, .. } => Some(&**mapping),
        }
    }

    /// Getters for `class`, resolved on first use and cached.
    ///
    /// The cache holds one class at a time; a spec shared by several classes
    /// is re-resolved whenever the class changes.
    pub fn getters_for(&self, class: &'static Class) -> Arc<GetterPlan> {
        if let Some(plan) = self.plan.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            if plan.class == class.name() {
                return Arc::clone(plan);
            }
        }

        let plan = Arc::new(GetterPlan::resolve(class, self.properties()));
        trace!(
            "Resolved getters {:?} of {} for {}",
            plan.getters,
            self.properties().join("+"),
            class.name()
        );
        *self.plan.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&plan));
        plan
    }

    /// Currently cached getters, if any.
    pub fn cached_getters(&self) -> Option<Arc<GetterPlan>> {
        self.plan.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind, f)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnDef {
    Leaf {
        header: String,
        properties: Vec<String>,
    },
    Column {
        header: String,
        property: String,
    },
    Group {
        property: String,
        mapping: AttributeMapping,
    },
}

impl<'de> Deserialize<'de> for ColumnSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ColumnDef::deserialize(deserializer)? {
            ColumnDef::Leaf { header, properties } => ColumnSpec::leaf(header, properties),
            ColumnDef::Column { header, property } => ColumnSpec::column(header, property),
            ColumnDef::Group { property, mapping } => ColumnSpec::group(property, mapping),
        })
    }
}

/// Ordered column specs describing how one class is laid out as columns.
///
/// ```
/// use csv_mapper::core::mapping::AttributeMapping;
///
/// let address = AttributeMapping::new()
///     .column("Street", "street")
///     .column("City", "city");
/// let person = AttributeMapping::new()
///     .group("address", address)
///     .column("LastName", "lastName")
///     .composed("Name", ["firstName", "lastName"]);
///
/// assert_eq!(person.len(), 3);
/// assert_eq!(person.headers(), vec!["Street", "City", "LastName", "Name"]);
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct AttributeMapping {
    columns: Vec<ColumnSpec>,
}

impl AttributeMapping {
    pub fn new() -> AttributeMapping {
        AttributeMapping::default()
    }

    pub fn push(&mut self, spec: ColumnSpec) {
        self.columns.push(spec);
    }

    pub fn with(mut self, spec: ColumnSpec) -> AttributeMapping {
        self.push(spec);
        self
    }

    pub fn column(self, header: impl Into<String>, property: impl Into<String>) -> AttributeMapping {
        self.with(ColumnSpec::column(header, property))
    }

    pub fn composed<I, S>(self, header: impl Into<String>, properties: I) -> AttributeMapping
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(ColumnSpec::leaf(header, properties))
    }

    pub fn group(self, property: impl Into<String>, mapping: impl Into<Arc<AttributeMapping>>) -> AttributeMapping {
        self.with(ColumnSpec::group(property, mapping))
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column headers, depth-first through nested groups.
    pub fn headers(&self) -> Vec<&str> {
        let mut headers = Vec::new();
        self.collect_headers(&mut headers);
        headers
    }

    fn collect_headers<'s>(&'s self, headers: &mut Vec<&'s str>) {
        for spec in &self.columns {
            match &spec.kind {
                ColumnKind::Leaf { header, .. } => headers.push(header),
                ColumnKind::Group { mapping, .. } => mapping.collect_headers(headers),
            }
        }
    }

    /// Resolves the getters of the whole mapping tree for `class`, following
    /// the declared return types into nested groups.
    pub fn prepare(&self, class: &'static Class) {
        if class.is_container() {
            return;
        }

        for spec in &self.columns {
            let plan = spec.getters_for(class);
            if let Some(child) = spec.child() {
                for getter in plan.getters() {
                    if let Getter::Method(method) = getter {
                        if let Shape::Object = method.returns().shape() {
                            child.prepare(method.returns());
                        }
                    }
                }
            }
        }
    }

    /// Parses a mapping from its JSON definition.
    ///
    /// Each column is either `{"header": .., "property": ..}`,
    /// `{"header": .., "properties": [..]}` or
    /// `{"property": .., "mapping": [..]}` for a nested group.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<AttributeMapping, crate::error::CsvError> {
        serde_json::from_str(json).map_err(|error| crate::error::CsvError::Config(error.to_string()))
    }
}
