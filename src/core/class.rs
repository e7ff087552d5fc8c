use std::fmt;

/// Structural kind of a [`Class`].
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Numbers, booleans, characters.
    Primitive,
    /// Strings.
    Text,
    /// A type exposing accessor methods.
    Object,
    /// Fixed-size array of the element class.
    Array(&'static Class),
    /// Growable collection, optionally declaring its element class.
    Collection(Option<&'static Class>),
}

/// A method declared on a [`Class`].
///
/// Only public, zero-argument methods following the accessor naming
/// convention take part in default decomposition and getter lookup.
pub struct Method {
    name: &'static str,
    returns: &'static Class,
    arity: usize,
    public: bool,
}

impl Method {
    /// Public method taking `arity` arguments.
    pub const fn new(name: &'static str, returns: &'static Class, arity: usize) -> Method {
        Method {
            name,
            returns,
            arity,
            public: true,
        }
    }

    /// Public zero-argument method.
    pub const fn getter(name: &'static str, returns: &'static Class) -> Method {
        Method::new(name, returns, 0)
    }

    pub const fn private(self) -> Method {
        Method {
            public: false,
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn returns(&self) -> &'static Class {
        self.returns
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Property exposed by this method, if it is a public zero-argument
    /// accessor.
    pub fn property_name(&self) -> Option<String> {
        if !self.public || self.arity != 0 {
            return None;
        }
        property_name(self.name)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} -> {}", self.name, self.arity, self.returns.name)
    }
}

/// Runtime description of a type, registered at compile time.
///
/// Classes are identified by name, so names must be unique within a process.
/// Declare them as statics so that methods and supertypes can refer to each
/// other:
///
/// ```
/// use csv_mapper::core::class::{Class, Method, STRING};
///
/// static ADDRESS_METHODS: [Method; 2] = [
///     Method::getter("getStreet", &STRING),
///     Method::getter("getCity", &STRING),
/// ];
/// static ADDRESS: Class = Class::object("UsAddress", &ADDRESS_METHODS);
///
/// assert_eq!(ADDRESS.accessors().count(), 2);
/// ```
pub struct Class {
    name: &'static str,
    shape: Shape,
    supertypes: &'static [&'static Class],
    methods: &'static [Method],
}

impl Class {
    pub const fn object(name: &'static str, methods: &'static [Method]) -> Class {
        Class {
            name,
            shape: Shape::Object,
            supertypes: &[],
            methods,
        }
    }

    pub const fn primitive(name: &'static str) -> Class {
        Class {
            name,
            shape: Shape::Primitive,
            supertypes: &[],
            methods: &[],
        }
    }

    pub const fn text(name: &'static str) -> Class {
        Class {
            name,
            shape: Shape::Text,
            supertypes: &[],
            methods: &[],
        }
    }

    pub const fn array(name: &'static str, element: &'static Class) -> Class {
        Class {
            name,
            shape: Shape::Array(element),
            supertypes: &[],
            methods: &[],
        }
    }

    pub const fn collection(name: &'static str, element: Option<&'static Class>) -> Class {
        Class {
            name,
            shape: Shape::Collection(element),
            supertypes: &[],
            methods: &[],
        }
    }

    /// Declares the direct supertypes of this class.
    pub const fn extends(self, supertypes: &'static [&'static Class]) -> Class {
        Class { supertypes, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn supertypes(&self) -> &'static [&'static Class] {
        self.supertypes
    }

    /// Methods declared directly on this class, in declaration order.
    pub fn methods(&self) -> &'static [Method] {
        self.methods
    }

    /// Declared methods that follow the accessor convention, paired with the
    /// property they expose.
    pub fn accessors(&self) -> impl Iterator<Item = (String, &'static Method)> {
        self.methods
            .iter()
            .filter_map(|method| method.property_name().map(|property| (property, method)))
    }

    /// True for primitives and text.
    pub fn is_scalar(&self) -> bool {
        matches!(self.shape, Shape::Primitive | Shape::Text)
    }

    /// True for arrays and collections.
    pub fn is_container(&self) -> bool {
        matches!(self.shape, Shape::Array(_) | Shape::Collection(_))
    }

    /// Element class of an array or collection.
    pub fn element(&self) -> Option<&'static Class> {
        match self.shape {
            Shape::Array(element) => Some(element),
            Shape::Collection(element) => element,
            _ => None,
        }
    }

    /// True if this class is `name` or transitively extends it.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.name == name
            || self
                .supertypes
                .iter()
                .any(|supertype| supertype.is_subclass_of(name))
    }

    /// Finds a public zero-argument method by exact name, looking at the
    /// class first and then at its supertypes.
    pub fn find_method(&self, name: &str) -> Option<&'static Method> {
        self.methods
            .iter()
            .find(|method| method.public && method.arity == 0 && method.name == name)
            .or_else(|| {
                self.supertypes
                    .iter()
                    .find_map(|supertype| supertype.find_method(name))
            })
    }

    /// Finds the accessor reading `property`: `getX`, then `isX`, then the
    /// snake-case forms `get_x` and `is_x`.
    pub fn find_getter(&self, property: &str) -> Option<&'static Method> {
        let capitalized = capitalize(property);
        [
            format!("get{capitalized}"),
            format!("is{capitalized}"),
            format!("get_{property}"),
            format!("is_{property}"),
        ]
        .iter()
        .find_map(|candidate| self.find_method(candidate))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Class {}

pub static BOOL: Class = Class::primitive("bool");
pub static CHAR: Class = Class::primitive("char");
pub static I32: Class = Class::primitive("i32");
pub static I64: Class = Class::primitive("i64");
pub static U32: Class = Class::primitive("u32");
pub static U64: Class = Class::primitive("u64");
pub static F32: Class = Class::primitive("f32");
pub static F64: Class = Class::primitive("f64");
pub static STRING: Class = Class::text("String");

/// Property exposed by an accessor method name.
///
/// `getFirstName` and `isActive` give `firstName` and `active`; the
/// snake-case forms `get_first_name` and `is_active` give `first_name` and
/// `active`. Anything else, including a bare `get` or `is`, gives `None`.
pub fn property_name(method: &str) -> Option<String> {
    for prefix in ["get_", "is_"] {
        if let Some(rest) = method.strip_prefix(prefix) {
            return (!rest.is_empty()).then(|| rest.to_string());
        }
    }
    for prefix in ["get", "is"] {
        if let Some(rest) = method.strip_prefix(prefix) {
            return (!rest.is_empty()).then(|| decapitalize(rest));
        }
    }
    None
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
