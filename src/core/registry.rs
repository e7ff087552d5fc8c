use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;

use crate::core::{
    class::{Class, Shape},
    config::{ClassMapping, SerializationConfig},
    mapping::{AttributeMapping, ColumnSpec},
};

/// Decision recorded for a class.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Rendered as a single field through its opaque text.
    Opaque,
    /// Decomposed into the columns of the mapping.
    Composed(Arc<AttributeMapping>),
}

impl Resolution {
    pub fn mapping(&self) -> Option<&AttributeMapping> {
        match self {
            Resolution::Opaque => None,
            Resolution::Composed(mapping) => Some(&**mapping),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Resolution::Opaque)
    }
}

/// Cached decision and the classes decomposed to reach it.
#[derive(Debug)]
struct Entry {
    resolution: Resolution,
    reach: Arc<[&'static str]>,
}

/// Decision under construction.
struct Outcome {
    resolution: Resolution,
    reach: Vec<&'static str>,
    /// Shallowest stack depth at which a type cycle was cut.
    cut: Option<usize>,
}

impl Outcome {
    fn settled(resolution: Resolution) -> Outcome {
        Outcome {
            resolution,
            reach: Vec::new(),
            cut: None,
        }
    }

    fn absorb(&mut self, child: &Outcome) {
        for name in &child.reach {
            if !self.reach.contains(name) {
                self.reach.push(*name);
            }
        }
        self.cut = match (self.cut, child.cut) {
            (Some(own), Some(theirs)) => Some(own.min(theirs)),
            (own, theirs) => own.or(theirs),
        };
    }
}

/// Decides, per class, how objects are laid out as columns.
///
/// Decisions are computed on first lookup and cached for the lifetime of the
/// registry. The registry is meant to be shared (`Arc`) by every writer of a
/// process; concurrent lookups of an uncached class may compute it twice,
/// and the last write wins.
///
/// Classes referring to each other are decomposed until the first class
/// repeats, which becomes an opaque column. A decision shaped by a cycle
/// closed above it is not cached, so every class resolves to the same
/// layout whichever class was looked up first.
///
/// ```
/// use csv_mapper::core::class::{Class, Method, STRING};
/// use csv_mapper::core::registry::ClassMappingRegistryBuilder;
///
/// static CITY_METHODS: [Method; 2] = [
///     Method::getter("getName", &STRING),
///     Method::getter("getCountry", &STRING),
/// ];
/// static CITY: Class = Class::object("City", &CITY_METHODS);
///
/// let registry = ClassMappingRegistryBuilder::new()
///     .decompose_by_default(true)
///     .build();
///
/// let resolution = registry.resolve(&CITY);
/// assert_eq!(resolution.mapping().unwrap().headers(), vec!["name", "country"]);
/// ```
#[derive(Debug)]
pub struct ClassMappingRegistry {
    config: SerializationConfig,
    explicit: RwLock<Vec<ClassMapping>>,
    cache: RwLock<HashMap<&'static str, Entry>>,
}

impl ClassMappingRegistry {
    pub fn new(mut config: SerializationConfig) -> ClassMappingRegistry {
        let explicit = std::mem::take(&mut config.mappings);
        ClassMappingRegistry {
            config,
            explicit: RwLock::new(explicit),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SerializationConfig {
        &self.config
    }

    pub fn write_headers(&self) -> bool {
        self.config.write_headers
    }

    /// Registers `mapping` for `class` and its subclasses, replacing any
    /// previous explicit mapping of that class. Cached decisions are dropped.
    pub fn register(&self, class: &Class, mapping: impl Into<Arc<AttributeMapping>>) {
        {
            let mut explicit = self.explicit.write().unwrap_or_else(PoisonError::into_inner);
            explicit.retain(|entry| entry.class != class.name());
            explicit.push(ClassMapping {
                class: class.name().to_string(),
                columns: mapping.into(),
            });
        }
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
        debug!("Registered explicit mapping for {}", class.name());
    }

    /// Cached decision for `class`, if it was already resolved.
    pub fn cached(&self, class: &Class) -> Option<Resolution> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class.name())
            .map(|entry| entry.resolution.clone())
    }

    /// Decision for `class`, computed and cached on first lookup.
    ///
    /// 1. an explicit mapping of the class or of one of its supertypes;
    /// 2. the default policy and its override lists;
    /// 3. containers resolve their element class and stay opaque;
    /// 4. scalars are opaque;
    /// 5. anything else gets a default decomposition of its accessors.
    pub fn resolve(&self, class: &'static Class) -> Resolution {
        self.resolve_tracked(class, &mut Vec::new()).resolution
    }

    /// True if objects of `class` must be rendered as opaque text even when
    /// a mapping is at hand.
    pub fn needs_to_string(&self, class: &Class) -> bool {
        if self
            .config
            .opaque_classes
            .iter()
            .any(|name| class.is_subclass_of(name))
        {
            return true;
        }

        if !self.config.decompose_by_default
            && self
                .config
                .decompose_classes
                .iter()
                .any(|name| class.is_subclass_of(name))
        {
            return false;
        }

        !self.config.decompose_by_default
    }

    fn resolve_tracked(&self, class: &'static Class, visiting: &mut Vec<&'static str>) -> Outcome {
        if let Some(entry) = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(class.name()) {
            // a decision reaching a class being decomposed would be cut differently here
            if entry.reach.iter().all(|name| !visiting.contains(name)) {
                return Outcome {
                    resolution: entry.resolution.clone(),
                    reach: entry.reach.to_vec(),
                    cut: None,
                };
            }
        }

        let depth = visiting.len();
        if let Some(cut) = visiting.iter().position(|name| *name == class.name()) {
            debug!("Class {} is already being decomposed, rendering it as opaque", class.name());
            return Outcome {
                resolution: Resolution::Opaque,
                reach: Vec::new(),
                cut: Some(cut),
            };
        }

        visiting.push(class.name());
        let mut outcome = self.compute(class, visiting);
        visiting.pop();

        if !outcome.reach.contains(&class.name()) {
            outcome.reach.push(class.name());
        }
        // a cycle closed at this class or below looks the same from any starting class
        if outcome.cut.is_some_and(|cut| cut >= depth) {
            outcome.cut = None;
        }

        debug!(
            "Resolved class {} as {}",
            class.name(),
            match &outcome.resolution {
                Resolution::Opaque => "opaque".to_string(),
                Resolution::Composed(mapping) => format!("{} columns", mapping.len()),
            }
        );
        match outcome.cut {
            None => {
                self.cache.write().unwrap_or_else(PoisonError::into_inner).insert(
                    class.name(),
                    Entry {
                        resolution: outcome.resolution.clone(),
                        reach: outcome.reach.as_slice().into(),
                    },
                );
            }
            Some(cut) => debug!("Not caching {}, it was cut at {}", class.name(), visiting[cut]),
        }
        outcome
    }

    fn compute(&self, class: &'static Class, visiting: &mut Vec<&'static str>) -> Outcome {
        if let Some(mapping) = self.explicit_mapping(class) {
            return Outcome::settled(Resolution::Composed(mapping));
        }

        let decompose = if self.config.decompose_by_default {
            !self.config.opaque_classes.contains(class.name())
        } else {
            self.config.decompose_classes.contains(class.name())
        };
        if !decompose {
            return Outcome::settled(Resolution::Opaque);
        }

        match class.shape() {
            Shape::Array(element) | Shape::Collection(Some(element)) => {
                self.resolve_tracked(element, visiting);
                Outcome::settled(Resolution::Opaque)
            }
            Shape::Collection(None) | Shape::Primitive | Shape::Text => Outcome::settled(Resolution::Opaque),
            Shape::Object => self.default_mapping(class, visiting),
        }
    }

    fn explicit_mapping(&self, class: &Class) -> Option<Arc<AttributeMapping>> {
        let explicit = self.explicit.read().unwrap_or_else(PoisonError::into_inner);
        explicit
            .iter()
            .find(|entry| entry.class == class.name())
            .or_else(|| explicit.iter().find(|entry| class.is_subclass_of(&entry.class)))
            .map(|entry| Arc::clone(&entry.columns))
    }

    fn default_mapping(&self, class: &'static Class, visiting: &mut Vec<&'static str>) -> Outcome {
        let mut mapping = AttributeMapping::new();
        let mut outcome = Outcome::settled(Resolution::Opaque);
        for (property, method) in class.accessors() {
            let returns = method.returns();
            let spec = if returns.is_scalar() {
                ColumnSpec::column(property.clone(), property)
            } else {
                let child = self.resolve_tracked(returns, visiting);
                outcome.absorb(&child);
                match child.resolution {
                    Resolution::Composed(child) => ColumnSpec::group(property, child),
                    Resolution::Opaque => ColumnSpec::column(property.clone(), property),
                }
            };
            mapping.push(spec);
        }
        outcome.resolution = Resolution::Composed(Arc::new(mapping));
        outcome
    }
}

impl Default for ClassMappingRegistry {
    fn default() -> Self {
        ClassMappingRegistry::new(SerializationConfig::default())
    }
}

/// Builder of a [`ClassMappingRegistry`].
#[derive(Default)]
pub struct ClassMappingRegistryBuilder {
    config: SerializationConfig,
}

impl ClassMappingRegistryBuilder {
    pub fn new() -> ClassMappingRegistryBuilder {
        ClassMappingRegistryBuilder::default()
    }

    /// Starts from an existing configuration.
    pub fn config(mut self, config: SerializationConfig) -> ClassMappingRegistryBuilder {
        self.config = config;
        self
    }

    pub fn write_headers(mut self, yes: bool) -> ClassMappingRegistryBuilder {
        self.config.write_headers = yes;
        self
    }

    pub fn decompose_by_default(mut self, yes: bool) -> ClassMappingRegistryBuilder {
        self.config.decompose_by_default = yes;
        self
    }

    pub fn opaque_class(mut self, class: &Class) -> ClassMappingRegistryBuilder {
        self.config.opaque_classes.insert(class.name().to_string());
        self
    }

    pub fn decompose_class(mut self, class: &Class) -> ClassMappingRegistryBuilder {
        self.config.decompose_classes.insert(class.name().to_string());
        self
    }

    pub fn mapping(mut self, class: &Class, mapping: AttributeMapping) -> ClassMappingRegistryBuilder {
        self.config.mappings.push(ClassMapping {
            class: class.name().to_string(),
            columns: Arc::new(mapping),
        });
        self
    }

    pub fn build(self) -> ClassMappingRegistry {
        ClassMappingRegistry::new(self.config)
    }
}
