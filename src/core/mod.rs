/// Runtime type descriptors standing in for reflection.
pub mod class;

/// Global serialization policy.
pub mod config;

/// Values and records walked by the writers.
pub mod item;

/// Column layouts and their resolved getters.
pub mod mapping;

/// Per-class mapping decisions and their cache.
pub mod registry;

#[cfg(any(test, feature = "tests-cfg"))]
#[doc(hidden)]
pub mod test_support;
