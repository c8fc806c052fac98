//! The filter registry: filter keys mapped to definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::params::Params;
use crate::predicate::Predicate;
use crate::source::Source;
use crate::traits::Refinable;

use super::definition::{DynamicFilter, FilterDefinition, SupportedValue};

/// Introspection record for one filter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedFilterProperty {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub supported_values: Option<Vec<SupportedValue>>,
}

/// Maps filter keys to [`FilterDefinition`]s and applies the ones a request
/// names.
///
/// Keys are exact and case-sensitive. Incoming keys with no definition are
/// ignored, never rejected.
///
/// # Example
///
/// ```
/// use refine::{FilterRegistry, Params, Refinable, TypedFilter};
///
/// #[derive(Debug, Refinable)]
/// struct Item {
///     id: i64,
///     name: String,
/// }
///
/// let items = vec![
///     Item { id: 1, name: "bolt".into() },
///     Item { id: 2, name: "nut".into() },
///     Item { id: 3, name: "big bolt".into() },
/// ];
///
/// let registry = FilterRegistry::<Item>::new()
///     .with("min_id", TypedFilter::closure(|min: i64| move |item: &Item| item.id >= min))
///     .with_dynamic_fields();
///
/// let params = Params::new().with("name", "bolt").with("min_id", "2").with("colour", "red");
/// let found = registry.filter(items, &params).unwrap();
///
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id, 3);
/// ```
pub struct FilterRegistry<T> {
    definitions: BTreeMap<String, Box<dyn FilterDefinition<T>>>,
}

impl<T> Default for FilterRegistry<T> {
    fn default() -> Self {
        FilterRegistry {
            definitions: BTreeMap::new(),
        }
    }
}

impl<T: Refinable + 'static> FilterRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from explicit definitions, optionally adding
    /// every discovered field of `T` not already registered.
    ///
    /// Discovered text fields use substring containment.
    pub fn from_definitions<K, I>(definitions: I, dynamic: bool) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Box<dyn FilterDefinition<T>>)>,
    {
        let mut registry = FilterRegistry {
            definitions: definitions
                .into_iter()
                .map(|(key, definition)| (key.into(), definition))
                .collect(),
        };
        if dynamic {
            registry.discover_fields(true);
        }
        registry
    }

    /// Creates a registry holding only discovered fields.
    pub fn dynamic(containment: bool) -> Self {
        let mut registry = Self::new();
        registry.discover_fields(containment);
        registry
    }

    /// Registers a [`DynamicFilter`] for every field of `T` whose name is not
    /// already a key. Explicit registrations always win.
    pub fn discover_fields(&mut self, containment: bool) {
        for field in T::fields() {
            if self.definitions.contains_key(field.name) {
                tracing::trace!(key = field.name, "explicit filter shadows discovered field");
                continue;
            }
            self.definitions.insert(
                field.name.to_string(),
                Box::new(DynamicFilter::<T>::new(field, containment)),
            );
        }
    }

    /// Builder form of [`discover_fields`](Self::discover_fields) with
    /// containment for text fields.
    pub fn with_dynamic_fields(mut self) -> Self {
        self.discover_fields(true);
        self
    }

    /// Registers `definition` under `key`, returning any definition it
    /// replaces.
    pub fn insert<D>(
        &mut self,
        key: impl Into<String>,
        definition: D,
    ) -> Option<Box<dyn FilterDefinition<T>>>
    where
        D: FilterDefinition<T> + 'static,
    {
        self.definitions.insert(key.into(), Box::new(definition))
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<D>(mut self, key: impl Into<String>, definition: D) -> Self
    where
        D: FilterDefinition<T> + 'static,
    {
        self.insert(key, definition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&dyn FilterDefinition<T>> {
        self.definitions.get(key).map(|d| d.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Describes every registered key for client-side introspection.
    pub fn supported_filter_properties(&self) -> Vec<SupportedFilterProperty> {
        self.definitions
            .iter()
            .map(|(key, definition)| SupportedFilterProperty {
                key: key.clone(),
                type_name: definition.type_name().to_string(),
                supported_values: definition.supported_values(),
            })
            .collect()
    }

    /// Builds one predicate per incoming key that has a definition.
    ///
    /// Repeated values under a key are OR-merged. Keys without a
    /// definition, and keys with no values, are skipped.
    pub fn predicates(&self, params: &Params) -> Result<Vec<Predicate<T>>> {
        let mut predicates = Vec::new();
        for (key, values) in params.iter() {
            let Some(definition) = self.definitions.get(key) else {
                tracing::trace!(key, "no filter registered, ignoring");
                continue;
            };
            let predicate = match values {
                [] => continue,
                [single] => definition.predicate(single)?,
                many => definition.predicate_any(many)?,
            };
            tracing::debug!(key, values = values.len(), "applying filter");
            predicates.push(predicate);
        }
        Ok(predicates)
    }

    /// AND-combines [`predicates`](Self::predicates) into one tree, or
    /// `None` if no key applies.
    pub fn predicate_for(&self, params: &Params) -> Result<Option<Predicate<T>>> {
        let predicates = self.predicates(params)?;
        if predicates.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Predicate::all(predicates)))
        }
    }

    /// Narrows `source` by every applicable predicate.
    ///
    /// All predicates are built before the source is touched, so a
    /// conversion failure leaves nothing half-filtered.
    pub fn filter<S: Source<T>>(&self, source: S, params: &Params) -> Result<S> {
        let predicates = self.predicates(params)?;
        Ok(predicates
            .iter()
            .fold(source, |narrowed, predicate| narrowed.narrow(predicate)))
    }
}

impl<T> fmt::Debug for FilterRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("keys", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}
