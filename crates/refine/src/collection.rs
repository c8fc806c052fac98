//! One-stop facade: filtering and paging configured once, then applied to
//! a source in a single [`populate`](Collection::populate) call.

use serde::Serialize;

use crate::error::{RefineError, Result};
use crate::filter::{FilterDefinition, FilterRegistry, SupportedFilterProperty};
use crate::paging::{PageSummary, Pager, PagingParams};
use crate::params::Params;
use crate::sort::{SortExpr, SortRegistry, DEFAULT_SORT_KEY};
use crate::source::Source;
use crate::traits::Refinable;

/// Result of [`Collection::populate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage<R> {
    pub result_set: Vec<R>,
    /// Present when paging is enabled.
    pub paged_results: Option<PageSummary>,
    /// Present when init values were requested and filtering is enabled.
    pub supported_filter_properties: Option<Vec<SupportedFilterProperty>>,
    /// Present when init values were requested and paging is enabled.
    pub supported_sort_properties: Option<Vec<String>>,
}

struct Filtering<T> {
    params: Params,
    registry: FilterRegistry<T>,
}

/// A collection with optional filtering and paging.
///
/// Each feature is enabled at most once. Filter and sort keys can be added
/// after their feature is enabled.
///
/// # Example
///
/// ```
/// use refine::{Collection, Params, PagingParams, Refinable, SortExpr};
///
/// #[derive(Debug, Clone, Refinable)]
/// struct City {
///     name: String,
///     population: u64,
/// }
///
/// let cities = vec![
///     City { name: "Lyon".into(), population: 520_000 },
///     City { name: "Lille".into(), population: 230_000 },
///     City { name: "Paris".into(), population: 2_100_000 },
/// ];
///
/// let mut collection = Collection::<City>::new(true);
/// collection.enable_filtering(Params::new().with("name", "L"), true, None)?;
/// collection.enable_paging_with_default(
///     PagingParams::new(1, 1).descending(true),
///     SortExpr::field(City::POPULATION),
///     false,
/// )?;
///
/// let page = collection.populate(cities)?;
/// assert_eq!(page.result_set.len(), 1);
/// assert_eq!(page.result_set[0].name, "Lyon");
/// assert_eq!(page.paged_results.map(|s| s.results_count), Some(2));
/// assert_eq!(page.supported_sort_properties, Some(vec!["Default".to_string()]));
/// # Ok::<(), refine::RefineError>(())
/// ```
pub struct Collection<T> {
    load_init_values: bool,
    filtering: Option<Filtering<T>>,
    pager: Option<Pager<T>>,
}

impl<T: Refinable + 'static> Collection<T> {
    /// Creates a collection with no features enabled.
    ///
    /// With `load_init_values` set, populated pages carry the supported
    /// filter and sort properties for client initialisation.
    pub fn new(load_init_values: bool) -> Self {
        Collection {
            load_init_values,
            filtering: None,
            pager: None,
        }
    }

    /// Enables filtering by `params`.
    ///
    /// `definitions` seeds the registry; with `dynamic` set every field of
    /// `T` not already registered becomes a filter key.
    pub fn enable_filtering(
        &mut self,
        params: Params,
        dynamic: bool,
        definitions: Option<FilterRegistry<T>>,
    ) -> Result<()> {
        if self.filtering.is_some() {
            return Err(RefineError::configuration("filtering already enabled"));
        }
        let mut registry = definitions.unwrap_or_default();
        if dynamic {
            registry.discover_fields(true);
        }
        self.filtering = Some(Filtering { params, registry });
        Ok(())
    }

    /// Enables paging with the given sort definitions.
    ///
    /// With `dynamic` set, any field of `T` is also a valid sort key.
    pub fn enable_paging(
        &mut self,
        paging: PagingParams,
        mut sorts: SortRegistry<T>,
        dynamic: bool,
    ) -> Result<()> {
        if self.pager.is_some() {
            return Err(RefineError::configuration("paging already enabled"));
        }
        if sorts.is_empty() && !dynamic {
            return Err(RefineError::configuration(
                "paging needs at least one sort definition unless dynamic paging is enabled",
            ));
        }
        sorts.set_dynamic(dynamic);
        self.pager = Some(Pager::new(paging, sorts));
        Ok(())
    }

    /// Enables paging with `default` as the [`DEFAULT_SORT_KEY`] ordering.
    pub fn enable_paging_with_default(
        &mut self,
        paging: PagingParams,
        default: SortExpr<T>,
        dynamic: bool,
    ) -> Result<()> {
        let mut sorts = SortRegistry::new();
        sorts.insert(DEFAULT_SORT_KEY, default);
        self.enable_paging(paging, sorts, dynamic)
    }

    /// Adds or replaces a sort key. Paging must be enabled.
    pub fn add_sort_property(&mut self, key: impl Into<String>, expr: SortExpr<T>) -> Result<()> {
        let pager = self
            .pager
            .as_mut()
            .ok_or_else(|| RefineError::configuration("paging is not enabled"))?;
        pager.sorts_mut().insert(key, expr);
        Ok(())
    }

    /// Adds or replaces a filter key. Filtering must be enabled.
    pub fn add_filter_property<D>(&mut self, key: impl Into<String>, definition: D) -> Result<()>
    where
        D: FilterDefinition<T> + 'static,
    {
        let filtering = self
            .filtering
            .as_mut()
            .ok_or_else(|| RefineError::configuration("filtering is not enabled"))?;
        filtering.registry.insert(key, definition);
        Ok(())
    }

    pub fn supported_filter_properties(&self) -> Option<Vec<SupportedFilterProperty>> {
        match &self.filtering {
            Some(filtering) if self.load_init_values => {
                Some(filtering.registry.supported_filter_properties())
            }
            _ => None,
        }
    }

    pub fn supported_sort_properties(&self) -> Option<Vec<String>> {
        match &self.pager {
            Some(pager) if self.load_init_values => Some(pager.supported_sort_properties()),
            _ => None,
        }
    }

    /// Filters, counts, orders and pages `source`.
    pub fn populate<S>(&self, source: S) -> Result<CollectionPage<S::Item>>
    where
        S: Source<T> + IntoIterator,
    {
        self.populate_as(source, |item| item)
    }

    /// Like [`populate`](Self::populate), projecting each record of the page.
    pub fn populate_as<S, R, F>(&self, source: S, projection: F) -> Result<CollectionPage<R>>
    where
        S: Source<T> + IntoIterator,
        F: FnMut(S::Item) -> R,
    {
        let source = match &self.filtering {
            Some(filtering) => filtering.registry.filter(source, &filtering.params)?,
            None => source,
        };
        let (page, paged_results) = match &self.pager {
            Some(pager) => {
                let (page, summary) = pager.paginate(source)?;
                (page, Some(summary))
            }
            None => (source, None),
        };

        Ok(CollectionPage {
            result_set: page.into_iter().map(projection).collect(),
            paged_results,
            supported_filter_properties: self.supported_filter_properties(),
            supported_sort_properties: self.supported_sort_properties(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TypedFilter;
    use crate::traits::FieldDescriptor;
    use crate::value::{Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Unit {
        id: i64,
    }

    impl Refinable for Unit {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "id" => Value::Number(Number::I64(self.id)),
                _ => Value::None,
            }
        }

        fn fields() -> &'static [FieldDescriptor] {
            static FIELDS: &[FieldDescriptor] = &[FieldDescriptor::number::<i64>("id")];
            FIELDS
        }
    }

    fn units() -> Vec<Unit> {
        (1..=5).map(|id| Unit { id }).collect()
    }

    fn is_configuration(result: Result<()>) -> bool {
        matches!(result, Err(RefineError::Configuration(_)))
    }

    #[test]
    fn features_enable_once() {
        let mut collection = Collection::<Unit>::new(false);
        collection.enable_filtering(Params::new(), true, None).unwrap();
        assert!(is_configuration(collection.enable_filtering(Params::new(), true, None)));

        collection
            .enable_paging_with_default(PagingParams::default(), SortExpr::field("id"), false)
            .unwrap();
        assert!(is_configuration(collection.enable_paging(
            PagingParams::default(),
            SortRegistry::new().with_default("id"),
            false
        )));
    }

    #[test]
    fn properties_need_their_feature() {
        let mut collection = Collection::<Unit>::new(false);
        assert!(is_configuration(
            collection.add_sort_property("id", SortExpr::field("id"))
        ));
        assert!(is_configuration(collection.add_filter_property(
            "min",
            TypedFilter::<Unit, i64>::closure(|n| move |u: &Unit| u.id >= n)
        )));
    }

    #[test]
    fn paging_without_sorts_needs_dynamic() {
        let mut collection = Collection::<Unit>::new(false);
        assert!(is_configuration(collection.enable_paging(
            PagingParams::default(),
            SortRegistry::new(),
            false
        )));
        collection
            .enable_paging(PagingParams::new(2, 1).sort_by("id"), SortRegistry::new(), true)
            .unwrap();
        let page = collection.populate(units()).unwrap();
        assert_eq!(page.result_set, vec![Unit { id: 1 }, Unit { id: 2 }]);
    }

    #[test]
    fn nothing_enabled_returns_source() {
        let page = Collection::<Unit>::new(true).populate(units()).unwrap();
        assert_eq!(page.result_set.len(), 5);
        assert!(page.paged_results.is_none());
        assert!(page.supported_filter_properties.is_none());
        assert!(page.supported_sort_properties.is_none());
    }

    #[test]
    fn init_values_follow_flag() {
        let mut quiet = Collection::<Unit>::new(false);
        quiet.enable_filtering(Params::new(), true, None).unwrap();
        assert!(quiet.supported_filter_properties().is_none());

        let mut chatty = Collection::<Unit>::new(true);
        chatty.enable_filtering(Params::new(), true, None).unwrap();
        chatty
            .add_filter_property(
                "min",
                TypedFilter::<Unit, i64>::closure(|n| move |u: &Unit| u.id >= n),
            )
            .unwrap();
        let keys: Vec<_> = chatty
            .supported_filter_properties()
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["id", "min"]);
    }

    #[test]
    fn populate_as_projects_page() {
        let mut collection = Collection::<Unit>::new(false);
        collection
            .enable_filtering(Params::new().with("min", "2"), false, None)
            .unwrap();
        collection
            .add_filter_property(
                "min",
                TypedFilter::<Unit, i64>::closure(|n| move |u: &Unit| u.id >= n),
            )
            .unwrap();
        collection
            .enable_paging_with_default(
                PagingParams::new(2, 2).descending(true),
                SortExpr::field("id"),
                false,
            )
            .unwrap();

        let page = collection.populate_as(units(), |u| u.id * 10).unwrap();
        assert_eq!(page.result_set, vec![30, 20]);
        let summary = page.paged_results.unwrap();
        assert_eq!(summary.results_count, 4);
        assert_eq!(summary.pages_count, 2);
    }

    #[test]
    fn page_serializes_camel_case() {
        let mut collection = Collection::<Unit>::new(true);
        collection
            .enable_paging_with_default(PagingParams::new(2, 1), SortExpr::field("id"), false)
            .unwrap();
        let page = collection.populate_as(units(), |u| u.id).unwrap();
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["resultSet"], serde_json::json!([1, 2]));
        assert_eq!(json["pagedResults"]["resultsCount"], 5);
        assert_eq!(json["supportedSortProperties"][0], "Default");
    }
}
