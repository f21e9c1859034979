//! ListQuery - the filter/sort/page pipeline

use super::{FacetKind, Listable, SortKey};

/// Selected value of a facet filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetValue {
    #[default]
    All,
    Is(String),
}

impl FacetValue {
    /// `""` and `"all"` (any case) select everything
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            FacetValue::All
        } else {
            FacetValue::Is(raw.to_string())
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FacetValue::All => true,
            FacetValue::Is(wanted) => value.is_some_and(|v| v.trim().eq_ignore_ascii_case(wanted)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            descending: false,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            descending: true,
        }
    }
}

/// Search term, facet selections and an optional sort
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub facets: Vec<(FacetKind, FacetValue)>,
    pub sort: Option<SortSpec>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn facet(mut self, kind: FacetKind, value: FacetValue) -> Self {
        self.facets.push((kind, value));
        self
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Whether a single record passes the search and every facet
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        let term = self.search.trim().to_lowercase();
        let found = term.is_empty()
            || record
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&term));

        found
            && self
                .facets
                .iter()
                .all(|(kind, value)| value.matches(record.facet(*kind).as_deref()))
    }

    /// Matching records, sorted when a sort is set; ties keep input order
    pub fn apply<'a, T: Listable>(&self, records: &'a [T]) -> Vec<&'a T> {
        let mut rows: Vec<&T> = records.iter().filter(|r| self.matches(*r)).collect();

        if let Some(spec) = self.sort {
            let mut keyed: Vec<_> = rows
                .into_iter()
                .map(|r| (r.sort_value(spec.key), r))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| a.compare(b, spec.descending));
            rows = keyed.into_iter().map(|(_, r)| r).collect();
        }

        rows
    }

    /// One page (1-based) of [`apply`](Self::apply)'s result
    pub fn page<'a, T: Listable>(&self, records: &'a [T], page: usize, size: usize) -> Page<'a, T> {
        Page::of(self.apply(records), page, size)
    }
}

/// A slice of a filtered list
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based, clamped into range
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn of(rows: Vec<&'a T>, page: usize, size: usize) -> Self {
        let size = size.max(1);
        let total_items = rows.len();
        let total_pages = total_items.div_ceil(size).max(1);
        let page = page.clamp(1, total_pages);

        let items = rows.into_iter().skip((page - 1) * size).take(size).collect();
        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::SortValue;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        status: Option<&'static str>,
        kind: &'static str,
    }

    impl Listable for Row {
        fn search_text(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn facet(&self, kind: FacetKind) -> Option<String> {
            match kind {
                FacetKind::Status => self.status.map(str::to_string),
                FacetKind::Type => Some(self.kind.to_string()),
                _ => None,
            }
        }

        fn sort_value(&self, key: SortKey) -> SortValue {
            match key {
                SortKey::Status => self.status.map_or(SortValue::Missing, SortValue::text),
                _ => SortValue::text(self.name),
            }
        }
    }

    fn row(name: &'static str, status: Option<&'static str>, kind: &'static str) -> Row {
        Row { name, status, kind }
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Pump B", Some("ONLINE"), "SENSOR"),
            row("pump a", Some("OFFLINE"), "ACTUATOR"),
            row("Valve", None, "SENSOR"),
            row("Pump C", Some("ONLINE"), "SENSOR"),
        ]
    }

    fn names<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_search_case_insensitive_and_idempotent() {
        let data = rows();
        let query = ListQuery::new().search("PUMP");
        let once = query.apply(&data);
        assert_eq!(names(&once), vec!["Pump B", "pump a", "Pump C"]);

        let owned: Vec<Row> = once
            .iter()
            .map(|r| row(r.name, r.status, r.kind))
            .collect();
        let twice = query.apply(&owned);
        assert_eq!(names(&twice), names(&once));
    }

    #[test]
    fn test_facets_compose_with_and() {
        let data = rows();
        let query = ListQuery::new()
            .facet(FacetKind::Status, FacetValue::parse("online"))
            .facet(FacetKind::Type, FacetValue::parse("sensor"));
        assert_eq!(names(&query.apply(&data)), vec!["Pump B", "Pump C"]);

        let all = ListQuery::new().facet(FacetKind::Status, FacetValue::parse("All"));
        assert_eq!(all.apply(&data).len(), 4);
    }

    #[test]
    fn test_missing_facet_never_matches_specific_value() {
        let data = rows();
        let query = ListQuery::new().facet(FacetKind::Priority, FacetValue::parse("HIGH"));
        assert!(query.apply(&data).is_empty());
    }

    #[test]
    fn test_sort_is_stable_and_missing_last() {
        let data = rows();
        let asc = ListQuery::new().sort(SortSpec::ascending(SortKey::Status));
        assert_eq!(
            names(&asc.apply(&data)),
            vec!["pump a", "Pump B", "Pump C", "Valve"]
        );

        let desc = ListQuery::new().sort(SortSpec::descending(SortKey::Status));
        assert_eq!(
            names(&desc.apply(&data)),
            vec!["Pump B", "Pump C", "pump a", "Valve"]
        );
    }

    #[test]
    fn test_paging_clamps() {
        let data = rows();
        let query = ListQuery::new().sort(SortSpec::ascending(SortKey::Name));
        let page = query.page(&data, 2, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 4);
        assert_eq!(names(&page.items), vec!["Valve"]);
        assert!(page.has_prev());
        assert!(!page.has_next());

        let beyond = query.page(&data, 9, 3);
        assert_eq!(beyond.page, 2);

        let empty: Vec<Row> = Vec::new();
        let page = query.page(&empty, 1, 0);
        assert_eq!((page.page, page.total_pages, page.items.len()), (1, 1, 0));
    }
}
