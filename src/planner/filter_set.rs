//! Filter Set Builder
//!
//! Merges client filters with the ownership predicate. The ownership
//! predicate lives in its own slot, always evaluated first, and no client
//! filter can replace it. A client filter on the same column is simply ANDed
//! after it.

use crate::filter::FilterDescriptor;

/// Client filters plus the injected ownership predicate
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilters {
    ownership: Option<FilterDescriptor>,
    filters: Vec<FilterDescriptor>,
}

impl ScopedFilters {
    /// The injected ownership predicate, if the caller is scoped
    pub fn ownership(&self) -> Option<&FilterDescriptor> {
        self.ownership.as_ref()
    }

    /// Client filters in request order
    pub fn client_filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Returns true when an ownership predicate applies
    pub fn is_scoped(&self) -> bool {
        self.ownership.is_some()
    }

    /// All descriptors, ownership first
    pub fn descriptors(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.ownership.iter().chain(self.filters.iter())
    }

    pub fn len(&self) -> usize {
        self.filters.len() + usize::from(self.ownership.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds [`ScopedFilters`]
pub struct FilterSetBuilder;

impl FilterSetBuilder {
    pub fn build(
        filters: Vec<FilterDescriptor>,
        ownership: Option<FilterDescriptor>,
    ) -> ScopedFilters {
        ScopedFilters { ownership, filters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldType, FilterOperator};

    #[test]
    fn test_ownership_always_first() {
        let client = vec![
            FilterDescriptor::new("status", FieldType::Set, FilterOperator::Equals).with_value("paid"),
            FilterDescriptor::number_equals("user_id", 99),
        ];
        let scoped = FilterSetBuilder::build(client, Some(FilterDescriptor::number_equals("user_id", 7)));

        let fields: Vec<_> = scoped
            .descriptors()
            .map(|d| (d.field.as_str(), d.value.clone()))
            .collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("user_id", Some(7.into())));
        assert_eq!(fields[2], ("user_id", Some(99.into())));
        assert!(scoped.is_scoped());
    }

    #[test]
    fn test_unscoped_keeps_client_order() {
        let scoped = FilterSetBuilder::build(
            vec![
                FilterDescriptor::new("a", FieldType::Text, FilterOperator::Blank),
                FilterDescriptor::new("b", FieldType::Text, FilterOperator::NotBlank),
            ],
            None,
        );

        let fields: Vec<_> = scoped.descriptors().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, ["a", "b"]);
        assert!(!scoped.is_scoped());
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn test_empty() {
        let scoped = FilterSetBuilder::build(Vec::new(), None);
        assert!(scoped.is_empty());
        assert!(scoped.ownership().is_none());
    }
}
