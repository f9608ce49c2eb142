use super::model::{Category, SightingRecord};

// ---------------------------------------------------------------------------
// Filter criteria: optional year / month / category, AND-combined
// ---------------------------------------------------------------------------

/// Current filter. A `None` field is a wildcard, not "field is absent".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<Category>,
}

/// How one criterion field changes in a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Keep,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    fn apply(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(v) => *field = Some(v),
            FieldUpdate::Clear => *field = None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets the field, `None` clears it.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        }
    }
}

/// Partial update of [`FilterCriteria`]; untouched fields are `Keep`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CriteriaUpdate {
    pub year: FieldUpdate<i32>,
    pub month: FieldUpdate<u32>,
    pub category: FieldUpdate<Category>,
}

impl CriteriaUpdate {
    /// Overwrite every field with `criteria`, clearing the ones it leaves open.
    pub fn replace(criteria: FilterCriteria) -> Self {
        Self {
            year: criteria.year.into(),
            month: criteria.month.into(),
            category: criteria.category.into(),
        }
    }
}

impl FilterCriteria {
    pub fn is_wildcard(&self) -> bool {
        *self == FilterCriteria::default()
    }

    pub fn apply(&mut self, update: CriteriaUpdate) {
        update.year.apply(&mut self.year);
        update.month.apply(&mut self.month);
        update.category.apply(&mut self.category);
    }

    /// Exact equality on every present field. A record without a category
    /// never matches a category criterion.
    pub fn matches(&self, record: &SightingRecord) -> bool {
        if self.year.is_some_and(|y| record.year != y) {
            return false;
        }
        if self.month.is_some_and(|m| record.month != m) {
            return false;
        }
        if let Some(category) = self.category {
            if record.category != Some(category) {
                return false;
            }
        }
        true
    }
}

/// Return indices of records that pass `criteria`, in input order.
pub fn filtered_indices(records: &[SightingRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records that pass `criteria`, in input order.
pub fn filter_records(records: &[SightingRecord], criteria: &FilterCriteria) -> Vec<SightingRecord> {
    records
        .iter()
        .filter(|rec| criteria.matches(rec))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{Coordinates, SightingIcon};

    fn rec(year: i32, month: u32, icon: Option<SightingIcon>) -> SightingRecord {
        SightingRecord {
            coordinates: Coordinates {
                longitude: 141.0 + f64::from(month) / 100.0,
                latitude: 43.0,
            },
            year,
            month,
            category: icon.map(Category::Icon),
            properties: BTreeMap::new(),
        }
    }

    fn sample() -> Vec<SightingRecord> {
        vec![
            rec(2022, 7, Some(SightingIcon::Bear)),
            rec(2023, 7, Some(SightingIcon::Footprint)),
            rec(2022, 8, None),
            rec(2022, 7, Some(SightingIcon::Footprint)),
            rec(2019, 1, Some(SightingIcon::Bear)),
        ]
    }

    #[test]
    fn wildcard_is_identity() {
        let records = sample();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_wildcard());
        assert_eq!(filter_records(&records, &criteria), records);
        assert_eq!(filtered_indices(&records, &criteria), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn year_only() {
        let records = sample();
        let criteria = FilterCriteria {
            year: Some(2022),
            ..FilterCriteria::default()
        };
        let manual = records.iter().filter(|r| r.year == 2022).count();
        let out = filter_records(&records, &criteria);
        assert_eq!(out.len(), manual);
        assert!(out.iter().all(|r| r.year == 2022));
        assert_eq!(filtered_indices(&records, &criteria), vec![0, 2, 3]);
    }

    #[test]
    fn fields_combine_with_and() {
        let records = sample();
        let criteria = FilterCriteria {
            year: Some(2022),
            month: Some(7),
            category: Some(Category::Icon(SightingIcon::Footprint)),
        };
        assert_eq!(filtered_indices(&records, &criteria), vec![3]);
    }

    #[test]
    fn absent_category_fails_category_criterion() {
        let records = sample();
        let criteria = FilterCriteria {
            month: Some(8),
            category: Some(Category::Icon(SightingIcon::Bear)),
            ..FilterCriteria::default()
        };
        assert!(filtered_indices(&records, &criteria).is_empty());
        let month_only = FilterCriteria {
            month: Some(8),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&records, &month_only), vec![2]);
    }

    #[test]
    fn idempotent() {
        let records = sample();
        let criteria = FilterCriteria {
            category: Some(Category::Icon(SightingIcon::Bear)),
            ..FilterCriteria::default()
        };
        let once = filter_records(&records, &criteria);
        assert_eq!(filter_records(&once, &criteria), once);
    }

    #[test]
    fn unmatched_year_is_empty() {
        let records = sample();
        let criteria = FilterCriteria {
            year: Some(2025),
            ..FilterCriteria::default()
        };
        assert!(filter_records(&records, &criteria).is_empty());
    }

    #[test]
    fn partial_updates_merge() {
        let mut criteria = FilterCriteria::default();
        criteria.apply(CriteriaUpdate {
            year: FieldUpdate::Set(2022),
            month: FieldUpdate::Set(7),
            ..CriteriaUpdate::default()
        });
        assert_eq!(criteria.year, Some(2022));
        assert_eq!(criteria.month, Some(7));

        criteria.apply(CriteriaUpdate {
            month: FieldUpdate::Clear,
            category: FieldUpdate::Set(Category::Icon(SightingIcon::Camera)),
            ..CriteriaUpdate::default()
        });
        assert_eq!(
            criteria,
            FilterCriteria {
                year: Some(2022),
                month: None,
                category: Some(Category::Icon(SightingIcon::Camera)),
            }
        );

        criteria.apply(CriteriaUpdate::replace(FilterCriteria {
            month: Some(3),
            ..FilterCriteria::default()
        }));
        assert_eq!(
            criteria,
            FilterCriteria {
                month: Some(3),
                ..FilterCriteria::default()
            }
        );
    }
}
