use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, CriteriaUpdate, FilterCriteria};
use crate::data::loader::DataSource;
use crate::data::model::{Bounds, Category, SightingRecord};
use crate::data::normalize::{CategorySource, MONTH_RANGE, YEAR_RANGE};

// ---------------------------------------------------------------------------
// Load status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    /// Human-readable error, shown once; the user reloads to retry.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Every normalized record of the current session.
    pub records: Vec<SightingRecord>,

    /// Active filter; all-wildcard by default.
    pub criteria: FilterCriteria,

    /// Indices of records passing `criteria` (cached).
    pub visible_indices: Vec<usize>,

    /// Record shown in the detail window.
    pub selected: Option<usize>,

    /// Categories offered by the filter panel, in priority order.
    pub category_options: Vec<Category>,

    pub color_map: ColorMap,

    pub status: LoadStatus,

    /// Where the current data came from.
    pub source_label: Option<String>,

    /// Extent of all records, used to frame the map.
    pub bounds: Option<Bounds>,

    /// Set when the map view should be re-framed on the next frame.
    pub fit_view: bool,

    pub show_about: bool,
}

impl AppState {
    pub fn new(category_source: &CategorySource) -> Self {
        let category_options = category_source.options();
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            selected: None,
            color_map: ColorMap::new(&category_options),
            category_options,
            status: LoadStatus::Idle,
            source_label: None,
            bounds: None,
            fit_view: false,
            show_about: false,
        }
    }

    pub fn year_options() -> impl Iterator<Item = i32> {
        YEAR_RANGE
    }

    pub fn month_options() -> impl Iterator<Item = u32> {
        MONTH_RANGE
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Mark a load of `source` as in flight.
    pub fn begin_loading(&mut self, source: &DataSource) {
        self.status = LoadStatus::Loading;
        self.source_label = Some(source.to_string());
    }

    /// Ingest a freshly loaded record set. The criteria survive a reload.
    pub fn set_records(&mut self, records: Vec<SightingRecord>) {
        self.bounds = Bounds::of(&records);
        self.records = records;
        self.selected = None;
        self.fit_view = true;
        self.status = LoadStatus::Loaded;
        self.refilter();
    }

    /// A failed load leaves an empty map and an error banner.
    pub fn set_load_failed(&mut self, message: String) {
        self.records.clear();
        self.visible_indices.clear();
        self.selected = None;
        self.bounds = None;
        self.status = LoadStatus::Failed(message);
    }

    /// Merge a partial criteria update and recompute the visible subset.
    pub fn set_criteria(&mut self, update: CriteriaUpdate) {
        self.criteria.apply(update);
        self.refilter();
    }

    /// Back to all-wildcard.
    pub fn reset_criteria(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    /// Recompute `visible_indices` after a criteria or data change.
    fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.records, &self.criteria);
        if let Some(sel) = self.selected {
            if !self.visible_indices.contains(&sel) {
                self.selected = None;
            }
        }
    }

    /// Select a record by index into `records`; ignored if not visible.
    pub fn select(&mut self, index: usize) {
        if self.visible_indices.contains(&index) {
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_record(&self) -> Option<&SightingRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }
}
