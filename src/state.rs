use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::data::filter::{FilterControls, FilterCriteria};
use crate::data::model::Dataset;
use crate::page::{render, PageState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared with the load-once cache.
    pub dataset: Arc<Dataset>,

    /// Where the dataset came from (shown in the top bar).
    pub source: PathBuf,

    /// Slider bounds and country options, fixed for the dataset.
    pub controls: FilterControls,

    /// Raw control values as edited by the widgets.
    pub min_magnitude: f64,
    pub max_depth: f64,
    pub selected_countries: BTreeSet<String>,

    /// Text filter for the country list.
    pub country_search: String,

    /// Criteria the dashboard opened with; restored by "Reset filters".
    pub initial: FilterCriteria,

    /// Page derived from the current criteria (cached).
    pub page: PageState,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, source: PathBuf, initial_min_magnitude: f64) -> Self {
        let controls = FilterControls::from_dataset(&dataset);
        let initial = controls.initial_criteria(initial_min_magnitude);
        let page = render(&dataset, &initial);

        Self {
            source,
            min_magnitude: initial.min_magnitude,
            max_depth: initial.max_depth,
            selected_countries: BTreeSet::new(),
            country_search: String::new(),
            controls,
            initial,
            page,
            dataset,
        }
    }

    /// Criteria for the current control values, clamped to the dataset.
    pub fn criteria(&self) -> FilterCriteria {
        self.controls.criteria(
            self.min_magnitude,
            self.max_depth,
            self.selected_countries.clone(),
        )
    }

    /// Re-render the page if the criteria changed since the last render.
    /// Returns whether a re-render happened.
    pub fn refresh(&mut self) -> bool {
        let criteria = self.criteria();
        if criteria == self.page.criteria {
            return false;
        }
        self.page = render(&self.dataset, &criteria);
        true
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
    }

    /// Select every country currently matching the search box.
    pub fn select_all_countries(&mut self) {
        let visible: Vec<String> = self.visible_countries().cloned().collect();
        self.selected_countries.extend(visible);
    }

    /// Clear the country selection (no country restriction).
    pub fn select_no_countries(&mut self) {
        self.selected_countries.clear();
    }

    /// Back to the initial slider positions with no countries selected.
    pub fn reset_filters(&mut self) {
        self.min_magnitude = self.initial.min_magnitude;
        self.max_depth = self.initial.max_depth;
        self.selected_countries.clear();
        self.country_search.clear();
    }

    /// Country options matching the search box (case-insensitive).
    pub fn visible_countries(&self) -> impl Iterator<Item = &String> + '_ {
        let needle = self.country_search.trim().to_lowercase();
        self.controls
            .country_options
            .iter()
            .filter(move |c| needle.is_empty() || c.to_lowercase().contains(&needle))
    }
}
