//! Application state management for the city guide.
//!
//! The `App` owns the load controller, a snapshot of the load state, and the
//! navigation state of the two views (city list and place list).

use cityguide_core::{CachedData, City, Document, LoadController, LoadState};
use tracing::debug;

use crate::ui::render::place_lines;

// ============================================================================
// Constants
// ============================================================================

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: u16 = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Which list is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Cities,
    Places,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    controller: Option<LoadController>,
    /// Snapshot of the controller's state, refreshed on every change
    pub load: LoadState,

    pub state: AppState,
    pub view: View,
    pub city_selection: usize,
    pub place_scroll: u16,
    /// Row and name of the opened city. The name guards against the row
    /// pointing at a different city after the document is replaced.
    selected_city: Option<(usize, String)>,
}

impl App {
    pub fn new(controller: LoadController) -> Self {
        let load = controller.state().clone();
        let mut app = Self::with_state(load);
        app.controller = Some(controller);
        app
    }

    /// App over a fixed load state, without a running load.
    pub fn with_state(load: LoadState) -> Self {
        Self {
            controller: None,
            load,
            state: AppState::Normal,
            view: View::Cities,
            city_selection: 0,
            place_scroll: 0,
            selected_city: None,
        }
    }

    // =========================================================================
    // Background Load
    // =========================================================================

    /// Pick up load progress and keep the views consistent with it.
    pub fn check_background_tasks(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        if !controller.poll() {
            return;
        }
        self.load = controller.state().clone();
        debug!(phase = ?self.load.phase(), loading = self.load.loading(), "Load state changed");

        let count = self.cities().len();
        if self.city_selection >= count {
            self.city_selection = count.saturating_sub(1);
        }
        if self.view == View::Places && self.selected_city().is_none() {
            self.back();
        }
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    pub fn document(&self) -> Option<&Document> {
        self.load.document()
    }

    pub fn cities(&self) -> &[City] {
        self.document().map(|d| d.cities.as_slice()).unwrap_or(&[])
    }

    pub fn selected_city(&self) -> Option<&City> {
        let (index, name) = self.selected_city.as_ref()?;
        self.cities().get(*index).filter(|city| city.name == *name)
    }

    /// Largest scroll offset that still leaves a line of the place view on screen
    fn max_place_scroll(&self) -> u16 {
        self.selected_city()
            .map(|city| place_lines(city).len().saturating_sub(1))
            .unwrap_or(0)
            .try_into()
            .unwrap_or(u16::MAX)
    }

    /// Status bar text describing how current the data is
    pub fn freshness(&self) -> String {
        if self.load.loading() {
            return "Refreshing...".to_string();
        }
        match self.load.cached_at() {
            Some(at) => format!("Updated {}", CachedData::with_timestamp((), at).age_display()),
            None => "Updated never".to_string(),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn select_next(&mut self) {
        match self.view {
            View::Cities => {
                if self.city_selection + 1 < self.cities().len() {
                    self.city_selection += 1;
                }
            }
            View::Places => {
                self.place_scroll = self.place_scroll.saturating_add(1).min(self.max_place_scroll())
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.view {
            View::Cities => self.city_selection = self.city_selection.saturating_sub(1),
            View::Places => self.place_scroll = self.place_scroll.saturating_sub(1),
        }
    }

    pub fn page_down(&mut self) {
        match self.view {
            View::Cities => {
                let last = self.cities().len().saturating_sub(1);
                self.city_selection = (self.city_selection + PAGE_SCROLL_SIZE as usize).min(last);
            }
            View::Places => {
                self.place_scroll = self
                    .place_scroll
                    .saturating_add(PAGE_SCROLL_SIZE)
                    .min(self.max_place_scroll())
            }
        }
    }

    pub fn page_up(&mut self) {
        match self.view {
            View::Cities => {
                self.city_selection = self.city_selection.saturating_sub(PAGE_SCROLL_SIZE as usize)
            }
            View::Places => {
                self.place_scroll = self.place_scroll.saturating_sub(PAGE_SCROLL_SIZE)
            }
        }
    }

    /// Open the highlighted city's places.
    pub fn open_selected(&mut self) {
        if self.view != View::Cities {
            return;
        }
        if let Some(city) = self.cities().get(self.city_selection) {
            self.selected_city = Some((self.city_selection, city.name.clone()));
            self.view = View::Places;
            self.place_scroll = 0;
        }
    }

    /// Return to the city list.
    pub fn back(&mut self) {
        self.selected_city = None;
        self.view = View::Cities;
        self.place_scroll = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================
