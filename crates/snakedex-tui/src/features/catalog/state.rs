use snakedex_types::SnakeRecord;

/// The home page: the fetched catalog and the selected card.
#[derive(Debug, Default)]
pub struct CatalogState {
    pub snakes: Vec<SnakeRecord>,
    pub selected: usize,
    /// A fetch is in flight.
    pub loading: bool,
    /// At least one fetch has completed, successfully or not.
    pub loaded: bool,
}

impl CatalogState {
    pub fn selected_snake(&self) -> Option<&SnakeRecord> {
        self.snakes.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.snakes.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Replaces the list, keeping the selection in range.
    pub fn replace(&mut self, snakes: Vec<SnakeRecord>) {
        self.snakes = snakes;
        self.selected = self.selected.min(self.snakes.len().saturating_sub(1));
        self.loading = false;
        self.loaded = true;
    }
}
