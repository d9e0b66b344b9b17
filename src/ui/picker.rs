use crate::core::catalog::{ModelCatalog, ModelCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub id: String,
    pub label: String,
    pub detail: String,
    pub category: ModelCategory,
}

#[derive(Debug, Clone)]
pub struct PickerState {
    pub title: String,
    pub items: Vec<PickerItem>,
    pub selected: usize,
}

impl PickerState {
    pub fn new<T: Into<String>>(title: T, items: Vec<PickerItem>, selected: usize) -> Self {
        let selected = selected.min(items.len().saturating_sub(1));
        Self {
            title: title.into(),
            items,
            selected,
        }
    }

    /// One row per catalog entry, with the cursor on `current` when it is listed.
    pub fn for_models(catalog: &ModelCatalog, current: Option<&str>) -> Self {
        let items = catalog
            .models()
            .iter()
            .map(|model| PickerItem {
                id: model.id.clone(),
                label: model.name.clone(),
                detail: format!("{} · {}", model.provider, model.description),
                category: model.category,
            })
            .collect();
        let selected = current
            .and_then(|id| catalog.position(id))
            .unwrap_or(0);
        Self::new("Select model", items, selected)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.items.get(self.selected).map(|i| i.id.as_str())
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            if self.selected == 0 {
                self.selected = self.items.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn move_to_start(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_end(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::test_catalog;

    #[test]
    fn model_picker_starts_on_current_selection() {
        let catalog = test_catalog();
        let picker = PickerState::for_models(&catalog, Some("m2"));
        assert_eq!(picker.items.len(), 2);
        assert_eq!(picker.selected_id(), Some("m2"));
        assert_eq!(picker.items[1].category, ModelCategory::Premium);

        let fresh = PickerState::for_models(&catalog, None);
        assert_eq!(fresh.selected_id(), Some("m1"));
    }

    #[test]
    fn movement_wraps_around() {
        let mut picker = PickerState::for_models(&test_catalog(), None);
        picker.move_up();
        assert_eq!(picker.selected_id(), Some("m2"));
        picker.move_down();
        assert_eq!(picker.selected_id(), Some("m1"));
        picker.move_to_end();
        assert_eq!(picker.selected, 1);
        picker.move_to_start();
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn empty_picker_is_inert() {
        let mut picker = PickerState::new("Empty", Vec::new(), 3);
        picker.move_down();
        picker.move_up();
        picker.move_to_end();
        assert_eq!(picker.selected, 0);
        assert_eq!(picker.selected_id(), None);
    }
}
