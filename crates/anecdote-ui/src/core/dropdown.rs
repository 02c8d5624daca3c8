//! Custom dropdown model mirroring a native single-select.
//!
//! # Design
//! - `DropdownModel` mirrors the native control's options and selected index.
//! - `DropdownGroup` owns the "which one is open" state so opening one instance closes
//!   every other, and an outside click closes them all.

/// One option mirrored from the native control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Option value written back to the native control.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl SelectOption {
    /// Option with distinct value and label.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// State of a single custom dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownModel {
    options: Vec<SelectOption>,
    selected: usize,
}

impl DropdownModel {
    /// Mirror `options` with `selected_index` selected (clamped into range).
    #[must_use]
    pub fn new(options: Vec<SelectOption>, selected_index: usize) -> Self {
        let selected = clamp_index(selected_index, options.len());
        Self { options, selected }
    }

    /// Model selecting the option whose value equals `value`, or the first option.
    #[must_use]
    pub fn with_value(options: Vec<SelectOption>, value: &str) -> Self {
        let selected = options
            .iter()
            .position(|option| option.value == value)
            .unwrap_or(0);
        Self::new(options, selected)
    }

    /// Mirrored options.
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Highlighted option index.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Currently selected option.
    #[must_use]
    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.get(self.selected)
    }

    /// Label shown in the collapsed widget.
    #[must_use]
    pub fn label(&self) -> &str {
        self.selected().map_or("", |option| option.label.as_str())
    }

    /// Choose option `index`. Returns the value to write back to the native control,
    /// or `None` when the index is out of range.
    pub fn choose(&mut self, index: usize) -> Option<String> {
        let value = self.options.get(index)?.value.clone();
        self.selected = index;
        Some(value)
    }

    /// Refresh from the native control's selected index after a programmatic change.
    pub fn resync(&mut self, selected_index: usize) {
        self.selected = clamp_index(selected_index, self.options.len());
    }
}

const fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 || index < len { index } else { 0 }
}

/// Identifier of a dropdown instance on the page.
pub type DropdownId = &'static str;

/// Shared open/closed state for all dropdowns on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropdownGroup {
    open: Option<DropdownId>,
}

impl DropdownGroup {
    /// Whether `id` is expanded.
    #[must_use]
    pub fn is_open(&self, id: DropdownId) -> bool {
        self.open == Some(id)
    }

    /// Toggle `id`; opening it collapses every other instance.
    #[must_use]
    pub fn toggled(self, id: DropdownId) -> Self {
        if self.is_open(id) {
            Self { open: None }
        } else {
            Self { open: Some(id) }
        }
    }

    /// Collapse `id` after an option was picked.
    #[must_use]
    pub fn closed(self, id: DropdownId) -> Self {
        if self.is_open(id) { Self { open: None } } else { self }
    }

    /// Handle a document click; `inside` names the instance containing the target.
    /// Instances other than `inside` are collapsed.
    #[must_use]
    pub fn clicked(self, inside: Option<DropdownId>) -> Self {
        match (self.open, inside) {
            (Some(open), Some(target)) if open == target => self,
            _ => Self { open: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("all", "全部地区"),
            SelectOption::new("蒙德", "蒙德"),
            SelectOption::new("璃月", "璃月"),
        ]
    }

    #[test]
    fn choose_updates_label_and_returns_value() {
        let mut model = DropdownModel::new(options(), 0);
        assert_eq!(model.label(), "全部地区");
        assert_eq!(model.choose(2).as_deref(), Some("璃月"));
        assert_eq!(model.label(), "璃月");
        assert_eq!(model.selected_index(), 2);
        assert!(model.choose(9).is_none());
        assert_eq!(model.selected_index(), 2);
    }

    #[test]
    fn resync_follows_native_index() {
        let mut model = DropdownModel::with_value(options(), "蒙德");
        assert_eq!(model.selected_index(), 1);
        model.resync(0);
        assert_eq!(model.label(), "全部地区");
        model.resync(7);
        assert_eq!(model.selected_index(), 0);
    }

    #[test]
    fn opening_one_closes_the_others() {
        let group = DropdownGroup::default().toggled("region");
        assert!(group.is_open("region"));
        let group = group.toggled("version");
        assert!(group.is_open("version"));
        assert!(!group.is_open("region"));
        assert!(!group.toggled("version").is_open("version"));
    }

    #[test]
    fn outside_click_closes_all() {
        let group = DropdownGroup::default().toggled("region");
        assert!(group.clicked(Some("region")).is_open("region"));
        assert!(!group.clicked(Some("version")).is_open("region"));
        assert_eq!(group.clicked(None), DropdownGroup::default());
        assert_eq!(group.closed("region"), DropdownGroup::default());
    }
}
