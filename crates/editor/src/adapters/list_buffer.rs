//! In-memory selection list.

use crate::ports::EntityListView;

/// Keeps labels and the selected index; stands in for a list widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBuffer {
    labels: Vec<String>,
    selected: Option<usize>,
}

impl ListBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityListView for ListBuffer {
    fn push(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }

    fn set_label(&mut self, index: usize, label: &str) {
        if let Some(slot) = self.labels.get_mut(index) {
            *slot = label.to_string();
        }
    }

    fn remove(&mut self, index: usize) {
        if index < self.labels.len() {
            self.labels.remove(index);
        }
        self.selected = match self.selected {
            Some(_) if self.labels.is_empty() => None,
            Some(selected) => Some(selected.min(self.labels.len() - 1)),
            None => None,
        };
    }

    fn select(&mut self, index: usize) {
        if index < self.labels.len() {
            self.selected = Some(index);
        }
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn selected(&self) -> Option<usize> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_ignores_out_of_range() {
        let mut list = ListBuffer::new();
        list.push("Class 1");
        list.select(3);
        assert_eq!(list.selected(), None);
        list.select(0);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn remove_keeps_selection_in_range() {
        let mut list = ListBuffer::new();
        list.push("Warrior");
        list.push("Mage");
        list.select(1);
        list.remove(1);
        assert_eq!(list.labels(), vec!["Warrior"]);
        assert_eq!(list.selected(), Some(0));
        list.remove(0);
        assert_eq!(list.selected(), None);
    }
}
