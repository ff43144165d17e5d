//! Submit-time cleanup: blank entries are dropped, empty lists become `None`.

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Keeps the entries whose trimmed value is non-empty, in order, untrimmed.
pub fn retain_filled(items: &[String]) -> Vec<String> {
    items.iter().filter(|item| !is_blank(item)).cloned().collect()
}

pub fn collapse<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

pub fn blank_to_none(value: &str) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// A record that is dropped on submit when its identifying field is blank.
pub trait Prune: Sized {
    /// `None` if the record is blank, otherwise a copy with its nested
    /// string lists filtered.
    fn prune(&self) -> Option<Self>;
}

pub fn prune_all<T: Prune>(items: &[T]) -> Vec<T> {
    items.iter().filter_map(Prune::prune).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn retain_filled_drops_only_blank_entries() {
        let items = strings(&["a", "", "  ", "b", "\t\n", "a", " c "]);
        let filtered = retain_filled(&items);
        assert_eq!(filtered, strings(&["a", "b", "a", " c "]));
        assert!(filtered.len() <= items.len());
    }

    #[test]
    fn retain_filled_of_all_blank_is_empty() {
        assert!(retain_filled(&strings(&["", " "])).is_empty());
        assert!(retain_filled(&[]).is_empty());
    }

    #[test]
    fn collapse_empty_is_none() {
        assert_eq!(collapse::<String>(vec![]), None);
        assert_eq!(collapse(strings(&["x"])), Some(strings(&["x"])));
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(blank_to_none("   "), None);
        assert_eq!(blank_to_none("note"), Some(String::from("note")));
    }
}
