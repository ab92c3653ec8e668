use serde::{Deserialize, Serialize};

/// Handle to a related row that is loaded on request.
///
/// The key is always present; the value is only filled once a repository
/// resolves it. Cloning a handle clones the cached value, so two owners never
/// share mutations through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyRef<T> {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<T>,
}

/// Values that carry their own primary key.
pub trait Keyed {
    fn key(&self) -> i64;
}

impl<T: Keyed> LazyRef<T> {
    /// Reference with its value already resolved; the key is taken from the
    /// value.
    pub fn loaded(value: T) -> Self {
        Self {
            id: value.key(),
            value: Some(value),
        }
    }
}

impl<T> LazyRef<T> {
    /// Reference carrying only the key.
    pub fn unloaded(id: i64) -> Self {
        Self { id, value: None }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Caches a resolved value and returns it.
    pub fn fill(&mut self, value: T) -> &T {
        self.value.insert(value)
    }

    /// Drops the cached value, keeping the key.
    pub fn clear(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: i64,
        label: String,
    }

    impl Keyed for Tag {
        fn key(&self) -> i64 {
            self.id
        }
    }

    fn tag(id: i64, label: &str) -> Tag {
        Tag {
            id,
            label: label.to_string(),
        }
    }

    #[test]
    fn unloaded_reference_has_only_key() {
        let reference: LazyRef<Tag> = LazyRef::unloaded(7);
        assert_eq!(reference.id(), 7);
        assert!(!reference.is_loaded());
        assert!(reference.get().is_none());
    }

    #[test]
    fn loaded_reference_takes_key_from_value() {
        let reference = LazyRef::loaded(tag(2, "tools"));
        assert_eq!(reference.id(), 2);
        assert_eq!(reference.get().map(|t| t.id), Some(2));
    }

    #[test]
    fn fill_caches_and_clear_forgets() {
        let mut reference = LazyRef::unloaded(3);
        assert_eq!(reference.fill(tag(3, "tools")).label, "tools");
        assert_eq!(reference.get().map(|t| t.label.as_str()), Some("tools"));

        reference.clear();
        assert!(!reference.is_loaded());
        assert_eq!(reference.id(), 3);
    }

    #[test]
    fn clones_do_not_share_cached_value() {
        let original = LazyRef::loaded(tag(1, "food"));
        let mut copy = original.clone();
        if let Some(t) = copy.get_mut() {
            t.label.push_str(" & drink");
        }
        assert_eq!(original.get().map(|t| t.label.as_str()), Some("food"));
        assert_eq!(copy.get().map(|t| t.label.as_str()), Some("food & drink"));
    }

    #[test]
    fn unloaded_reference_deserializes_without_value() {
        let reference: LazyRef<Tag> = serde_json::from_str(r#"{"id":5}"#).unwrap();
        assert_eq!(reference, LazyRef::unloaded(5));
    }
}
