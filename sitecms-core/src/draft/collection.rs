//! Id-keyed editing of one ordered list in the draft.

use std::collections::HashSet;

use super::error::DraftError;
use crate::models::{Record, RecordId};

/// Editable view over one list of records in a draft.
///
/// Every mutation marks the draft dirty. Record order is preserved: new
/// records are appended and removal never reorders the rest.
pub struct Collection<'a, T: Record> {
    items: &'a mut Vec<T>,
    dirty: &'a mut bool,
}

impl<'a, T: Record> Collection<'a, T> {
    pub(crate) fn new(items: &'a mut Vec<T>, dirty: &'a mut bool) -> Self {
        Self { items, dirty }
    }

    /// Appends `item` under a freshly generated id and returns that id.
    ///
    /// Whatever id `item` carried is replaced.
    pub fn add(&mut self, mut item: T) -> RecordId {
        let taken: HashSet<&str> = self.items.iter().map(|i| i.id().as_str()).collect();
        let mut id = RecordId::generate(T::ID_PREFIX);
        while taken.contains(id.as_str()) {
            id = RecordId::generate(T::ID_PREFIX);
        }
        item.set_id(id.clone());
        self.items.push(item);
        *self.dirty = true;
        id
    }

    /// Applies `update` to the record with `id`. The id itself cannot change.
    pub fn update_by_id<F>(&mut self, id: &str, update: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut T),
    {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id().as_str() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        let original = item.id().clone();
        update(item);
        item.set_id(original);
        *self.dirty = true;
        Ok(())
    }

    /// Removes the record with `id` and returns it.
    pub fn remove_by_id(&mut self, id: &str) -> Result<T, DraftError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id().as_str() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        *self.dirty = true;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id().as_str() == id)
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.items.iter().map(|i| i.id().clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn not_found<T: Record>(id: &str) -> DraftError {
    DraftError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Service;

    fn services() -> Vec<Service> {
        ["Web", "Mobile", "AI"]
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let mut s = Service::new(*title, "");
                s.set_id(RecordId::new(format!("s{}", i + 1)));
                s
            })
            .collect()
    }

    #[test]
    fn test_add_appends_with_fresh_id() {
        let mut items = services();
        let mut dirty = false;
        let mut collection = Collection::new(&mut items, &mut dirty);

        let mut service = Service::new("Cloud", "Hosting");
        service.set_id(RecordId::new("s1"));
        let id = collection.add(service);

        assert_ne!(id, "s1");
        assert!(id.as_str().starts_with("s-"));
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.ids().last(), Some(&id));
        assert!(dirty);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let mut items = Vec::new();
        let mut dirty = false;
        let mut collection: Collection<'_, Service> = Collection::new(&mut items, &mut dirty);

        let first = collection.add(Service::new("A", ""));
        collection.remove_by_id(first.as_str()).unwrap();
        let second = collection.add(Service::new("B", ""));
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut items = services();
        let mut dirty = false;
        let mut collection = Collection::new(&mut items, &mut dirty);

        let removed = collection.remove_by_id("s2").unwrap();
        assert_eq!(removed.title, "Mobile");
        let titles: Vec<&str> = collection.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Web", "AI"]);
    }

    #[test]
    fn test_update_by_id_keeps_id() {
        let mut items = services();
        let mut dirty = false;
        let mut collection = Collection::new(&mut items, &mut dirty);

        collection
            .update_by_id("s3", |s| {
                s.title = "Machine Learning".to_string();
                s.id = RecordId::new("hijacked");
            })
            .unwrap();

        let updated = collection.get("s3").unwrap();
        assert_eq!(updated.title, "Machine Learning");
        assert!(collection.get("hijacked").is_none());
    }

    #[test]
    fn test_missing_id_is_an_error_and_not_dirty() {
        let mut items = services();
        let mut dirty = false;
        let mut collection = Collection::new(&mut items, &mut dirty);

        let err = collection.remove_by_id("nope").unwrap_err();
        assert_eq!(
            err,
            DraftError::NotFound {
                kind: "service",
                id: "nope".to_string()
            }
        );
        assert!(collection.update_by_id("nope", |_| {}).is_err());
        drop(collection);
        assert!(!dirty);
        assert_eq!(items.len(), 3);
    }
}
