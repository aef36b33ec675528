//! Collection state shared by every server-owned resource type.
//!
//! DESIGN
//! ======
//! `items` and `focused` are independent: fetching one item never touches the
//! list, and list fetches replace the list wholesale with no merge.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

/// A server record that can be matched by identity.
pub trait Resource: Clone + PartialEq {
    type Id: PartialEq + Copy;

    fn resource_id(&self) -> Self::Id;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub focused: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), focused: None, loading: false, error: None }
    }
}

impl<T: Resource> ResourceState<T> {
    /// Start an operation: mark loading and drop the previous error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn push_item(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn set_focused(&mut self, item: T) {
        self.focused = Some(item);
    }

    /// Swap in a server-updated record wherever its id appears.
    pub fn replace_item(&mut self, item: &T) {
        let id = item.resource_id();
        if let Some(slot) = self.items.iter_mut().find(|i| i.resource_id() == id) {
            *slot = item.clone();
        }
        if self.focused.as_ref().is_some_and(|f| f.resource_id() == id) {
            self.focused = Some(item.clone());
        }
    }

    pub fn remove_item(&mut self, id: T::Id) {
        self.items.retain(|i| i.resource_id() != id);
        if self.focused.as_ref().is_some_and(|f| f.resource_id() == id) {
            self.focused = None;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
