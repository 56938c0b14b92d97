//! The view boundary the navigation core relies on

use std::any::Any;

use mtnav_common::Result;

/// A page or state a step lands on.
///
/// The core only ever asks whether the view is displayed; anything richer
/// (filling forms, clicking) is reached by downcasting to the concrete type.
pub trait View: Any {
    /// Whether the page this view describes is currently shown
    fn is_displayed(&self) -> Result<bool>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn View {
    /// Borrow the concrete view type, if this is one
    pub fn downcast_ref<V: View>(&self) -> Option<&V> {
        self.as_any().downcast_ref::<V>()
    }

    pub fn is<V: View>(&self) -> bool {
        self.as_any().is::<V>()
    }
}
