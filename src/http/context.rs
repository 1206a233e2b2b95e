use std::any::Any;
use std::collections::HashMap;

/// The attribute holding a session created while handling the current request.
pub const REQUEST_CREATED_SESSION: &str = "reqview.request-created-session";

/// Attributes shared by everything handling one request.
#[derive(Debug, Default)]
pub struct HttpContext {
    attributes: HashMap<String, Box<dyn Any>>,
}

impl HttpContext {
    pub fn new() -> HttpContext {
        HttpContext::default()
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set<T: 'static>(&mut self, key: &str, value: T) {
        self.attributes.insert(key.to_string(), Box::new(value));
    }

    /// Gets an attribute. Returns None if it is missing or has another type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// Removes an attribute and returns it if it has the given type.
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.attributes.remove(key)
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::http::context::HttpContext;

    #[test]
    fn typed_attributes() {
        let mut context = HttpContext::new();
        context.set("count", 3u32);
        context.set("name", String::from("reqview"));

        assert_eq!(context.get::<u32>("count"), Some(&3));
        assert_eq!(context.get::<String>("name").unwrap(), "reqview");
        assert_eq!(context.get::<i64>("count"), None);
        assert_eq!(context.get::<u32>("missing"), None);
    }

    #[test]
    fn remove_attribute() {
        let mut context = HttpContext::new();
        context.set("count", 3u32);

        assert_eq!(context.remove::<u32>("count"), Some(3));
        assert!(!context.contains_key("count"));
        assert!(context.is_empty());
    }
}
