use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Session;

/// Keyed session storage. The outer lock only guards map access; each
/// session carries its own mutex, held for a whole turn so messages on
/// the same session are serialized.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an optional caller-supplied id to a live session handle,
    /// creating a session (and, if needed, the id itself) on first
    /// reference.
    pub fn ensure(&self, id: Option<&str>) -> (String, Arc<Mutex<Session>>) {
        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().simple().to_string(),
        };

        let mut map = self.inner.lock().unwrap();
        let handle = map
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(id.clone()))))
            .clone();
        (id, handle)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.inner.lock().unwrap().get(id).cloned()
    }
}
