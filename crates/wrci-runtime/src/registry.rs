//! Per-run container registry
//!
//! Maps pipeline names to the containers started for them. A named pipeline
//! that runs again later in the same run reuses its entry.

use crate::adapter::ContainerHandle;
use std::collections::HashMap;

/// Named containers started during one run
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    handles: HashMap<String, ContainerHandle>,
    /// Registration order, used for teardown
    order: Vec<String>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the container registered for a pipeline name
    pub fn get(&self, name: &str) -> Option<&ContainerHandle> {
        self.handles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    /// Register a container under a pipeline name
    ///
    /// Returns the previous handle if the name was already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handle: ContainerHandle,
    ) -> Option<ContainerHandle> {
        let name = name.into();
        let previous = self.handles.insert(name.clone(), handle);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Remove every entry, most recently registered first
    pub fn drain(&mut self) -> Vec<ContainerHandle> {
        let mut handles = Vec::with_capacity(self.order.len());
        while let Some(name) = self.order.pop() {
            if let Some(handle) = self.handles.remove(&name) {
                handles.push(handle);
            }
        }
        handles
    }
}
