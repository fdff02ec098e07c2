use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A principal service and the siblings its manifest references.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: ServiceId,
    pub dependencies: Vec<ServiceId>,
}

impl Service {
    pub fn new(id: impl Into<String>, dependencies: Vec<ServiceId>) -> Self {
        Self {
            id: ServiceId::new(id),
            dependencies,
        }
    }
}
