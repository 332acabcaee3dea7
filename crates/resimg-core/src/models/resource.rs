use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A validated `(resource type, resource id)` pair.
///
/// Only [`crate::validation::validate_resource`] constructs one, so holding a
/// `ResourceRef` means the type is allow-listed and the id is positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef {
    pub resource: String,
    pub id: u64,
}

impl ResourceRef {
    pub(crate) fn new(resource: impl Into<String>, id: u64) -> Self {
        Self {
            resource: resource.into(),
            id,
        }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.resource, self.id)
    }
}
