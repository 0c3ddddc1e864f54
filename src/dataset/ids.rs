//! Newtype id for type-safe label references.
//!
//! A label id is a zero-based index into the [`LabelCatalog`]; the newtype
//! prevents accidentally mixing it up with item positions or counts.
//!
//! [`LabelCatalog`]: super::LabelCatalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based index into the label catalog.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub usize);

impl LabelId {
    /// Creates a new LabelId.
    #[inline]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying index.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelId({})", self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for LabelId {
    fn from(id: usize) -> Self {
        LabelId::new(id)
    }
}
