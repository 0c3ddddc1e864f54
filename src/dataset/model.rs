//! Core dataset model.
//!
//! An annotated dataset is a label catalog plus one or more subsets, each an
//! ordered collection of items. Items reference their image by path; image
//! bytes are only attached when a caller chooses to load them, so the model
//! stays cheap to build from annotation text alone.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::catalog::LabelCatalog;
use super::ids::LabelId;

/// A reference to an item's image file, optionally carrying the bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageRef {
    /// Path to the image, usually `<image dir>/<file name>`.
    pub path: PathBuf,

    /// Image bytes, when a caller has attached them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl ImageRef {
    /// Creates an image reference without attached bytes.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }

    /// Attaches image bytes to the reference.
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether image bytes are attached.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// The file name component of the image path.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The final extension of the image path, with its leading dot.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
    }
}

/// One annotated example: a logical id, an optional image reference, and
/// the item's label annotations.
///
/// `labels` preserves every decoded occurrence in order, duplicates
/// included. Encoding collapses them to a set; see
/// [`label_set`](Self::label_set).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    /// Logical identifier, distinct from the image file name.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    pub labels: Vec<LabelId>,
}

impl Item {
    /// Creates an item with no image and no labels.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: None,
            labels: Vec::new(),
        }
    }

    /// Sets the item's image reference.
    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Sets the item's labels.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelId>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// The item's labels as a set: duplicates collapse to their first
    /// occurrence, keeping first-occurrence order.
    pub fn label_set(&self) -> Vec<LabelId> {
        let mut seen = std::collections::HashSet::with_capacity(self.labels.len());
        self.labels
            .iter()
            .copied()
            .filter(|label| seen.insert(*label))
            .collect()
    }
}

/// A named, ordered collection of items sharing one annotation file.
///
/// Iteration preserves first-insertion order. Re-inserting an existing id
/// replaces that record completely (image and labels) without moving its
/// position, which is what makes decode-then-encode order stable.
#[derive(Clone, Debug, Default)]
pub struct Subset {
    name: String,
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Subset {
    /// Creates an empty subset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts an item, replacing any existing record with the same id in
    /// place.
    pub fn insert(&mut self, item: Item) {
        match self.index.get(&item.id) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.id.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Iterates items in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Subset {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A complete dataset: the label catalog plus its subsets.
///
/// Subsets are kept in the order they were discovered or added.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub catalog: LabelCatalog,
    pub subsets: Vec<Subset>,
}

impl Dataset {
    /// Creates a dataset with the given catalog and no subsets.
    pub fn new(catalog: LabelCatalog) -> Self {
        Self {
            catalog,
            subsets: Vec::new(),
        }
    }

    /// Looks up a subset by name.
    pub fn subset(&self, name: &str) -> Option<&Subset> {
        self.subsets.iter().find(|subset| subset.name() == name)
    }

    /// Total item count across all subsets.
    pub fn item_count(&self) -> usize {
        self.subsets.iter().map(Subset::len).sum()
    }
}
