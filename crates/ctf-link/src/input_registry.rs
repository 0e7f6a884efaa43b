//! The registry of input archives, keyed by the name the caller registered
//! them under (typically a file name).

use indexmap::IndexMap;

use crate::archive::Archive;

#[derive(Debug, Default)]
pub struct InputRegistry {
    inputs: IndexMap<String, Archive>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, archive: Archive) {
        self.inputs.insert(name.into(), archive);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Archive)> + '_ {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }
}
