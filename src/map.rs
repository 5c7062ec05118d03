//! Keyed lookup over a record's specifications.
//!
//! A [`SpecificationMap`] owns one [`Specification`] per parameter key and
//! optionally a canonicalization function applied to every key, both the
//! stored ones and the ones looked up. With
//! [`keys_lowercase_nospace`] a file may say `Edge Count` where the
//! specification says `edgecount` and the two still meet.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BadKeySet, Failure};
use crate::reader::Reader;
use crate::spec::Specification;
use crate::writer::Writer;

type CanonicalFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Specifications indexed by canonical key.
pub struct SpecificationMap<R: 'static> {
    specs: HashMap<String, Specification<R>>,
    canonical: Option<CanonicalFn>,
}

impl<R: 'static> Clone for SpecificationMap<R> {
    fn clone(&self) -> Self {
        SpecificationMap {
            specs: self.specs.clone(),
            canonical: self.canonical.clone(),
        }
    }
}

impl<R: 'static> fmt::Debug for SpecificationMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("SpecificationMap")
            .field("keys", &keys)
            .finish()
    }
}

impl<R: 'static> SpecificationMap<R> {
    /// Index `specs` by their keys as spelled.
    pub fn new(specs: impl IntoIterator<Item = Specification<R>>) -> Result<Self, BadKeySet> {
        Self::build(specs, None)
    }

    /// Index `specs` by canonicalized key; lookups canonicalize the same
    /// way. Two specifications collapsing onto one canonical key is a
    /// [`BadKeySet`] error.
    pub fn with_canonical_keys(
        specs: impl IntoIterator<Item = Specification<R>>,
        canonical: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Result<Self, BadKeySet> {
        Self::build(specs, Some(Arc::new(canonical)))
    }

    fn build(
        specs: impl IntoIterator<Item = Specification<R>>,
        canonical: Option<CanonicalFn>,
    ) -> Result<Self, BadKeySet> {
        let mut map = SpecificationMap {
            specs: HashMap::new(),
            canonical,
        };
        for spec in specs {
            map.insert(spec)?;
        }
        Ok(map)
    }

    /// Add one specification. Colliding with an already-present canonical
    /// key is a [`BadKeySet`] error and the map is unchanged.
    pub fn insert(&mut self, spec: Specification<R>) -> Result<(), BadKeySet> {
        let key = self.canonical_key(spec.key()).into_owned();
        if self.specs.contains_key(&key) {
            return Err(BadKeySet { key });
        }
        self.specs.insert(key, spec);
        Ok(())
    }

    fn canonical_key<'k>(&self, key: &'k str) -> Cow<'k, str> {
        match &self.canonical {
            Some(canonical) => Cow::Owned(canonical(key)),
            None => Cow::Borrowed(key),
        }
    }

    /// Look up by key, canonicalizing first.
    pub fn get(&self, key: &str) -> Option<&Specification<R>> {
        self.specs.get(self.canonical_key(key).as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// All specifications, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Specification<R>> {
        self.specs.values()
    }

    /// Parse and store one parameter by key. An unknown key reports
    /// `unrecognized_key`.
    pub fn read(
        &self,
        record: &mut R,
        key: &str,
        repn: &str,
        reader: &Reader,
    ) -> Result<(), Failure> {
        match self.get(key) {
            Some(spec) => spec.read(record, repn, reader),
            None => Err(Failure::unrecognized_key(key)),
        }
    }

    /// Render one parameter by key. An unknown key reports
    /// `unrecognized_key`.
    pub fn write(&self, record: &R, key: &str, writer: &Writer) -> Result<String, Failure> {
        match self.get(key) {
            Some(spec) => spec.write(record, writer),
            None => Err(Failure::unrecognized_key(key)),
        }
    }
}

/// Canonicalize keys to lowercase.
pub fn keys_lowercase(key: &str) -> String {
    key.to_lowercase()
}

/// Canonicalize keys to lowercase with all whitespace removed, so
/// `Edge Count` and `edgecount` collide on purpose.
pub fn keys_lowercase_nospace(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
