//! Relation definitions

use crate::error::{Error, Result};
use crate::types::Document;
use std::borrow::Cow;
use std::str::FromStr;

/// A "belongs to" link from a collection to another collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    name: Cow<'static, str>,
    foreign_key: Cow<'static, str>,
    related: Cow<'static, str>,
}

impl Relation {
    /// Create a relation usable in `const` contexts
    pub const fn new(name: &'static str, foreign_key: &'static str, related: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            foreign_key: Cow::Borrowed(foreign_key),
            related: Cow::Borrowed(related),
        }
    }

    /// Create a relation from runtime strings
    pub fn owned(
        name: impl Into<String>,
        foreign_key: impl Into<String>,
        related: impl Into<String>,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            foreign_key: Cow::Owned(foreign_key.into()),
            related: Cow::Owned(related.into()),
        }
    }

    /// Name callers use to request this relation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field on the owning document that holds the related id
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Collection the related documents live in
    pub fn related(&self) -> &str {
        &self.related
    }
}

/// Parses `name=foreign_key:related`, e.g. `group=group_id:groups`
impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::config(format!(
                "Invalid relation '{s}', expected name=foreign_key:collection"
            ))
        };

        let (name, rest) = s.split_once('=').ok_or_else(invalid)?;
        let (foreign_key, related) = rest.split_once(':').ok_or_else(invalid)?;
        let (name, foreign_key, related) = (name.trim(), foreign_key.trim(), related.trim());

        if name.is_empty() || foreign_key.is_empty() || related.is_empty() {
            return Err(invalid());
        }

        Ok(Self::owned(name, foreign_key, related))
    }
}

/// The relations known for one collection
#[derive(Debug, Clone, Copy)]
pub struct RelationRegistry<'a> {
    collection: &'a str,
    relations: &'a [Relation],
}

impl<'a> RelationRegistry<'a> {
    /// Create a registry for a collection
    pub fn new(collection: &'a str, relations: &'a [Relation]) -> Self {
        Self {
            collection,
            relations,
        }
    }

    /// Registry declared by a document type
    pub fn of<D: Document>() -> RelationRegistry<'static> {
        RelationRegistry::new(D::COLLECTION, D::relations())
    }

    /// Collection this registry belongs to
    pub fn collection(&self) -> &'a str {
        self.collection
    }

    /// Look up a relation by name
    pub fn get(&self, name: &str) -> Option<&'a Relation> {
        self.relations.iter().find(|r| r.name() == name)
    }

    /// Resolve requested relation names, in request order and without
    /// duplicates. Fails on the first unknown name.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&'a Relation>> {
        let mut resolved: Vec<&'a Relation> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let relation = self
                .get(name)
                .ok_or_else(|| Error::unknown_relation(self.collection, name))?;
            if !resolved.iter().any(|r| r.name() == relation.name()) {
                resolved.push(relation);
            }
        }
        Ok(resolved)
    }

    /// Whether no relations are registered
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
