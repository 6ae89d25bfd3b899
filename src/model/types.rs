//! The ordered, de-duplicated `@type` set of a resource.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered set of vocabulary type IRIs.
///
/// Duplicates are dropped on insertion; iteration follows first-seen order.
/// Most resources carry one or two types, so they stay inline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypesCollection {
    items: SmallVec<[String; 2]>,
}

impl TypesCollection {
    /// The shared empty type set.
    pub const EMPTY: TypesCollection = TypesCollection { items: SmallVec::new_const() };

    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = Self::default();
        for ty in types {
            result.push(ty);
        }
        result
    }

    /// Append a type unless it is already present. Returns whether it was added.
    pub fn push(&mut self, ty: impl Into<String>) -> bool {
        let ty = ty.into();
        if self.contains(&ty) {
            return false;
        }
        self.items.push(ty);
        true
    }

    pub fn contains(&self, ty: &str) -> bool {
        self.items.iter().any(|t| t == ty)
    }

    /// Union with `extra`, keeping this set's order first.
    pub fn with<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut result = self.clone();
        for ty in extra {
            result.push(ty);
        }
        result
    }

    /// Copy of this set with `ty` removed.
    pub fn without(&self, ty: &str) -> Self {
        Self {
            items: self.items.iter().filter(|t| *t != ty).cloned().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TypesCollection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a TypesCollection {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}
