//! Dependency closure of the entry points.
//!
//! Every entry point is expanded depth-first; a name is appended to the
//! closure only once everything it references has been appended, which gives
//! a topological order. A name met again while it is still being expanded is
//! taken as satisfied instead of being expanded a second time, which is how
//! reference cycles (`struct a { struct b *b; }` / `struct b { struct a *a; }`)
//! terminate.

use std::collections::{BTreeSet, HashMap};

use crate::{
    api::{
        index::Index,
        rules::Rules,
        unit::{Fragment, Unit},
    },
    Error, Result,
};

/// Visit state of a name during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Unvisited,
    /// Expansion started and has not finished yet
    InProgress,
    /// Appended to the closure
    Done,
}

impl VisitState {
    /// Only unvisited names are expanded; in-progress ones are cycle edges
    pub fn needs_visit(self) -> bool {
        matches!(self, VisitState::Unvisited)
    }
}

/// A name whose references are being walked
struct Frame<'a> {
    name: &'a str,
    pending: std::vec::IntoIter<&'a str>,
}

/// Computes the [`Closure`] of an [`Index`] under a set of [`Rules`]
pub struct Resolver<'a> {
    index: &'a Index<'a>,
    rules: &'a Rules,
    state: HashMap<&'a str, VisitState>,
    order: Vec<&'a str>,
    unresolved: BTreeSet<&'a str>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a Index<'a>, rules: &'a Rules) -> Self {
        Self {
            index,
            rules,
            state: HashMap::new(),
            order: Vec::new(),
            unresolved: BTreeSet::new(),
        }
    }

    pub fn state(&self, name: &str) -> VisitState {
        self.state
            .get(name)
            .copied()
            .unwrap_or(VisitState::Unvisited)
    }

    /// Seed every entry point of the index and return the ordered closure
    pub fn resolve(mut self) -> Result<Closure> {
        let index = self.index;
        for name in index.names() {
            if self.rules.is_entry_point(name) {
                self.add(name)?;
            }
        }
        tracing::debug!(
            "Resolved {} of {} names, {} unresolved references",
            self.order.len(),
            index.len(),
            self.unresolved.len()
        );
        Ok(Closure {
            names: self.order.into_iter().map(str::to_string).collect(),
            unresolved: self.unresolved.into_iter().map(str::to_string).collect(),
        })
    }

    /// Add `name` and everything it needs to the closure
    pub fn add(&mut self, name: &'a str) -> Result<()> {
        let mut stack = Vec::new();
        stack.extend(self.enter(name));
        while let Some(mut frame) = stack.pop() {
            match frame.pending.next() {
                Some(dependency) => {
                    stack.push(frame);
                    stack.extend(self.enter(dependency));
                }
                None => self.finish(frame.name)?,
            }
        }
        Ok(())
    }

    /// Start expanding `name`; returns `None` when there is nothing to walk
    fn enter(&mut self, name: &'a str) -> Option<Frame<'a>> {
        if self.rules.is_primitive(name) || !self.state(name).needs_visit() {
            return None;
        }
        if self.rules.is_always_opaque(name) {
            // members are never walked, so nothing else can be pulled in
            self.state.insert(name, VisitState::Done);
            self.order.push(name);
            return None;
        }
        let index = self.index;
        let Some(group) = index.get(name) else {
            if self.unresolved.insert(name) {
                tracing::debug!("No declaration for `{name}`, treating it as a primitive");
            }
            return None;
        };
        let pending = group
            .iter()
            .flat_map(|&(decl, _)| decl.references())
            .collect::<Vec<_>>();
        self.state.insert(name, VisitState::InProgress);
        Some(Frame {
            name,
            pending: pending.into_iter(),
        })
    }

    fn finish(&mut self, name: &'a str) -> Result<()> {
        match self.state.insert(name, VisitState::Done) {
            Some(VisitState::InProgress) => {
                self.order.push(name);
                Ok(())
            }
            _ => Err(Error::ResolverInvariant {
                name: name.to_string(),
            }),
        }
    }
}

/// Ordered set of names to emit: every name follows the names it references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    names: Vec<String>,
    unresolved: Vec<String>,
}

impl Closure {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Library-prefixed names that were referenced but never declared
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// One unit per name, holding the name's declarations as found in the index
    pub fn units<'a>(&'a self, index: &'a Index<'a>) -> impl Iterator<Item = Unit<'a>> + 'a {
        self.names.iter().map(move |name| Unit {
            name: name.clone(),
            fragments: index
                .declarations(name)
                .map(Fragment::borrowed)
                .collect(),
        })
    }
}
