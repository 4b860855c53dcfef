//! Attribute trails: the provenance path attached to stack values.
//!
//! A trail is a persistent linked path. Stepping a trail allocates one node
//! that points back at its parent, so a list range and each of its element
//! trails share the range's prefix instead of copying it.

use std::fmt;
use std::sync::Arc;

use cel_value::{Attribute, AttributeQualifier};

#[derive(Debug)]
enum TrailNode {
    Variable(Arc<str>),
    Qualified {
        parent: Arc<TrailNode>,
        qualifier: AttributeQualifier,
    },
}

/// Immutable attribute path; empty when unknown tracking is off.
#[derive(Clone, Default)]
pub struct AttributeTrail(Option<Arc<TrailNode>>);

impl AttributeTrail {
    /// Trail rooted at a variable.
    pub fn new(variable: &str) -> Self {
        AttributeTrail(Some(Arc::new(TrailNode::Variable(Arc::from(variable)))))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Extend the path by one qualifier. Stepping an empty trail stays empty.
    #[must_use]
    pub fn step(&self, qualifier: AttributeQualifier) -> Self {
        match &self.0 {
            None => AttributeTrail(None),
            Some(parent) => AttributeTrail(Some(Arc::new(TrailNode::Qualified {
                parent: Arc::clone(parent),
                qualifier,
            }))),
        }
    }

    /// The full attribute, or `None` for an empty trail.
    pub fn attribute(&self) -> Option<Attribute> {
        let mut node = self.0.as_deref()?;
        let mut qualifiers = Vec::new();
        loop {
            match node {
                TrailNode::Variable(name) => {
                    qualifiers.reverse();
                    return Some(Attribute::with_qualifiers(name, qualifiers));
                }
                TrailNode::Qualified { parent, qualifier } => {
                    qualifiers.push(qualifier.clone());
                    node = &**parent;
                }
            }
        }
    }
}

impl PartialEq for AttributeTrail {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.attribute() == other.attribute(),
        }
    }
}

impl Eq for AttributeTrail {}

impl fmt::Debug for AttributeTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute() {
            Some(attribute) => write!(f, "AttributeTrail({attribute})"),
            None => f.write_str("AttributeTrail(<empty>)"),
        }
    }
}
