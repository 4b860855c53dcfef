//! Attributes, attribute patterns, and the sets carried by unknown values.
//!
//! An [`Attribute`] names where a value came from: a root variable followed
//! by field and index qualifiers (`request.headers["x"]`). An
//! [`AttributePattern`] describes which attributes the embedding host treats
//! as unknown; a pattern qualifier may be a wildcard.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// One step of an attribute path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeQualifier {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// Field name or string map key.
    String(Arc<str>),
}

impl AttributeQualifier {
    pub fn field(name: &str) -> Self {
        AttributeQualifier::String(Arc::from(name))
    }
}

impl fmt::Display for AttributeQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeQualifier::Bool(b) => write!(f, "[{b}]"),
            AttributeQualifier::Int(i) => write!(f, "[{i}]"),
            AttributeQualifier::Uint(u) => write!(f, "[{u}u]"),
            AttributeQualifier::String(s) => write!(f, ".{s}"),
        }
    }
}

/// A variable plus its qualifier path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute {
    variable: Arc<str>,
    qualifiers: SmallVec<[AttributeQualifier; 4]>,
}

impl Attribute {
    pub fn new(variable: &str) -> Self {
        Attribute {
            variable: Arc::from(variable),
            qualifiers: SmallVec::new(),
        }
    }

    pub fn with_qualifiers(
        variable: &str,
        qualifiers: impl IntoIterator<Item = AttributeQualifier>,
    ) -> Self {
        Attribute {
            variable: Arc::from(variable),
            qualifiers: qualifiers.into_iter().collect(),
        }
    }

    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    pub fn qualifiers(&self) -> &[AttributeQualifier] {
        &self.qualifiers
    }

    /// A copy of this attribute extended by one qualifier.
    #[must_use]
    pub fn qualified(&self, qualifier: AttributeQualifier) -> Self {
        let mut qualifiers = self.qualifiers.clone();
        qualifiers.push(qualifier);
        Attribute {
            variable: Arc::clone(&self.variable),
            qualifiers,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variable)?;
        for qualifier in &self.qualifiers {
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}

/// Result of matching an attribute against a pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchType {
    None,
    /// The attribute is a strict prefix of the pattern.
    Partial,
    /// Every pattern qualifier matches.
    Full,
}

/// One step of an attribute pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QualifierPattern {
    Wildcard,
    Exact(AttributeQualifier),
}

impl QualifierPattern {
    pub fn matches(&self, qualifier: &AttributeQualifier) -> bool {
        match self {
            QualifierPattern::Wildcard => true,
            QualifierPattern::Exact(expected) => expected == qualifier,
        }
    }
}

/// Describes a family of attributes, e.g. `request.headers[*]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributePattern {
    variable: Arc<str>,
    qualifiers: Vec<QualifierPattern>,
}

impl AttributePattern {
    pub fn new(variable: &str) -> Self {
        AttributePattern {
            variable: Arc::from(variable),
            qualifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.qualifiers
            .push(QualifierPattern::Exact(AttributeQualifier::field(name)));
        self
    }

    #[must_use]
    pub fn index(mut self, index: i64) -> Self {
        self.qualifiers
            .push(QualifierPattern::Exact(AttributeQualifier::Int(index)));
        self
    }

    #[must_use]
    pub fn wildcard(mut self) -> Self {
        self.qualifiers.push(QualifierPattern::Wildcard);
        self
    }

    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    pub fn qualifiers(&self) -> &[QualifierPattern] {
        &self.qualifiers
    }

    /// Match `attribute` against this pattern.
    ///
    /// An attribute longer than the pattern still matches fully: anything
    /// reached through an unknown attribute is unknown too.
    pub fn is_match(&self, attribute: &Attribute) -> MatchType {
        if *self.variable != *attribute.variable {
            return MatchType::None;
        }
        let (len, result) = if self.qualifiers.len() > attribute.qualifiers.len() {
            (attribute.qualifiers.len(), MatchType::Partial)
        } else {
            (self.qualifiers.len(), MatchType::Full)
        };
        let all_match = self.qualifiers[..len]
            .iter()
            .zip(&attribute.qualifiers[..len])
            .all(|(pattern, qualifier)| pattern.matches(qualifier));
        if all_match {
            result
        } else {
            MatchType::None
        }
    }
}

/// Ordered set of attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet(BTreeSet<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        AttributeSet::default()
    }

    pub fn add(&mut self, attribute: Attribute) {
        self.0.insert(attribute);
    }

    pub fn extend(&mut self, other: &AttributeSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.0.contains(attribute)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Attribute> {
        self.0.iter()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        AttributeSet(iter.into_iter().collect())
    }
}

/// A function call whose result could not be computed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionResult {
    pub function: Arc<str>,
    pub expr_id: i64,
}

/// Ordered set of unknown function results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionResultSet(BTreeSet<FunctionResult>);

impl FunctionResultSet {
    pub fn new() -> Self {
        FunctionResultSet::default()
    }

    pub fn add(&mut self, result: FunctionResult) {
        self.0.insert(result);
    }

    pub fn extend(&mut self, other: &FunctionResultSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, FunctionResult> {
        self.0.iter()
    }
}

impl FromIterator<FunctionResult> for FunctionResultSet {
    fn from_iter<I: IntoIterator<Item = FunctionResult>>(iter: I) -> Self {
        FunctionResultSet(iter.into_iter().collect())
    }
}
