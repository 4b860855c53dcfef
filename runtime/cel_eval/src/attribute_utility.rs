//! Unknown detection and merging.
//!
//! Built from the activation's unknown patterns. Steps use it to decide
//! whether a value reached through a trail must be replaced by an unknown,
//! and to fold unknown operands into a single result.

use cel_value::{Attribute, AttributePattern, MatchType, UnknownValue, Value};

use crate::attribute_trail::AttributeTrail;

#[derive(Copy, Clone, Debug)]
pub struct AttributeUtility<'p> {
    patterns: &'p [AttributePattern],
}

impl<'p> AttributeUtility<'p> {
    pub fn new(patterns: &'p [AttributePattern]) -> Self {
        AttributeUtility { patterns }
    }

    /// Whether `trail` names an unknown attribute.
    ///
    /// With `use_partial`, a trail that is only a prefix of a pattern counts
    /// too: some value beneath it is unknown.
    pub fn check_for_unknown(&self, trail: &AttributeTrail, use_partial: bool) -> bool {
        trail
            .attribute()
            .is_some_and(|attribute| self.matches(&attribute, use_partial))
    }

    /// Merge the unknowns among `values` with an unknown for every trail
    /// that matches a pattern.
    ///
    /// `values` and `trails` are parallel spans. Returns `None` when no
    /// operand is unknown.
    pub fn identify_and_merge_unknowns(
        &self,
        values: &[Value<'_>],
        trails: &[AttributeTrail],
        use_partial: bool,
    ) -> Option<UnknownValue> {
        let from_trails = trails
            .iter()
            .filter_map(AttributeTrail::attribute)
            .filter(|attribute| self.matches(attribute, use_partial))
            .map(UnknownValue::from_attribute);
        merge_all(values.iter().filter_map(Value::as_unknown).cloned().chain(from_trails))
    }

    /// Merge the values that are already unknown.
    pub fn merge_unknowns(&self, values: &[Value<'_>]) -> Option<UnknownValue> {
        merge_all(values.iter().filter_map(Value::as_unknown).cloned())
    }

    pub fn create_unknown_set(&self, attribute: Attribute) -> UnknownValue {
        UnknownValue::from_attribute(attribute)
    }

    fn matches(&self, attribute: &Attribute, use_partial: bool) -> bool {
        self.patterns
            .iter()
            .any(|pattern| match pattern.is_match(attribute) {
                MatchType::Full => true,
                MatchType::Partial => use_partial,
                MatchType::None => false,
            })
    }
}

fn merge_all(unknowns: impl Iterator<Item = UnknownValue>) -> Option<UnknownValue> {
    unknowns.reduce(|merged, next| merged.merge(&next))
}

#[cfg(test)]
mod tests;
