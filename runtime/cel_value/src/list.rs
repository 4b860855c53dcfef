//! List capability and the built-in list storage.

use std::fmt;

use crate::value::Value;

/// Read-only list capability consumed by the evaluator.
pub trait ListValue<'a>: fmt::Debug + Send + Sync {
    fn size(&self) -> usize;

    /// Element at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<Value<'a>>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<'a> dyn ListValue<'a> + 'a {
    pub fn iter(&self) -> impl Iterator<Item = Value<'a>> + '_ {
        (0..self.size()).map_while(|index| self.get(index))
    }
}

/// Contiguous list storage: a `Vec` behind a counted handle, or an arena
/// slice behind an arena handle.
#[derive(Debug)]
pub struct ListElements<C>(C);

impl<C> ListElements<C> {
    pub(crate) fn new(elements: C) -> Self {
        ListElements(elements)
    }
}

impl<'a, C> ListValue<'a> for ListElements<C>
where
    C: AsRef<[Value<'a>]> + fmt::Debug + Send + Sync,
{
    fn size(&self) -> usize {
        self.0.as_ref().len()
    }

    fn get(&self, index: usize) -> Option<Value<'a>> {
        self.0.as_ref().get(index).cloned()
    }
}
