use crate::assoclist::AssocList;
use crate::syntax::{shift_index, Shift};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    Unit,
    Nat,
    Arr(Box<Type>, Box<Type>),
    /// fields without a name are positional
    Record(AssocList<Option<String>, Type>),
    Variant(AssocList<String, Type>),
    /// a type name as written in the source, before resolution
    Named(String),
    /// De Bruijn index of a type variable or type abbreviation binding
    Var(usize),
}

impl Type {
    pub fn arr(from: Type, to: Type) -> Type {
        Type::Arr(Box::new(from), Box::new(to))
    }
}

impl Shift for Type {
    fn shift_above(&self, d: isize, cutoff: usize) -> Type {
        match self {
            Type::Bool | Type::Unit | Type::Nat | Type::Named(_) => self.clone(),
            Type::Var(k) => Type::Var(shift_index(*k, d, cutoff)),
            Type::Arr(from, to) => Type::Arr(
                Box::new(from.shift_above(d, cutoff)),
                Box::new(to.shift_above(d, cutoff)),
            ),
            Type::Record(fields) => {
                Type::Record(fields.map_val(|ty| ty.shift_above(d, cutoff)))
            }
            Type::Variant(fields) => {
                Type::Variant(fields.map_val(|ty| ty.shift_above(d, cutoff)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_free_vars() {
        let ty = Type::arr(Type::Var(0), Type::Var(2));
        assert_eq!(ty.shift(3), Type::arr(Type::Var(3), Type::Var(5)));
        assert_eq!(ty.shift_above(1, 1), Type::arr(Type::Var(0), Type::Var(3)));
    }

    #[test]
    fn shift_inside_fields() {
        let ty = Type::Record(AssocList::from_vec(vec![
            (Some("a".into()), Type::Var(1)),
            (None, Type::Variant(AssocList::from_vec(vec![(
                "b".into(),
                Type::Var(0),
            )]))),
        ]));
        let expected = Type::Record(AssocList::from_vec(vec![
            (Some("a".into()), Type::Var(0)),
            (None, Type::Variant(AssocList::from_vec(vec![(
                "b".into(),
                Type::Var(0),
            )]))),
        ]));
        assert_eq!(ty.shift_above(-1, 1), expected);
    }
}
