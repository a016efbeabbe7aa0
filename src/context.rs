use std::rc::Rc;

use crate::syntax::{Shift, Term, Type};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// a name with nothing attached, used while resolving and printing
    Name,
    Var(Type),
    TyVar,
    TyAbbrev(Type),
    /// an evaluated term bound at the top level, with its type once checked
    TmAbbrev(Term, Option<Type>),
}

impl Binding {
    pub fn is_term(&self) -> bool {
        match self {
            Binding::Name | Binding::Var(_) | Binding::TmAbbrev(_, _) => true,
            Binding::TyVar | Binding::TyAbbrev(_) => false,
        }
    }

    pub fn is_type(&self) -> bool {
        !self.is_term()
    }
}

impl Shift for Binding {
    fn shift_above(&self, d: isize, cutoff: usize) -> Binding {
        match self {
            Binding::Name | Binding::TyVar => self.clone(),
            Binding::Var(ty) => Binding::Var(ty.shift_above(d, cutoff)),
            Binding::TyAbbrev(ty) => Binding::TyAbbrev(ty.shift_above(d, cutoff)),
            Binding::TmAbbrev(t, ty) => Binding::TmAbbrev(
                t.shift_above(d, cutoff),
                ty.as_ref().map(|ty| ty.shift_above(d, cutoff)),
            ),
        }
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    binding: Binding,
    next: Option<Rc<Entry>>,
}

/// Persistent stack of bindings, newest at index 0. Extending a context
/// shares the old one, so earlier contexts stay valid and unchanged.
#[derive(Clone, Debug, Default)]
pub struct Context {
    head: Option<Rc<Entry>>,
    len: usize,
}

impl Context {
    pub fn empty() -> Context {
        Context { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn add_binding(&self, name: String, binding: Binding) -> Context {
        Context {
            head: Some(Rc::new(Entry {
                name,
                binding,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub fn add_name(&self, name: String) -> Context {
        self.add_binding(name, Binding::Name)
    }

    /// Entries from the newest binder outward, as (name, unshifted binding)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        let mut current = self.head.as_ref();
        std::iter::from_fn(move || {
            let entry = current?;
            current = entry.next.as_ref();
            Some((entry.name.as_str(), &entry.binding))
        })
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.iter().nth(index).map(|(name, _)| name)
    }

    /// The binding at `index`, shifted so that the indices inside it are
    /// relative to this whole context rather than to the suffix it was
    /// created in
    pub fn get_binding(&self, index: usize) -> Option<Binding> {
        self.iter()
            .nth(index)
            .map(|(_, binding)| binding.shift(index as isize + 1))
    }

    pub fn is_name_bound(&self, name: &str) -> bool {
        self.iter().any(|(bound, _)| bound == name)
    }

    /// Extend the context with `name`, priming it until it no longer clashes
    /// with any name already bound
    pub fn pick_fresh_name(&self, name: &str) -> (Context, String) {
        let mut fresh = name.to_string();
        while self.is_name_bound(&fresh) {
            fresh.push('\'');
        }
        (self.add_name(fresh.clone()), fresh)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.iter()
            .position(|(bound, binding)| bound == name && binding.is_term())
    }

    pub fn type_index(&self, name: &str) -> Option<usize> {
        self.iter()
            .position(|(bound, binding)| bound == name && binding.is_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first() {
        let ctx = Context::empty()
            .add_name("x".into())
            .add_name("y".into());
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.name_of(0), Some("y"));
        assert_eq!(ctx.name_of(1), Some("x"));
        assert_eq!(ctx.name_of(2), None);
        assert_eq!(ctx.term_index("x"), Some(1));
    }

    #[test]
    fn extension_is_persistent() {
        let base = Context::empty().add_name("x".into());
        let extended = base.add_name("y".into());
        assert_eq!(base.len(), 1);
        assert_eq!(base.term_index("y"), None);
        assert_eq!(extended.term_index("y"), Some(0));
    }

    #[test]
    fn terms_and_types_resolve_separately() {
        let ctx = Context::empty()
            .add_binding("X".into(), Binding::TyVar)
            .add_binding("x".into(), Binding::Var(Type::Var(0)));
        assert_eq!(ctx.type_index("X"), Some(1));
        assert_eq!(ctx.term_index("X"), None);
        assert_eq!(ctx.term_index("x"), Some(0));
    }

    #[test]
    fn bindings_are_shifted_on_lookup() {
        // x : X was stored when X was index 0; seen from above x it is 1
        let ctx = Context::empty()
            .add_binding("X".into(), Binding::TyVar)
            .add_binding("x".into(), Binding::Var(Type::Var(0)));
        assert_eq!(ctx.get_binding(0), Some(Binding::Var(Type::Var(1))));
        assert_eq!(ctx.get_binding(1), Some(Binding::TyVar));
        assert_eq!(ctx.get_binding(2), None);
    }

    #[test]
    fn fresh_names() {
        let ctx = Context::empty().add_name("x".into());
        let (ctx, name) = ctx.pick_fresh_name("x");
        assert_eq!(name, "x'");
        let (_, name) = ctx.pick_fresh_name("x");
        assert_eq!(name, "x''");
        let (_, name) = ctx.pick_fresh_name("y");
        assert_eq!(name, "y");
    }
}
