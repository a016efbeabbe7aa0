use std::mem;

use crate::assoclist::AssocList;
use crate::syntax::{shift_index, with_stack, Shift, Type};

/// Record fields; a field without a name is positional
pub type Fields<T> = AssocList<Option<String>, T>;
/// Case branches: label -> (name bound to the payload, body)
pub type Branches = AssocList<String, (String, Term)>;

#[derive(Debug, PartialEq, Eq)]
pub enum Term {
    True,
    False,
    If(Box<Term>, Box<Term>, Box<Term>),
    /// De Bruijn index, counting binders from the innermost outward
    Var(usize),
    /// an identifier as written in the source, before resolution
    FreeIdent(String),
    Abs(String, Type, Box<Term>),
    App(Box<Term>, Box<Term>),
    Ascribe(Box<Term>, Type),
    /// injection of a term into the variant type it is annotated with
    Tag(String, Box<Term>, Type),
    Case(Box<Term>, Branches),
    Unit,
    Let(String, Box<Term>, Box<Term>),
    Record(Fields<Term>),
    Proj(Box<Term>, String),
    Fix(Box<Term>),
    Zero,
    Succ(Box<Term>),
    Pred(Box<Term>),
    IsZero(Box<Term>),
}

/// `succ` applied `n` times to `0`
pub fn numeral(n: usize) -> Term {
    (0..n).fold(Term::Zero, |t, _| Term::Succ(Box::new(t)))
}

impl Term {
    /// `letrec x: ty = t in body` is `let x = fix (lambda x: ty. t) in body`
    pub fn letrec(name: String, ty: Type, t: Term, body: Term) -> Term {
        let func = Term::Abs(name.clone(), ty, Box::new(t));
        Term::Let(
            name,
            Box::new(Term::Fix(Box::new(func))),
            Box::new(body),
        )
    }

    pub fn is_numeric_val(&self) -> bool {
        let mut current = self;
        loop {
            match current {
                Term::Zero => return true,
                Term::Succ(t) => current = t,
                _ => return false,
            }
        }
    }

    pub fn is_val(&self) -> bool {
        match self {
            Term::True | Term::False | Term::Unit | Term::Abs(_, _, _) => true,
            Term::Tag(_, t, _) => t.is_val(),
            Term::Record(fields) => fields.iter().all(|(_, t)| t.is_val()),
            t => t.is_numeric_val(),
        }
    }

    /// Replace every occurrence of `Var(j)` with `s`
    pub fn subst(&self, j: usize, s: &Term) -> Term {
        with_stack(|| self.subst_impl(j, s))
    }

    fn subst_impl(&self, j: usize, s: &Term) -> Term {
        use self::Term::*;
        match self {
            True | False | Unit | Zero | FreeIdent(_) => self.clone(),
            Var(k) => {
                if *k == j {
                    s.clone()
                } else {
                    Var(*k)
                }
            }
            If(cond, t1, t2) => If(
                Box::new(cond.subst(j, s)),
                Box::new(t1.subst(j, s)),
                Box::new(t2.subst(j, s)),
            ),
            Abs(param, ty, body) => Abs(
                param.clone(),
                ty.clone(),
                Box::new(body.subst(j + 1, &s.shift(1))),
            ),
            App(func, arg) => {
                App(Box::new(func.subst(j, s)), Box::new(arg.subst(j, s)))
            }
            Ascribe(t, ty) => Ascribe(Box::new(t.subst(j, s)), ty.clone()),
            Tag(label, t, ty) => {
                Tag(label.clone(), Box::new(t.subst(j, s)), ty.clone())
            }
            Case(t, branches) => {
                let inner = s.shift(1);
                Case(
                    Box::new(t.subst(j, s)),
                    branches.map_val(|(x, body)| {
                        (x.clone(), body.subst(j + 1, &inner))
                    }),
                )
            }
            Let(x, bound, body) => Let(
                x.clone(),
                Box::new(bound.subst(j, s)),
                Box::new(body.subst(j + 1, &s.shift(1))),
            ),
            Record(fields) => Record(fields.map_val(|t| t.subst(j, s))),
            Proj(t, label) => Proj(Box::new(t.subst(j, s)), label.clone()),
            Fix(t) => Fix(Box::new(t.subst(j, s))),
            Succ(t) => Succ(Box::new(t.subst(j, s))),
            Pred(t) => Pred(Box::new(t.subst(j, s))),
            IsZero(t) => IsZero(Box::new(t.subst(j, s))),
        }
    }
}

/// Beta-reduction: substitute `value` for the outermost binder of `body`
/// and close the binder
pub fn substitute_top(value: &Term, body: &Term) -> Term {
    body.subst(0, &value.shift(1)).shift(-1)
}

impl Clone for Term {
    fn clone(&self) -> Term {
        with_stack(|| clone_term(self))
    }
}

fn clone_term(term: &Term) -> Term {
    use self::Term::*;
    match term {
        True => True,
        False => False,
        Unit => Unit,
        Zero => Zero,
        Var(index) => Var(*index),
        FreeIdent(name) => FreeIdent(name.clone()),
        If(cond, t1, t2) => If(cond.clone(), t1.clone(), t2.clone()),
        Abs(param, ty, body) => Abs(param.clone(), ty.clone(), body.clone()),
        App(func, arg) => App(func.clone(), arg.clone()),
        Ascribe(t, ty) => Ascribe(t.clone(), ty.clone()),
        Tag(label, t, ty) => Tag(label.clone(), t.clone(), ty.clone()),
        Case(t, branches) => Case(t.clone(), branches.clone()),
        Let(x, bound, body) => Let(x.clone(), bound.clone(), body.clone()),
        Record(fields) => Record(fields.clone()),
        Proj(t, label) => Proj(t.clone(), label.clone()),
        Fix(t) => Fix(t.clone()),
        Succ(t) => Succ(t.clone()),
        Pred(t) => Pred(t.clone()),
        IsZero(t) => IsZero(t.clone()),
    }
}

/// Subterms are moved onto a worklist before they are dropped, so a long
/// `succ` chain is freed in a loop rather than by recursion.
impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut t) = pending.pop() {
            t.take_children(&mut pending);
        }
    }
}

impl Term {
    fn is_leaf(&self) -> bool {
        match self {
            Term::True | Term::False | Term::Unit | Term::Zero => true,
            Term::Var(_) | Term::FreeIdent(_) => true,
            _ => false,
        }
    }

    /// Move every non-leaf subterm into `out`, leaving `Unit` behind
    fn take_children(&mut self, out: &mut Vec<Term>) {
        use self::Term::*;
        fn take(out: &mut Vec<Term>, t: &mut Box<Term>) {
            if !t.is_leaf() {
                out.push(mem::replace(&mut **t, Term::Unit));
            }
        }
        match self {
            True | False | Unit | Zero | Var(_) | FreeIdent(_) => (),
            If(cond, t1, t2) => {
                take(out, cond);
                take(out, t1);
                take(out, t2);
            }
            App(t1, t2) | Let(_, t1, t2) => {
                take(out, t1);
                take(out, t2);
            }
            Abs(_, _, t)
            | Ascribe(t, _)
            | Tag(_, t, _)
            | Proj(t, _)
            | Fix(t)
            | Succ(t)
            | Pred(t)
            | IsZero(t) => take(out, t),
            Case(t, branches) => {
                take(out, t);
                out.extend(branches.inner.drain(..).map(|(_, (_, body))| body));
            }
            Record(fields) => out.extend(fields.inner.drain(..).map(|(_, t)| t)),
        }
    }
}

impl Shift for Term {
    fn shift_above(&self, d: isize, c: usize) -> Term {
        with_stack(|| shift_term(self, d, c))
    }
}

fn shift_term(term: &Term, d: isize, c: usize) -> Term {
    use self::Term::*;
    match term {
        True | False | Unit | Zero | FreeIdent(_) => term.clone(),
        Var(k) => Var(shift_index(*k, d, c)),
        If(cond, t1, t2) => If(
            Box::new(cond.shift_above(d, c)),
            Box::new(t1.shift_above(d, c)),
            Box::new(t2.shift_above(d, c)),
        ),
        Abs(param, ty, body) => Abs(
            param.clone(),
            ty.shift_above(d, c),
            Box::new(body.shift_above(d, c + 1)),
        ),
        App(func, arg) => App(
            Box::new(func.shift_above(d, c)),
            Box::new(arg.shift_above(d, c)),
        ),
        Ascribe(t, ty) => {
            Ascribe(Box::new(t.shift_above(d, c)), ty.shift_above(d, c))
        }
        Tag(label, t, ty) => Tag(
            label.clone(),
            Box::new(t.shift_above(d, c)),
            ty.shift_above(d, c),
        ),
        Case(t, branches) => Case(
            Box::new(t.shift_above(d, c)),
            branches.map_val(|(x, body)| {
                (x.clone(), body.shift_above(d, c + 1))
            }),
        ),
        Let(x, bound, body) => Let(
            x.clone(),
            Box::new(bound.shift_above(d, c)),
            Box::new(body.shift_above(d, c + 1)),
        ),
        Record(fields) => {
            Record(fields.map_val(|t| t.shift_above(d, c)))
        }
        Proj(t, label) => Proj(Box::new(t.shift_above(d, c)), label.clone()),
        Fix(t) => Fix(Box::new(t.shift_above(d, c))),
        Succ(t) => Succ(Box::new(t.shift_above(d, c))),
        Pred(t) => Pred(Box::new(t.shift_above(d, c))),
        IsZero(t) => IsZero(Box::new(t.shift_above(d, c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Term::*;

    fn abs(body: Term) -> Term {
        Abs("x".into(), Type::Bool, Box::new(body))
    }

    fn app(f: Term, a: Term) -> Term {
        App(Box::new(f), Box::new(a))
    }

    #[test]
    fn shift_skips_bound() {
        let t = abs(app(Var(0), Var(1)));
        assert_eq!(t.shift(1), abs(app(Var(0), Var(2))));
        assert_eq!(t.shift(1).shift(-1), t);
    }

    #[test]
    fn shift_reaches_embedded_types() {
        let t = Ascribe(Box::new(Var(0)), Type::Var(0));
        assert_eq!(t.shift(2), Ascribe(Box::new(Var(2)), Type::Var(2)));
        let t = Abs("x".into(), Type::Var(0), Box::new(Var(0)));
        assert_eq!(t.shift(1), Abs("x".into(), Type::Var(1), Box::new(Var(0))));
    }

    #[test]
    fn subst_under_binder() {
        // [0 -> 5] (lambda. 1 0), where 5 must become 6 under the binder
        let t = abs(app(Var(1), Var(0)));
        assert_eq!(t.subst(0, &Var(5)), abs(app(Var(6), Var(0))));
    }

    #[test]
    fn subst_case_branch() {
        let branches = AssocList::from_vec(vec![(
            "a".to_string(),
            ("y".to_string(), app(Var(1), Var(0))),
        )]);
        let t = Case(Box::new(Var(0)), branches);
        let expected = Case(
            Box::new(True),
            AssocList::from_vec(vec![(
                "a".to_string(),
                ("y".to_string(), app(True, Var(0))),
            )]),
        );
        assert_eq!(t.subst(0, &True), expected);
    }

    #[test]
    fn top_substitution() {
        // (lambda. lambda. 1 2) applied to a free variable 0
        let body = abs(app(Var(1), Var(2)));
        assert_eq!(substitute_top(&Var(0), &body), abs(app(Var(1), Var(1))));
        assert_eq!(substitute_top(&Zero, &Succ(Box::new(Var(0)))), numeral(1));
    }

    #[test]
    fn long_succ_chains() {
        let t = numeral(100_000);
        let shifted = t.shift(1);
        assert!(shifted.is_numeric_val());
        let copy = t.clone();
        drop(t);
        assert!(copy.subst(0, &True).is_numeric_val());
    }

    #[test]
    fn values() {
        assert!(numeral(3).is_val());
        assert!(!Succ(Box::new(True)).is_val());
        assert!(Record(AssocList::from_vec(vec![(None, Zero), (None, Unit)])).is_val());
        assert!(!Record(AssocList::from_vec(vec![(None, app(True, True))])).is_val());
        assert!(Tag("a".into(), Box::new(Zero), Type::Nat).is_val());
        assert!(!Var(0).is_val());
    }
}
