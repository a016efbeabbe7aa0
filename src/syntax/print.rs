use std::fmt;

use crate::context::Context;
use crate::syntax::{with_stack, Term, Type};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// raw indices, binder names dropped
    DeBruijn,
    /// names taken from the context, binders renamed apart
    Named,
}

pub fn render(term: &Term, ctx: &Context, mode: RenderMode) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = printer(ctx, mode).term(&mut out, term);
    out
}

pub fn render_type(ty: &Type, ctx: &Context, mode: RenderMode) -> String {
    let mut out = String::new();
    let _ = printer(ctx, mode).ty(&mut out, ty);
    out
}

fn printer(ctx: &Context, mode: RenderMode) -> Printer {
    match mode {
        RenderMode::DeBruijn => Printer { ctx: None },
        RenderMode::Named => Printer {
            ctx: Some(ctx.clone()),
        },
    }
}

/// Index form
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Printer { ctx: None }.term(f, self)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Printer { ctx: None }.ty(f, self)
    }
}

/// Prints in named form when it carries a context, in index form otherwise
struct Printer {
    ctx: Option<Context>,
}

impl Printer {
    fn bind(&self, name: &str) -> (Printer, String) {
        match &self.ctx {
            Some(ctx) => {
                let (ctx, fresh) = ctx.pick_fresh_name(name);
                (Printer { ctx: Some(ctx) }, fresh)
            }
            None => (Printer { ctx: None }, "_".to_string()),
        }
    }

    fn var(&self, out: &mut dyn fmt::Write, index: usize) -> fmt::Result {
        match &self.ctx {
            None => write!(out, "{}", index),
            Some(ctx) => match ctx.name_of(index) {
                Some(name) => write!(out, "{}", name),
                None => write!(
                    out,
                    "[bad index {} in context of length {}]",
                    index,
                    ctx.len()
                ),
            },
        }
    }

    fn term(&self, out: &mut dyn fmt::Write, term: &Term) -> fmt::Result {
        with_stack(|| self.term_impl(out, term))
    }

    fn term_impl(&self, out: &mut dyn fmt::Write, term: &Term) -> fmt::Result {
        match term {
            Term::Abs(param, ty, body) => {
                let (inner, name) = self.bind(param);
                match self.ctx {
                    Some(_) => write!(out, "(λ{}:", name)?,
                    None => write!(out, "(λ:")?,
                }
                self.ty(out, ty)?;
                write!(out, ". ")?;
                inner.term(out, body)?;
                write!(out, ")")
            }
            Term::If(cond, t1, t2) => {
                write!(out, "if ")?;
                self.term(out, cond)?;
                write!(out, " then ")?;
                self.term(out, t1)?;
                write!(out, " else ")?;
                self.term(out, t2)
            }
            Term::Let(x, bound, body) => {
                let (inner, name) = self.bind(x);
                write!(out, "let {} = ", name)?;
                self.term(out, bound)?;
                write!(out, " in ")?;
                inner.term(out, body)
            }
            Term::Case(scrutinee, branches) => {
                write!(out, "case ")?;
                self.term(out, scrutinee)?;
                write!(out, " of ")?;
                for (i, (label, (x, body))) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(out, " | ")?;
                    }
                    let (inner, name) = self.bind(x);
                    write!(out, "<{}={}> ==> ", label, name)?;
                    inner.atom(out, body)?;
                }
                Ok(())
            }
            Term::Ascribe(t, ty) => {
                self.atom(out, t)?;
                write!(out, " as ")?;
                self.ty(out, ty)
            }
            Term::Tag(label, t, ty) => {
                write!(out, "<{}=", label)?;
                self.term(out, t)?;
                write!(out, "> as ")?;
                self.ty(out, ty)
            }
            Term::Fix(t) => self.keyword(out, "fix", t),
            Term::Succ(t) => self.keyword(out, "succ", t),
            Term::Pred(t) => self.keyword(out, "pred", t),
            Term::IsZero(t) => self.keyword(out, "iszero", t),
            _ => self.atom(out, term),
        }
    }

    fn keyword(&self, out: &mut dyn fmt::Write, kw: &str, t: &Term) -> fmt::Result {
        write!(out, "{} ", kw)?;
        self.atom(out, t)
    }

    /// Terms that read unambiguously as an operand; anything else is
    /// parenthesized
    fn atom(&self, out: &mut dyn fmt::Write, term: &Term) -> fmt::Result {
        with_stack(|| self.atom_impl(out, term))
    }

    fn atom_impl(&self, out: &mut dyn fmt::Write, term: &Term) -> fmt::Result {
        match term {
            Term::True => write!(out, "true"),
            Term::False => write!(out, "false"),
            Term::Unit => write!(out, "unit"),
            Term::Zero => write!(out, "0"),
            Term::Var(index) => self.var(out, *index),
            Term::FreeIdent(name) => write!(out, "{}", name),
            Term::Abs(_, _, _) => self.term(out, term),
            Term::App(func, arg) => {
                write!(out, "(")?;
                self.atom(out, func)?;
                write!(out, " ")?;
                self.atom(out, arg)?;
                write!(out, ")")
            }
            Term::Record(fields) => {
                write!(out, "{{")?;
                for (i, (label, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    if let Some(label) = label {
                        write!(out, "{}=", label)?;
                    }
                    self.term(out, t)?;
                }
                write!(out, "}}")
            }
            Term::Proj(t, label) => {
                self.atom(out, t)?;
                write!(out, ".{}", label)
            }
            _ => {
                write!(out, "(")?;
                self.term(out, term)?;
                write!(out, ")")
            }
        }
    }

    fn ty(&self, out: &mut dyn fmt::Write, ty: &Type) -> fmt::Result {
        match ty {
            Type::Bool => write!(out, "Bool"),
            Type::Nat => write!(out, "Nat"),
            Type::Unit => write!(out, "Unit"),
            Type::Named(name) => write!(out, "{}", name),
            Type::Var(index) => self.var(out, *index),
            Type::Arr(from, to) => {
                if let Type::Arr(_, _) = from.as_ref() {
                    write!(out, "(")?;
                    self.ty(out, from)?;
                    write!(out, ")")?;
                } else {
                    self.ty(out, from)?;
                }
                write!(out, "->")?;
                self.ty(out, to)
            }
            Type::Record(fields) => {
                write!(out, "{{")?;
                for (i, (label, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    if let Some(label) = label {
                        write!(out, "{}:", label)?;
                    }
                    self.ty(out, field)?;
                }
                write!(out, "}}")
            }
            Type::Variant(fields) => {
                write!(out, "<")?;
                for (i, (label, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    write!(out, "{}:", label)?;
                    self.ty(out, field)?;
                }
                write!(out, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assoclist::AssocList;
    use crate::syntax::numeral;

    fn abs(name: &str, ty: Type, body: Term) -> Term {
        Term::Abs(name.into(), ty, Box::new(body))
    }

    #[test]
    fn nested_binders_get_distinct_names() {
        let t = abs("x", Type::Bool, abs("x", Type::Bool, Term::Var(0)));
        let ctx = Context::empty();
        assert_eq!(
            render(&t, &ctx, RenderMode::Named),
            "(λx:Bool. (λx':Bool. x'))"
        );
        assert_eq!(render(&t, &ctx, RenderMode::DeBruijn), "(λ:Bool. (λ:Bool. 0))");
    }

    #[test]
    fn binder_avoids_context_names() {
        let ctx = Context::empty().add_name("x".into());
        let t = abs("x", Type::Nat, Term::App(
            Box::new(Term::Var(1)),
            Box::new(Term::Var(0)),
        ));
        assert_eq!(render(&t, &ctx, RenderMode::Named), "(λx':Nat. (x x'))");
        assert_eq!(t.to_string(), "(λ:Nat. (1 0))");
    }

    #[test]
    fn bad_index() {
        assert_eq!(
            render(&Term::Var(3), &Context::empty(), RenderMode::Named),
            "[bad index 3 in context of length 0]"
        );
    }

    #[test]
    fn operands_are_parenthesized() {
        assert_eq!(numeral(2).to_string(), "succ (succ 0)");
        let t = Term::App(Box::new(Term::Var(0)), Box::new(numeral(1)));
        assert_eq!(t.to_string(), "(0 (succ 0))");
        let record = Term::Record(AssocList::from_vec(vec![
            (Some("a".to_string()), Term::Zero),
            (None, Term::True),
        ]));
        assert_eq!(record.to_string(), "{a=0, true}");
        let proj = Term::Proj(Box::new(record), "a".into());
        assert_eq!(proj.to_string(), "{a=0, true}.a");
    }

    #[test]
    fn types() {
        let ty = Type::arr(Type::arr(Type::Nat, Type::Nat), Type::Nat);
        assert_eq!(ty.to_string(), "(Nat->Nat)->Nat");
        let ty = Type::Variant(AssocList::from_vec(vec![
            ("a".to_string(), Type::Nat),
            ("b".to_string(), Type::Record(AssocList::from_vec(vec![
                (None, Type::Bool),
                (Some("u".to_string()), Type::Unit),
            ]))),
        ]));
        assert_eq!(ty.to_string(), "<a:Nat, b:{Bool, u:Unit}>");
        let ctx = Context::empty().add_binding("X".into(), crate::context::Binding::TyVar);
        assert_eq!(render_type(&Type::Var(0), &ctx, RenderMode::Named), "X");
        assert_eq!(render_type(&Type::Var(0), &ctx, RenderMode::DeBruijn), "0");
    }

    #[test]
    fn case_branches() {
        let branches = AssocList::from_vec(vec![
            ("a".to_string(), ("n".to_string(), Term::Succ(Box::new(Term::Var(0))))),
            ("b".to_string(), ("n".to_string(), Term::Zero)),
        ]);
        let t = Term::Case(Box::new(Term::Var(0)), branches);
        let ctx = Context::empty().add_name("v".into());
        assert_eq!(
            render(&t, &ctx, RenderMode::Named),
            "case v of <a=n> ==> (succ n) | <b=n> ==> 0"
        );
        assert_eq!(t.to_string(), "case 0 of <a=_> ==> (succ 0) | <b=_> ==> 0");
    }

    #[test]
    fn index_form_drops_let_names() {
        let t = Term::Let(
            "x".into(),
            Box::new(Term::Zero),
            Box::new(Term::IsZero(Box::new(Term::Var(0)))),
        );
        assert_eq!(t.to_string(), "let _ = 0 in iszero 0");
        assert_eq!(
            render(&t, &Context::empty(), RenderMode::Named),
            "let x = 0 in iszero x"
        );
    }
}
