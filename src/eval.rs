use crate::context::{Binding, Context};
use crate::errors::EvalError;
use crate::syntax::Term::*;
use crate::syntax::{substitute_top, with_stack, Term};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EvalMode {
    SmallStep,
    BigStep,
}

/// Evaluate a type checked term to its normal form. Programs that recurse
/// forever through `fix` do not return.
pub fn evaluate(term: &Term, ctx: &Context, mode: EvalMode) -> Term {
    match mode {
        EvalMode::SmallStep => normalize(term, ctx),
        EvalMode::BigStep => eval_big(term, ctx),
    }
}

/// call eval step on a term until it is stuck
pub fn normalize(term: &Term, ctx: &Context) -> Term {
    let mut current = term.clone();
    while let Ok(next) = eval_step(&current, ctx) {
        current = next;
    }
    current
}

/// Like `normalize`, but gives up after `max_steps` steps and returns the
/// term reached so far
pub fn normalize_bounded(term: &Term, ctx: &Context, max_steps: usize) -> Term {
    let mut current = term.clone();
    for _ in 0..max_steps {
        match eval_step(&current, ctx) {
            Ok(next) => current = next,
            Err(EvalError::NoRuleApplies) => break,
        }
    }
    current
}

fn step_box(term: &Term, ctx: &Context) -> Result<Box<Term>, EvalError> {
    eval_step(term, ctx).map(Box::new)
}

/// One call-by-value reduction. Fails with `NoRuleApplies` exactly when the
/// term is a normal form.
pub fn eval_step(term: &Term, ctx: &Context) -> Result<Term, EvalError> {
    with_stack(|| step(term, ctx))
}

fn step(term: &Term, ctx: &Context) -> Result<Term, EvalError> {
    match term {
        If(cond, t1, t2) => match cond.as_ref() {
            True => Ok((**t1).clone()),
            False => Ok((**t2).clone()),
            _ => Ok(If(step_box(cond, ctx)?, t1.clone(), t2.clone())),
        },
        Var(index) => match ctx.get_binding(*index) {
            Some(Binding::TmAbbrev(t, _)) => Ok(t),
            _ => Err(EvalError::NoRuleApplies),
        },
        App(func, arg) => match func.as_ref() {
            Abs(_, _, body) if arg.is_val() => Ok(substitute_top(arg, body)),
            _ if func.is_val() => Ok(App(func.clone(), step_box(arg, ctx)?)),
            _ => Ok(App(step_box(func, ctx)?, arg.clone())),
        },
        Let(x, bound, body) => {
            if bound.is_val() {
                Ok(substitute_top(bound, body))
            } else {
                Ok(Let(x.clone(), step_box(bound, ctx)?, body.clone()))
            }
        }
        Ascribe(t, ty) => {
            if t.is_val() {
                Ok((**t).clone())
            } else {
                Ok(Ascribe(step_box(t, ctx)?, ty.clone()))
            }
        }
        Record(fields) => {
            // only the leftmost unevaluated field moves
            let index = fields
                .iter()
                .position(|(_, t)| !t.is_val())
                .ok_or(EvalError::NoRuleApplies)?;
            let next = eval_step(&fields.inner[index].1, ctx)?;
            Ok(Record(fields.with_value_at(index, next)))
        }
        Proj(t, label) => match t.as_ref() {
            Record(fields) if t.is_val() => fields
                .lookup_label(label)
                .cloned()
                .ok_or(EvalError::NoRuleApplies),
            _ => Ok(Proj(step_box(t, ctx)?, label.clone())),
        },
        Tag(label, t, ty) => Ok(Tag(label.clone(), step_box(t, ctx)?, ty.clone())),
        Case(t, branches) => match t.as_ref() {
            Tag(label, payload, _) if payload.is_val() => {
                let (_, body) =
                    branches.lookup(label).ok_or(EvalError::NoRuleApplies)?;
                Ok(substitute_top(payload, body))
            }
            _ => Ok(Case(step_box(t, ctx)?, branches.clone())),
        },
        Fix(t) => match t.as_ref() {
            Abs(_, _, body) => Ok(substitute_top(term, body)),
            _ if t.is_val() => Err(EvalError::NoRuleApplies),
            _ => Ok(Fix(step_box(t, ctx)?)),
        },
        Succ(t) => Ok(Succ(step_box(t, ctx)?)),
        Pred(t) => match t.as_ref() {
            Zero => Ok(Zero),
            Succ(nv) if nv.is_numeric_val() => Ok((**nv).clone()),
            _ => Ok(Pred(step_box(t, ctx)?)),
        },
        IsZero(t) => match t.as_ref() {
            Zero => Ok(True),
            Succ(nv) if nv.is_numeric_val() => Ok(False),
            _ => Ok(IsZero(step_box(t, ctx)?)),
        },
        True | False | Unit | Zero | Abs(_, _, _) | FreeIdent(_) => {
            Err(EvalError::NoRuleApplies)
        }
    }
}

/// Big-step evaluation. Subterms are evaluated in the same order as
/// `eval_step` would reduce them, so a term that gets stuck comes back in
/// the same partially evaluated shape `normalize` produces.
pub fn eval_big(term: &Term, ctx: &Context) -> Term {
    with_stack(|| big_step(term, ctx))
}

fn big_step(term: &Term, ctx: &Context) -> Term {
    match term {
        True | False | Unit | Zero | Abs(_, _, _) | FreeIdent(_) => term.clone(),
        Var(index) => match ctx.get_binding(*index) {
            Some(Binding::TmAbbrev(t, _)) => eval_big(&t, ctx),
            _ => term.clone(),
        },
        If(cond, t1, t2) => match eval_big(cond, ctx) {
            True => eval_big(t1, ctx),
            False => eval_big(t2, ctx),
            cond => If(Box::new(cond), t1.clone(), t2.clone()),
        },
        App(func, arg) => {
            let func = eval_big(func, ctx);
            if !func.is_val() {
                return App(Box::new(func), arg.clone());
            }
            let arg = eval_big(arg, ctx);
            match &func {
                Abs(_, _, body) if arg.is_val() => {
                    eval_big(&substitute_top(&arg, body), ctx)
                }
                _ => App(Box::new(func), Box::new(arg)),
            }
        }
        Let(x, bound, body) => {
            let bound = eval_big(bound, ctx);
            if bound.is_val() {
                eval_big(&substitute_top(&bound, body), ctx)
            } else {
                Let(x.clone(), Box::new(bound), body.clone())
            }
        }
        Ascribe(t, ty) => {
            let t = eval_big(t, ctx);
            if t.is_val() {
                t
            } else {
                Ascribe(Box::new(t), ty.clone())
            }
        }
        Record(fields) => {
            let mut fields = fields.clone();
            for index in 0..fields.len() {
                let value = eval_big(&fields.inner[index].1, ctx);
                let stuck = !value.is_val();
                fields.inner[index].1 = value;
                if stuck {
                    break;
                }
            }
            Record(fields)
        }
        Proj(t, label) => {
            let t = eval_big(t, ctx);
            if let Record(fields) = &t {
                if t.is_val() {
                    if let Some(field) = fields.lookup_label(label) {
                        return field.clone();
                    }
                }
            }
            Proj(Box::new(t), label.clone())
        }
        Tag(label, t, ty) => {
            Tag(label.clone(), Box::new(eval_big(t, ctx)), ty.clone())
        }
        Case(t, branches) => {
            let t = eval_big(t, ctx);
            if let Tag(label, payload, _) = &t {
                if payload.is_val() {
                    if let Some((_, body)) = branches.lookup(label) {
                        return eval_big(&substitute_top(payload, body), ctx);
                    }
                }
            }
            Case(Box::new(t), branches.clone())
        }
        Fix(t) => {
            let t = eval_big(t, ctx);
            match &t {
                Abs(_, _, body) => {
                    let unrolled = substitute_top(&Fix(Box::new(t.clone())), body);
                    eval_big(&unrolled, ctx)
                }
                _ => Fix(Box::new(t)),
            }
        }
        Succ(t) => Succ(Box::new(eval_big(t, ctx))),
        Pred(t) => match eval_big(t, ctx) {
            Zero => Zero,
            Succ(ref nv) if nv.is_numeric_val() => (**nv).clone(),
            t => Pred(Box::new(t)),
        },
        IsZero(t) => match eval_big(t, ctx) {
            Zero => True,
            Succ(ref nv) if nv.is_numeric_val() => False,
            t => IsZero(Box::new(t)),
        },
    }
}
