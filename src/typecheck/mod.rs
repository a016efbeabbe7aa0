pub mod equiv;

pub use self::equiv::{simplify, type_equals};

use crate::assoclist::AssocList;
use crate::context::{Binding, Context};
use crate::errors::TypeError;
use crate::syntax::{render_type, with_stack, Branches, RenderMode, Shift, Term, Type};

fn show(ty: &Type, ctx: &Context) -> String {
    render_type(ty, ctx, RenderMode::Named)
}

fn mismatch(expected: &Type, found: &Type, ctx: &Context) -> TypeError {
    TypeError::TypeMismatch {
        expected: show(expected, ctx),
        found: show(found, ctx),
    }
}

/// Check that `term` has a type equal to `expected`
fn expect(term: &Term, expected: &Type, ctx: &Context) -> Result<(), TypeError> {
    let found = type_of(term, ctx)?;
    if type_equals(&found, expected, ctx) {
        Ok(())
    } else {
        Err(mismatch(expected, &found, ctx))
    }
}

/// Type of a resolved term under `ctx`. The result may mention abbreviations;
/// compare types with `type_equals` rather than `==`.
pub fn type_of(term: &Term, ctx: &Context) -> Result<Type, TypeError> {
    with_stack(|| type_of_impl(term, ctx))
}

fn type_of_impl(term: &Term, ctx: &Context) -> Result<Type, TypeError> {
    match term {
        Term::True | Term::False => Ok(Type::Bool),
        Term::Unit => Ok(Type::Unit),
        Term::Zero => Ok(Type::Nat),
        Term::Succ(t) | Term::Pred(t) => {
            expect(t, &Type::Nat, ctx)?;
            Ok(Type::Nat)
        }
        Term::IsZero(t) => {
            expect(t, &Type::Nat, ctx)?;
            Ok(Type::Bool)
        }
        Term::If(cond, t1, t2) => {
            expect(cond, &Type::Bool, ctx)?;
            let ty = type_of(t1, ctx)?;
            expect(t2, &ty, ctx)?;
            Ok(ty)
        }
        Term::Var(index) => match ctx.get_binding(*index) {
            Some(Binding::Var(ty)) | Some(Binding::TmAbbrev(_, Some(ty))) => Ok(ty),
            Some(Binding::TmAbbrev(t, None)) => type_of(&t, ctx),
            Some(_) => Err(TypeError::WrongBinding(
                ctx.name_of(*index).unwrap_or_default().to_string(),
            )),
            None => Err(TypeError::UnboundIdentifier(index.to_string())),
        },
        Term::FreeIdent(name) => Err(TypeError::UnboundIdentifier(name.clone())),
        Term::Abs(param, ty, body) => {
            let inner = ctx.add_binding(param.clone(), Binding::Var(ty.clone()));
            let body_ty = type_of(body, &inner)?;
            Ok(Type::arr(ty.clone(), body_ty.shift(-1)))
        }
        Term::App(func, arg) => {
            let func_ty = type_of(func, ctx)?;
            match simplify(&func_ty, ctx) {
                Type::Arr(from, to) => {
                    expect(arg, &from, ctx)?;
                    Ok(*to)
                }
                other => Err(TypeError::NonFunctionApplied(show(&other, ctx))),
            }
        }
        Term::Ascribe(t, ty) => {
            expect(t, ty, ctx)?;
            Ok(ty.clone())
        }
        Term::Let(x, bound, body) => {
            let bound_ty = type_of(bound, ctx)?;
            let inner = ctx.add_binding(x.clone(), Binding::Var(bound_ty));
            Ok(type_of(body, &inner)?.shift(-1))
        }
        Term::Record(fields) => Ok(Type::Record(
            fields.try_map_val(|t| type_of(t, ctx))?,
        )),
        Term::Proj(t, label) => {
            let record_ty = type_of(t, ctx)?;
            match simplify(&record_ty, ctx) {
                Type::Record(fields) => fields
                    .lookup_label(label)
                    .cloned()
                    .ok_or_else(|| TypeError::LabelNotFound(label.clone())),
                other => Err(TypeError::NonRecordProjected(show(&other, ctx))),
            }
        }
        Term::Tag(label, t, ty) => match simplify(ty, ctx) {
            Type::Variant(fields) => {
                let field_ty = fields
                    .lookup(label)
                    .ok_or_else(|| TypeError::LabelNotFound(label.clone()))?;
                expect(t, field_ty, ctx)?;
                Ok(ty.clone())
            }
            other => Err(TypeError::NonVariantAnnotation(show(&other, ctx))),
        },
        Term::Case(scrutinee, branches) => type_of_case(scrutinee, branches, ctx),
        Term::Fix(t) => {
            let func_ty = type_of(t, ctx)?;
            match simplify(&func_ty, ctx) {
                Type::Arr(from, to) => {
                    if type_equals(&from, &to, ctx) {
                        Ok(*to)
                    } else {
                        Err(mismatch(&from, &to, ctx))
                    }
                }
                other => Err(TypeError::NonFunctionApplied(show(&other, ctx))),
            }
        }
    }
}

/// Branches must cover the variant exactly, and all bodies must agree on
/// their type
fn type_of_case(
    scrutinee: &Term,
    branches: &Branches,
    ctx: &Context,
) -> Result<Type, TypeError> {
    let scrutinee_ty = type_of(scrutinee, ctx)?;
    let fields: AssocList<String, Type> = match simplify(&scrutinee_ty, ctx) {
        Type::Variant(fields) => fields,
        other => return Err(TypeError::NonVariantCased(show(&other, ctx))),
    };
    if let Some(extra) = branches.keys().find(|label| !fields.contains_key(label)) {
        return Err(TypeError::LabelNotFound(extra.clone()));
    }
    if let Some(missing) = fields.keys().find(|label| !branches.contains_key(label)) {
        return Err(TypeError::MissingBranch(missing.clone()));
    }

    let mut result: Option<Type> = None;
    for (label, (x, body)) in branches.iter() {
        let field_ty = fields
            .lookup(label)
            .ok_or_else(|| TypeError::LabelNotFound(label.clone()))?;
        let inner = ctx.add_binding(x.clone(), Binding::Var(field_ty.clone()));
        let body_ty = type_of(body, &inner)?.shift(-1);
        match &result {
            Some(expected) if !type_equals(&body_ty, expected, ctx) => {
                return Err(mismatch(expected, &body_ty, ctx));
            }
            Some(_) => (),
            None => result = Some(body_ty),
        }
    }
    result.ok_or(TypeError::EmptyCase)
}
