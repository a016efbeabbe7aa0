use crate::context::{Binding, Context};
use crate::errors::ResolveError;
use crate::syntax::{with_stack, Command, Term, Type};

/// Replace source names by De Bruijn indices relative to a context
pub trait Resolvable: Sized {
    fn resolve(&self, ctx: &Context) -> Result<Self, ResolveError>;
}

impl Resolvable for Type {
    fn resolve(&self, ctx: &Context) -> Result<Type, ResolveError> {
        match self {
            Type::Named(name) => ctx
                .type_index(name)
                .map(Type::Var)
                .ok_or_else(|| ResolveError::UnboundTypeIdentifier(name.clone())),
            Type::Bool | Type::Unit | Type::Nat | Type::Var(_) => Ok(self.clone()),
            Type::Arr(from, to) => Ok(Type::arr(from.resolve(ctx)?, to.resolve(ctx)?)),
            Type::Record(fields) => {
                Ok(Type::Record(fields.try_map_val(|ty| ty.resolve(ctx))?))
            }
            Type::Variant(fields) => {
                Ok(Type::Variant(fields.try_map_val(|ty| ty.resolve(ctx))?))
            }
        }
    }
}

fn resolve_box(t: &Term, ctx: &Context) -> Result<Box<Term>, ResolveError> {
    t.resolve(ctx).map(Box::new)
}

impl Resolvable for Term {
    fn resolve(&self, ctx: &Context) -> Result<Term, ResolveError> {
        with_stack(|| resolve_term(self, ctx))
    }
}

fn resolve_term(term: &Term, ctx: &Context) -> Result<Term, ResolveError> {
    use crate::syntax::Term::*;
    Ok(match term {
        FreeIdent(name) => ctx
            .term_index(name)
            .map(Var)
            .ok_or_else(|| ResolveError::UnboundIdentifier(name.clone()))?,
        True | False | Unit | Zero | Var(_) => term.clone(),
        If(cond, t1, t2) => If(
            resolve_box(cond, ctx)?,
            resolve_box(t1, ctx)?,
            resolve_box(t2, ctx)?,
        ),
        Abs(param, ty, body) => Abs(
            param.clone(),
            ty.resolve(ctx)?,
            resolve_box(body, &ctx.add_name(param.clone()))?,
        ),
        App(func, arg) => App(resolve_box(func, ctx)?, resolve_box(arg, ctx)?),
        Ascribe(t, ty) => Ascribe(resolve_box(t, ctx)?, ty.resolve(ctx)?),
        Tag(label, t, ty) => {
            Tag(label.clone(), resolve_box(t, ctx)?, ty.resolve(ctx)?)
        }
        Case(t, branches) => Case(
            resolve_box(t, ctx)?,
            branches.try_map_val(|(x, body)| {
                let body = body.resolve(&ctx.add_name(x.clone()))?;
                Ok::<_, ResolveError>((x.clone(), body))
            })?,
        ),
        Let(x, bound, body) => Let(
            x.clone(),
            resolve_box(bound, ctx)?,
            resolve_box(body, &ctx.add_name(x.clone()))?,
        ),
        Record(fields) => Record(fields.try_map_val(|t| t.resolve(ctx))?),
        Proj(t, label) => Proj(resolve_box(t, ctx)?, label.clone()),
        Fix(t) => Fix(resolve_box(t, ctx)?),
        Succ(t) => Succ(resolve_box(t, ctx)?),
        Pred(t) => Pred(resolve_box(t, ctx)?),
        IsZero(t) => IsZero(resolve_box(t, ctx)?),
    })
}

impl Resolvable for Binding {
    fn resolve(&self, ctx: &Context) -> Result<Binding, ResolveError> {
        Ok(match self {
            Binding::Name | Binding::TyVar => self.clone(),
            Binding::Var(ty) => Binding::Var(ty.resolve(ctx)?),
            Binding::TyAbbrev(ty) => Binding::TyAbbrev(ty.resolve(ctx)?),
            Binding::TmAbbrev(t, ty) => Binding::TmAbbrev(
                t.resolve(ctx)?,
                ty.as_ref().map(|ty| ty.resolve(ctx)).transpose()?,
            ),
        })
    }
}

/// Resolve one top-level command. A binding command also yields the context
/// extended with the new entry, visible to every later command.
pub fn resolve_command(
    cmd: &Command,
    ctx: &Context,
) -> Result<(Context, Command), ResolveError> {
    match cmd {
        Command::Eval(t) => Ok((ctx.clone(), Command::Eval(t.resolve(ctx)?))),
        Command::Bind(name, binding) => {
            let binding = binding.resolve(ctx)?;
            Ok((
                ctx.add_binding(name.clone(), binding.clone()),
                Command::Bind(name.clone(), binding),
            ))
        }
    }
}
