use crate::context::{Binding, Context};
use crate::syntax::Type;

/// Unfold type abbreviations at the head of `ty`. Abbreviations can only
/// refer to earlier bindings, so the chain always ends.
pub fn simplify(ty: &Type, ctx: &Context) -> Type {
    let mut current = ty.clone();
    while let Type::Var(index) = current {
        match ctx.get_binding(index) {
            Some(Binding::TyAbbrev(ty)) => current = ty,
            _ => break,
        }
    }
    current
}

/// Structural equality up to abbreviations. Record fields are matched by
/// label in any order, variant fields must agree position by position.
pub fn type_equals(left: &Type, right: &Type, ctx: &Context) -> bool {
    match (simplify(left, ctx), simplify(right, ctx)) {
        (Type::Bool, Type::Bool)
        | (Type::Nat, Type::Nat)
        | (Type::Unit, Type::Unit) => true,
        (Type::Arr(from1, to1), Type::Arr(from2, to2)) => {
            type_equals(&from1, &from2, ctx) && type_equals(&to1, &to2, ctx)
        }
        (Type::Record(fields1), Type::Record(fields2)) => {
            fields1.len() == fields2.len()
                && fields1.labels().all(|(label, ty1)| {
                    fields2
                        .lookup_label(&label)
                        .map_or(false, |ty2| type_equals(ty1, ty2, ctx))
                })
        }
        (Type::Variant(fields1), Type::Variant(fields2)) => {
            fields1.len() == fields2.len()
                && fields1.iter().zip(fields2.iter()).all(
                    |((label1, ty1), (label2, ty2))| {
                        label1 == label2 && type_equals(ty1, ty2, ctx)
                    },
                )
        }
        (Type::Var(i), Type::Var(j)) => i == j,
        (Type::Named(x), Type::Named(y)) => x == y,
        _ => false,
    }
}
