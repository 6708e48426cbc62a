use crate::{
    ast::*,
    binding::BindingKind,
};
use super::FileWalk;

/// Walks `const`, `var` and `type` declaration groups
pub struct DeclarationVisitor<'w> {
    walk: &'w mut FileWalk,
}

impl<'w> DeclarationVisitor<'w> {
    pub fn new(walk: &'w mut FileWalk) -> Self {
        DeclarationVisitor { walk }
    }

    pub fn visit_gen_decl(&mut self, decl: &GenDecl) {
        for spec in &decl.specs {
            match spec {
                Spec::Value(spec) =>
                    self.visit_value_spec(spec, decl.kind.into()),
                Spec::Type(spec) =>
                    self.walk.types().visit_type_spec(spec),
            }
        }
    }

    /// The names come into scope before their initializers are read, so
    /// `var x = x` refers to itself.
    pub fn visit_value_spec(&mut self, spec: &ValueSpec, kind: BindingKind) {
        for name in &spec.names {
            self.walk.declare(name, kind);
        }
        // initializers, calls included, are ordinary expressions
        for value in &spec.values {
            self.walk.statements().visit_expr(value);
        }
        if let Some(ty) = &spec.ty {
            self.visit_spec_type(ty);
        }
    }

    fn visit_spec_type(&mut self, ty: &Expr) {
        match ty {
            Expr::Ident(ident) =>
                self.walk.reference(ident),
            Expr::StructType(fields) => {
                for field in fields {
                    self.walk.types().visit_type(&field.ty);
                }
            }
            Expr::ArrayType { len, elt } => {
                if let Some(len) = len {
                    self.walk.statements().visit_expr(len);
                }
                self.walk.types().visit_type(elt);
            }
            _ =>
                self.walk.types().visit_type(ty),
        }
    }
}
