use crate::{
    ast::*,
    binding::BindingKind,
};
use super::FileWalk;

/// Walks type expressions, where identifiers name types
///
/// Field, parameter and method names are never declarations here.
pub struct TypeVisitor<'w> {
    walk: &'w mut FileWalk,
}

impl<'w> TypeVisitor<'w> {
    pub fn new(walk: &'w mut FileWalk) -> Self {
        TypeVisitor { walk }
    }

    /// The name is in scope before its definition is read, so recursive
    /// types see themselves.
    pub fn visit_type_spec(&mut self, spec: &TypeSpec) {
        self.walk.declare(&spec.name, BindingKind::Type);
        self.visit_fields(&spec.type_params);
        self.visit_type(&spec.ty);
    }

    pub fn visit_func_type(&mut self, ty: &FuncType) {
        self.visit_fields(&ty.type_params);
        self.visit_fields(&ty.params);
        self.visit_fields(&ty.results);
    }

    fn visit_fields(&mut self, fields: &[Field]) {
        for field in fields {
            self.visit_type(&field.ty);
        }
    }

    pub fn visit_type(&mut self, ty: &Expr) {
        match ty {
            Expr::Ident(ident) =>
                self.walk.reference(ident),

            // `pkg.T`
            Expr::Selector { x, sel } => {
                self.visit_type(x);
                self.walk.reference(sel);
            }

            Expr::StructType(fields) | Expr::InterfaceType(fields) =>
                self.visit_fields(fields),

            Expr::FuncType(func) =>
                self.visit_func_type(func),

            Expr::ChanType(elem) | Expr::Star(elem) | Expr::Paren(elem)
            | Expr::Unary(elem) | Expr::Ellipsis(Some(elem)) =>
                self.visit_type(elem),

            Expr::ArrayType { len, elt } => {
                if let Some(len) = len {
                    self.walk.statements().visit_expr(len);
                }
                self.visit_type(elt);
            }

            Expr::MapType { key, value } => {
                self.visit_type(key);
                self.visit_type(value);
            }

            // constraint unions
            Expr::Binary(lhs, rhs) => {
                self.visit_type(lhs);
                self.visit_type(rhs);
            }

            // generic instantiation
            Expr::Index { x, indices } => {
                self.visit_type(x);
                for index in indices {
                    self.visit_type(index);
                }
            }

            Expr::Ellipsis(None) | Expr::BasicLit(_) | Expr::Bad(_) => {}

            Expr::Call { .. } | Expr::CompositeLit { .. } | Expr::KeyValue { .. }
            | Expr::FuncLit { .. } | Expr::Slice { .. } | Expr::TypeAssert { .. } =>
                self.walk.statements().visit_expr(ty),
        }
    }
}
