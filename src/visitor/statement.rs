use crate::{
    ast::*,
    binding::BindingKind,
};
use super::FileWalk;

/// Walks statements and expressions, marking every identifier it reads
pub struct StatementVisitor<'w> {
    walk: &'w mut FileWalk,
}

impl<'w> StatementVisitor<'w> {
    pub fn new(walk: &'w mut FileWalk) -> Self {
        StatementVisitor { walk }
    }

    /// top-level declarations in source order, in the scope the caller opened
    pub fn visit_file(&mut self, file: &File) {
        for decl in &file.decls {
            match decl {
                Decl::Func(func) => self.visit_func_decl(func),
                Decl::Gen(gen) => self.walk.declarations().visit_gen_decl(gen),
            }
        }
    }

    pub fn visit_func_decl(&mut self, func: &FuncDecl) {
        tracing::trace!(name = %func.name.name, method = func.recv.is_some(), "func");
        // methods are not tracked, but what they reference is
        if func.recv.is_none() {
            self.walk.declare(&func.name, BindingKind::Func);
        }
        self.walk.types().visit_func_type(&func.ty);
        if let Some(body) = &func.body {
            self.visit_block(body);
        }
    }

    pub fn visit_block(&mut self, block: &Block) {
        self.visit_scoped(&block.stmts);
    }

    /// statements of an explicit or implicit block
    fn visit_scoped(&mut self, stmts: &[Stmt]) {
        self.walk.push_scope();
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
        self.walk.pop_scope();
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(gen) =>
                self.walk.declarations().visit_gen_decl(gen),

            // assignment targets are neither declared nor read
            Stmt::Assign(rhs) =>
                self.visit_exprs(rhs),

            Stmt::Expr(expr) | Stmt::IncDec(expr) | Stmt::Go(expr) | Stmt::Defer(expr) =>
                self.visit_expr(expr),

            Stmt::Send { chan, value } => {
                self.visit_expr(chan);
                self.visit_expr(value);
            }

            Stmt::Block(block) =>
                self.visit_block(block),

            Stmt::If { init, cond, then, els } => {
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                self.visit_expr(cond);
                self.visit_block(then);
                if let Some(els) = els {
                    self.visit_stmt(els);
                }
            }

            Stmt::For { init, cond, post, body } => {
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                if let Some(post) = post {
                    self.visit_stmt(post);
                }
                self.visit_block(body);
            }

            Stmt::Range { expr, body } => {
                self.visit_expr(expr);
                self.visit_block(body);
            }

            Stmt::Switch { init, tag, clauses } => {
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(tag) = tag {
                    self.visit_expr(tag);
                }
                for clause in clauses {
                    self.visit_exprs(&clause.list);
                    self.visit_scoped(&clause.body);
                }
            }

            Stmt::TypeSwitch { init, expr, clauses } => {
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                self.visit_expr(expr);
                for clause in clauses {
                    for ty in &clause.list {
                        self.walk.types().visit_type(ty);
                    }
                    self.visit_scoped(&clause.body);
                }
            }

            Stmt::Select(clauses) => {
                for clause in clauses {
                    self.walk.push_scope();
                    if let Some(comm) = &clause.comm {
                        self.visit_stmt(comm);
                    }
                    for stmt in &clause.body {
                        self.visit_stmt(stmt);
                    }
                    self.walk.pop_scope();
                }
            }

            Stmt::Return(exprs) =>
                self.visit_exprs(exprs),

            Stmt::Labeled(stmt) => {
                if let Some(stmt) = stmt {
                    self.visit_stmt(stmt);
                }
            }

            Stmt::Branch | Stmt::Empty => {}
        }
    }

    fn visit_exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.visit_expr(expr);
        }
    }

    pub fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) =>
                self.walk.reference(ident),

            // a member name is a reference like any other identifier
            Expr::Selector { x, sel } => {
                self.visit_expr(x);
                self.walk.reference(sel);
            }

            Expr::Call { fun, args } => {
                self.visit_expr(fun);
                self.visit_exprs(args);
            }

            Expr::CompositeLit { ty, elts } => {
                match ty.as_deref() {
                    Some(Expr::Ident(ident)) => self.walk.reference(ident),
                    Some(ty) => self.walk.types().visit_type(ty),
                    None => {}
                }
                self.visit_exprs(elts);
            }

            // keys are never references
            Expr::KeyValue { value, .. } =>
                self.visit_expr(value),

            Expr::FuncLit { ty, body } => {
                self.walk.types().visit_func_type(ty);
                self.visit_block(body);
            }

            Expr::Unary(x) | Expr::Paren(x) | Expr::Star(x) | Expr::Ellipsis(Some(x)) =>
                self.visit_expr(x),

            Expr::Binary(lhs, rhs) => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }

            Expr::Index { x, indices } => {
                self.visit_expr(x);
                self.visit_exprs(indices);
            }

            Expr::Slice { x, bounds } => {
                self.visit_expr(x);
                self.visit_exprs(bounds);
            }

            Expr::TypeAssert { x, ty } => {
                self.visit_expr(x);
                if let Some(ty) = ty {
                    self.walk.types().visit_type(ty);
                }
            }

            Expr::ArrayType { .. } | Expr::MapType { .. } | Expr::ChanType(_)
            | Expr::FuncType(_) | Expr::StructType(_) | Expr::InterfaceType(_) =>
                self.walk.types().visit_type(expr),

            Expr::BasicLit(_) | Expr::Ellipsis(None) | Expr::Bad(_) => {}
        }
    }
}
