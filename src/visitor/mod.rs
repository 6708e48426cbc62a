//! Single forward walk over one file
//!
//! Three visitors share one [`FileWalk`]: [`StatementVisitor`] for
//! statements and expressions, [`DeclarationVisitor`] for `const`, `var`
//! and `type` groups, and [`TypeVisitor`] for positions where an identifier
//! names a type.

mod declaration;
mod statement;
mod types;

use std::collections::HashSet;
use crate::{
    ast::{File, Ident},
    binding::{Binding, BindingKind},
    dead_code::DeadCode,
    scope::ScopeStack,
    usage,
};
pub use declaration::DeclarationVisitor;
pub use statement::StatementVisitor;
pub use types::TypeVisitor;

/// What one file contributes to its package's result
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub dead: Vec<DeadCode>,
    /// names referenced that no open scope declared at the time
    pub unresolved: HashSet<String>,
}

/// Mutable state of one file's walk
#[derive(Debug)]
pub struct FileWalk {
    scopes: ScopeStack,
    entry: bool,
    outcome: FileOutcome,
}

impl FileWalk {
    pub fn new(entry: bool) -> Self {
        FileWalk {
            scopes: ScopeStack::default(),
            entry,
            outcome: FileOutcome::default(),
        }
    }

    /// Walk `file` inside one fresh top-level scope
    pub fn run(mut self, file: &File) -> FileOutcome {
        tracing::debug!(file = file.id.0, package = %file.package.name, "walking file");
        self.push_scope();
        self.statements().visit_file(file);
        self.pop_scope();
        self.outcome
    }

    pub fn statements(&mut self) -> StatementVisitor<'_> {
        StatementVisitor::new(self)
    }

    pub fn declarations(&mut self) -> DeclarationVisitor<'_> {
        DeclarationVisitor::new(self)
    }

    pub fn types(&mut self) -> TypeVisitor<'_> {
        TypeVisitor::new(self)
    }

    pub fn push_scope(&mut self) {
        self.scopes.push();
    }

    pub fn pop_scope(&mut self) {
        let unused = self.scopes.pop();
        self.outcome.dead.extend(unused.into_iter().map(DeadCode::from));
    }

    pub fn declare(&mut self, name: &Ident, kind: BindingKind) {
        let used = usage::initially_used(&name.name, self.scopes.is_root(), self.entry);
        tracing::trace!(name = %name.name, %kind, used, depth = self.scopes.depth(), "declare");
        self.scopes.declare(Binding::new(name, kind, used));
    }

    /// Mark `name` as used, or remember it for the package-wide pass
    pub fn reference(&mut self, name: &Ident) {
        if !self.scopes.mark(&name.name) {
            self.outcome.unresolved.insert(name.name.clone());
        }
    }
}

pub fn walk_file(file: &File, entry: bool) -> FileOutcome {
    FileWalk::new(entry).run(file)
}
