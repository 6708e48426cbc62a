use std::collections::{hash_map::Entry, HashMap};
use crate::binding::Binding;

/// Declarations of one lexical block: a file, function body, block, or case clause
#[derive(Debug, Default)]
pub struct Scope {
    bindings: HashMap<String, Binding>,
}

impl Scope {
    /// Insert `binding`, keeping a previous declaration's used flag
    pub fn declare(&mut self, binding: Binding) {
        match self.bindings.entry(binding.name.clone()) {
            Entry::Occupied(mut entry) => {
                let was_used = entry.get().is_used();
                let mut binding = binding;
                if was_used {
                    binding.mark_used();
                }
                entry.insert(binding);
            }
            Entry::Vacant(entry) => {
                entry.insert(binding);
            }
        }
    }

    pub fn mark(&mut self, name: &str) -> bool {
        match self.bindings.get_mut(name) {
            Some(binding) => {
                binding.mark_used();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// The Bindings that nothing referenced
    pub fn into_unused(self) -> impl Iterator<Item = Binding> {
        self.bindings.into_values()
            .filter(|binding| !binding.is_used())
    }
}

/// Open scopes, innermost last
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Close the innermost scope, returning what was never used in it
    pub fn pop(&mut self) -> Vec<Binding> {
        self.scopes.pop()
            .map(|scope| scope.into_unused().collect())
            .unwrap_or_default()
    }

    /// Declare in the innermost scope. The blank identifier is never tracked.
    pub fn declare(&mut self, binding: Binding) {
        if binding.name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.declare(binding);
        }
    }

    /// Mark the innermost declaration of `name` as used
    ///
    /// Returns `false` if no open scope declares it.
    pub fn mark(&mut self, name: &str) -> bool {
        if name == "_" {
            return true;
        }
        self.scopes.iter_mut()
            .rev()
            .any(|scope| scope.mark(name))
    }

    /// Is the package/file top level the current scope
    pub fn is_root(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> Option<&Scope> {
        self.scopes.last()
    }
}
