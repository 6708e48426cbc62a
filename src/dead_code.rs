use std::{collections::HashSet, fmt};
use crate::{
    ast::{File, Pos},
    binding::{Binding, BindingKind},
    package::Package,
    report::Reporter,
    visitor,
};

/// A declaration nothing refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadCode {
    pub name: String,
    pub kind: BindingKind,
    pub pos: Pos,
}

impl From<Binding> for DeadCode {
    fn from(binding: Binding) -> Self {
        DeadCode {
            name: binding.name,
            kind: binding.kind,
            pos: binding.pos,
        }
    }
}

impl fmt::Display for DeadCode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "unused {} {}", self.kind, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// package name of executables
    pub entry_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            entry_name: "main".to_string(),
        }
    }
}

impl Settings {
    pub fn is_entry(&self, package: &Package) -> bool {
        package.name == self.entry_name
    }

    /// Find unused declarations in all files of `package`
    pub fn find_dead_code(&self, package: &Package) -> Vec<DeadCode> {
        tracing::debug!(package = %package.name, files = package.files.len(), "scanning package");
        scan(package.files.iter().map(|file| &file.syntax), self.is_entry(package))
    }
}

/// Walk each file in its own top-level scope, then drop results that
/// another file, or a later part of the same file, referred to.
///
/// References to package-level names declared further down or in a
/// sibling file can't resolve during the forward walk. They are collected
/// per file and cancel any unused report of the same name.
pub fn scan<'f>(files: impl IntoIterator<Item = &'f File>, entry: bool) -> Vec<DeadCode> {
    let mut reporter = Reporter::default();
    let mut unresolved = HashSet::new();
    for file in files {
        let outcome = visitor::walk_file(file, entry);
        unresolved.extend(outcome.unresolved);
        reporter.extend(outcome.dead);
    }

    reporter.retain(|dead| {
        let referenced = unresolved.contains(&dead.name);
        if referenced {
            tracing::trace!(name = %dead.name, "referenced from elsewhere in the package");
        }
        !referenced
    });
    reporter.into_sorted()
}
