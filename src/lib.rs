//! Scan Go packages for dead code (declarations nothing refers to).

pub mod ast;
mod binding;
mod dead_code;
mod dead_code_tests;
mod error;
pub mod package;
pub mod report;
mod scope;
pub mod syntax;
mod usage;
pub mod visitor;

pub use binding::{Binding, BindingKind};
pub use dead_code::{scan, DeadCode, Settings};
pub use error::{Error, Result};
pub use package::{Package, SourceFile};
pub use scope::{Scope, ScopeStack};
pub use usage::{initially_used, is_exported};
