use std::fmt;
use crate::ast::{GenKind, Ident, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json-out", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum BindingKind {
    Const,
    Var,
    Type,
    Func,
}

impl From<GenKind> for BindingKind {
    fn from(kind: GenKind) -> Self {
        match kind {
            GenKind::Const => BindingKind::Const,
            GenKind::Var => BindingKind::Var,
            GenKind::Type => BindingKind::Type,
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BindingKind::Const => write!(fmt, "const"),
            BindingKind::Var => write!(fmt, "var"),
            BindingKind::Type => write!(fmt, "type"),
            BindingKind::Func => write!(fmt, "func"),
        }
    }
}

/// A name declared in one scope
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub pos: Pos,
    pub kind: BindingKind,
    used: bool,
}

impl Binding {
    pub fn new(name: &Ident, kind: BindingKind, used: bool) -> Self {
        Binding {
            name: name.name.clone(),
            pos: name.pos,
            kind,
            used,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    /// there is no way back
    pub fn mark_used(&mut self) {
        self.used = true;
    }
}
