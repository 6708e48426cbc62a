//! Lowering of `tree-sitter-go` concrete syntax trees into [`crate::ast`]

use std::path::Path;
use rowan::TextSize;
use tree_sitter::{Node, Parser};
use crate::{
    ast::*,
    error::{Error, Result},
};

/// Parse one Go source file
///
/// Any syntax error in the file fails the whole file.
pub fn parse_file(id: FileId, path: &Path, source: &str) -> Result<File> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
    let tree = parser.parse(source, None)
        .ok_or_else(|| Error::Parse {
            path: path.to_owned(),
            line: 1,
            column: 1,
            message: "parser gave up".to_string(),
        })?;
    let root = tree.root_node();

    if let Some(node) = first_error(root) {
        let point = node.start_position();
        let message = if node.is_missing() {
            format!("expected {}", node.kind())
        } else {
            "syntax error".to_string()
        };
        return Err(Error::Parse {
            path: path.to_owned(),
            line: point.row as u32 + 1,
            column: point.column as u32 + 1,
            message,
        });
    }

    let lower = Lower { file: id, src: source };
    let package = named_children(root).into_iter()
        .find(|child| child.kind() == "package_clause")
        .and_then(|clause| named_children(clause).into_iter().next())
        .map(|name| lower.ident(name))
        .ok_or_else(|| Error::Parse {
            path: path.to_owned(),
            line: 1,
            column: 1,
            message: "expected package clause".to_string(),
        })?;

    let decls = named_children(root).into_iter()
        .filter_map(|child| lower.decl(child))
        .collect();
    Ok(File { id, package, decls })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node.children_by_field_name(field, &mut cursor)
        .filter(|child| child.is_named() && child.kind() != "comment")
        .collect();
    children
}

/// named children not attached to any grammar field
fn unfielded_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let mut children = Vec::new();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.is_named() && child.kind() != "comment" && cursor.field_name().is_none() {
                children.push(child);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    children
}

struct Lower<'s> {
    file: FileId,
    src: &'s str,
}

impl<'s> Lower<'s> {
    fn pos(&self, node: Node<'_>) -> Pos {
        let point = node.start_position();
        Pos {
            file: self.file,
            offset: TextSize::from(node.start_byte() as u32),
            len: TextSize::from((node.end_byte() - node.start_byte()) as u32),
            line: point.row as u32 + 1,
            column: point.column as u32 + 1,
        }
    }

    fn ident(&self, node: Node<'_>) -> Ident {
        Ident {
            name: self.src[node.byte_range()].to_string(),
            pos: self.pos(node),
        }
    }

    fn decl(&self, node: Node<'_>) -> Option<Decl> {
        match node.kind() {
            "function_declaration" | "method_declaration" =>
                Some(Decl::Func(self.func_decl(node))),
            "const_declaration" | "var_declaration" | "type_declaration" =>
                Some(Decl::Gen(self.gen_decl(node))),
            // package clause, imports, stray statements
            _ => None,
        }
    }

    fn func_decl(&self, node: Node<'_>) -> FuncDecl {
        let name = match node.child_by_field_name("name") {
            Some(name) => self.ident(name),
            None => Ident { name: "_".to_string(), pos: self.pos(node) },
        };
        FuncDecl {
            recv: node.child_by_field_name("receiver")
                .map(|recv| self.fields(recv)),
            name,
            ty: self.func_type(node),
            body: node.child_by_field_name("body")
                .map(|body| self.block(body)),
        }
    }

    /// signature of a function declaration, literal, type, or interface method
    fn func_type(&self, node: Node<'_>) -> FuncType {
        let results = match node.child_by_field_name("result") {
            Some(result) if result.kind() == "parameter_list" =>
                self.fields(result),
            Some(result) =>
                vec![Field { names: vec![], ty: self.expr(result) }],
            None => vec![],
        };
        FuncType {
            type_params: node.child_by_field_name("type_parameters")
                .map(|params| self.fields(params))
                .unwrap_or_default(),
            params: node.child_by_field_name("parameters")
                .map(|params| self.fields(params))
                .unwrap_or_default(),
            results,
        }
    }

    /// parameter lists, type parameter lists, and struct field lists
    fn fields(&self, list: Node<'_>) -> Vec<Field> {
        named_children(list).into_iter()
            .filter_map(|field| {
                let names = field_children(field, "name").into_iter()
                    .map(|name| self.ident(name))
                    .collect();
                let ty = match (field.kind(), field.child_by_field_name("type")) {
                    ("variadic_parameter_declaration", Some(ty)) =>
                        Expr::Ellipsis(Some(Box::new(self.expr(ty)))),
                    (_, Some(ty)) =>
                        self.expr(ty),
                    // unnamed parameter in older grammars
                    (_, None) if field.kind() != "parameter_declaration" =>
                        self.expr(field),
                    (_, None) =>
                        return None,
                };
                Some(Field { names, ty })
            })
            .collect()
    }

    fn interface_elems(&self, node: Node<'_>) -> Vec<Field> {
        named_children(node).into_iter()
            .map(|elem| match elem.kind() {
                "method_elem" | "method_spec" => Field {
                    names: elem.child_by_field_name("name")
                        .map(|name| self.ident(name))
                        .into_iter()
                        .collect(),
                    ty: Expr::FuncType(self.func_type(elem)),
                },
                _ => Field {
                    names: vec![],
                    ty: self.expr(elem),
                },
            })
            .collect()
    }

    fn gen_decl(&self, node: Node<'_>) -> GenDecl {
        let kind = match node.kind() {
            "const_declaration" => GenKind::Const,
            "var_declaration" => GenKind::Var,
            _ => GenKind::Type,
        };
        let mut specs = Vec::new();
        self.specs(node, &mut specs);
        GenDecl { kind, specs }
    }

    fn specs(&self, node: Node<'_>, specs: &mut Vec<Spec>) {
        for child in named_children(node) {
            match child.kind() {
                "const_spec" | "var_spec" => specs.push(Spec::Value(ValueSpec {
                    names: field_children(child, "name").into_iter()
                        .map(|name| self.ident(name))
                        .collect(),
                    ty: child.child_by_field_name("type")
                        .map(|ty| self.expr(ty)),
                    values: child.child_by_field_name("value")
                        .map(|values| self.expr_list(values))
                        .unwrap_or_default(),
                })),
                "type_spec" | "type_alias" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    specs.push(Spec::Type(TypeSpec {
                        name: self.ident(name),
                        type_params: child.child_by_field_name("type_parameters")
                            .map(|params| self.fields(params))
                            .unwrap_or_default(),
                        ty: child.child_by_field_name("type")
                            .map(|ty| self.expr(ty))
                            .unwrap_or(Expr::Bad(self.pos(child))),
                    }));
                }
                // `var ( ... )` in newer grammars
                "var_spec_list" | "const_spec_list" =>
                    self.specs(child, specs),
                _ => {}
            }
        }
    }

    fn block(&self, node: Node<'_>) -> Block {
        Block { stmts: self.stmts(named_children(node)) }
    }

    fn stmts(&self, nodes: Vec<Node<'_>>) -> Vec<Stmt> {
        let mut stmts = Vec::with_capacity(nodes.len());
        for node in nodes {
            if node.kind() == "statement_list" {
                stmts.extend(self.stmts(named_children(node)));
            } else {
                stmts.push(self.stmt(node));
            }
        }
        stmts
    }

    fn boxed_stmt(&self, node: Option<Node<'_>>) -> Option<Box<Stmt>> {
        node.map(|node| Box::new(self.stmt(node)))
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        let field = |name: &str| node.child_by_field_name(name);
        match node.kind() {
            "const_declaration" | "var_declaration" | "type_declaration" =>
                Stmt::Decl(self.gen_decl(node)),
            "expression_statement" | "go_statement" | "defer_statement" => {
                let expr = named_children(node).into_iter().next()
                    .map(|expr| self.expr(expr))
                    .unwrap_or(Expr::Bad(self.pos(node)));
                match node.kind() {
                    "go_statement" => Stmt::Go(expr),
                    "defer_statement" => Stmt::Defer(expr),
                    _ => Stmt::Expr(expr),
                }
            }
            "assignment_statement" | "short_var_declaration" => Stmt::Assign(
                field("right").map(|list| self.expr_list(list)).unwrap_or_default()
            ),
            "receive_statement" => match field("left") {
                Some(_) => Stmt::Assign(
                    field("right").map(|right| self.expr(right)).into_iter().collect()
                ),
                None => Stmt::Expr(self.opt_expr(node, field("right"))),
            },
            "inc_statement" | "dec_statement" =>
                Stmt::IncDec(self.opt_expr(node, named_children(node).into_iter().next())),
            "send_statement" => Stmt::Send {
                chan: self.opt_expr(node, field("channel")),
                value: self.opt_expr(node, field("value")),
            },
            "block" =>
                Stmt::Block(self.block(node)),
            "if_statement" => Stmt::If {
                init: self.boxed_stmt(field("initializer")),
                cond: self.opt_expr(node, field("condition")),
                then: field("consequence").map(|then| self.block(then)).unwrap_or_default(),
                els: self.boxed_stmt(field("alternative")),
            },
            "for_statement" =>
                self.for_stmt(node),
            "expression_switch_statement" => Stmt::Switch {
                init: self.boxed_stmt(field("initializer")),
                tag: field("value").map(|tag| self.expr(tag)),
                clauses: self.case_clauses(node, "value"),
            },
            "type_switch_statement" => Stmt::TypeSwitch {
                init: self.boxed_stmt(field("initializer")),
                expr: self.opt_expr(node, field("value")),
                clauses: self.case_clauses(node, "type"),
            },
            "select_statement" => Stmt::Select(
                named_children(node).into_iter()
                    .filter(|case| matches!(case.kind(), "communication_case" | "default_case"))
                    .map(|case| CommClause {
                        comm: self.boxed_stmt(case.child_by_field_name("communication")),
                        body: self.stmts(unfielded_children(case)),
                    })
                    .collect()
            ),
            "return_statement" => Stmt::Return(
                named_children(node).into_iter().next()
                    .map(|list| self.expr_list(list))
                    .unwrap_or_default()
            ),
            "labeled_statement" => Stmt::Labeled(
                self.boxed_stmt(unfielded_children(node).into_iter().next())
            ),
            "break_statement" | "continue_statement" | "goto_statement"
            | "fallthrough_statement" =>
                Stmt::Branch,
            "empty_statement" =>
                Stmt::Empty,
            _ =>
                Stmt::Expr(self.expr(node)),
        }
    }

    fn for_stmt(&self, node: Node<'_>) -> Stmt {
        let body = node.child_by_field_name("body")
            .map(|body| self.block(body))
            .unwrap_or_default();
        match unfielded_children(node).into_iter().next() {
            Some(clause) if clause.kind() == "for_clause" => Stmt::For {
                init: self.boxed_stmt(clause.child_by_field_name("initializer")),
                cond: clause.child_by_field_name("condition").map(|cond| self.expr(cond)),
                post: self.boxed_stmt(clause.child_by_field_name("update")),
                body,
            },
            Some(clause) if clause.kind() == "range_clause" => Stmt::Range {
                expr: self.opt_expr(clause, clause.child_by_field_name("right")),
                body,
            },
            Some(cond) => Stmt::For {
                init: None,
                cond: Some(self.expr(cond)),
                post: None,
                body,
            },
            None => Stmt::For {
                init: None,
                cond: None,
                post: None,
                body,
            },
        }
    }

    /// `case` and `default` clauses of expression and type switches
    fn case_clauses(&self, node: Node<'_>, list_field: &str) -> Vec<CaseClause> {
        named_children(node).into_iter()
            .filter(|case| matches!(case.kind(), "expression_case" | "type_case" | "default_case"))
            .map(|case| {
                let list = field_children(case, list_field).into_iter()
                    .flat_map(|list| {
                        if list.kind() == "expression_list" {
                            self.expr_list(list)
                        } else {
                            vec![self.expr(list)]
                        }
                    })
                    .collect();
                CaseClause {
                    list,
                    body: self.stmts(unfielded_children(case)),
                }
            })
            .collect()
    }

    fn expr_list(&self, node: Node<'_>) -> Vec<Expr> {
        if node.kind() == "expression_list" {
            named_children(node).into_iter()
                .map(|expr| self.expr(expr))
                .collect()
        } else {
            vec![self.expr(node)]
        }
    }

    fn opt_expr(&self, parent: Node<'_>, node: Option<Node<'_>>) -> Expr {
        node.map(|node| self.expr(node))
            .unwrap_or(Expr::Bad(self.pos(parent)))
    }

    fn boxed(&self, parent: Node<'_>, field: &str) -> Box<Expr> {
        Box::new(self.opt_expr(parent, parent.child_by_field_name(field)))
    }

    fn first(&self, node: Node<'_>) -> Box<Expr> {
        Box::new(self.opt_expr(node, named_children(node).into_iter().next()))
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "package_identifier" =>
                Expr::Ident(self.ident(node)),

            "int_literal" | "float_literal" | "imaginary_literal" | "rune_literal"
            | "interpreted_string_literal" | "raw_string_literal"
            | "nil" | "true" | "false" | "iota" =>
                Expr::BasicLit(self.pos(node)),

            "selector_expression" => Expr::Selector {
                x: self.boxed(node, "operand"),
                sel: self.field_ident(node, "field"),
            },
            "qualified_type" => Expr::Selector {
                x: self.boxed(node, "package"),
                sel: self.field_ident(node, "name"),
            },

            "call_expression" => {
                let mut fun = self.boxed(node, "function");
                if let Some(type_args) = node.child_by_field_name("type_arguments") {
                    fun = Box::new(Expr::Index {
                        x: fun,
                        indices: self.type_args(type_args),
                    });
                }
                let args = node.child_by_field_name("arguments")
                    .map(|args| named_children(args).into_iter()
                         .map(|arg| match arg.kind() {
                             "variadic_argument" =>
                                 Expr::Ellipsis(Some(self.first(arg))),
                             _ => self.expr(arg),
                         })
                         .collect())
                    .unwrap_or_default();
                Expr::Call { fun, args }
            }
            "type_conversion_expression" => Expr::Call {
                fun: self.boxed(node, "type"),
                args: vec![self.opt_expr(node, node.child_by_field_name("operand"))],
            },

            "composite_literal" => Expr::CompositeLit {
                ty: node.child_by_field_name("type")
                    .map(|ty| Box::new(self.expr(ty))),
                elts: node.child_by_field_name("body")
                    .map(|body| self.elements(body))
                    .unwrap_or_default(),
            },
            "literal_value" => Expr::CompositeLit {
                ty: None,
                elts: self.elements(node),
            },
            "literal_element" =>
                *self.first(node),
            "keyed_element" => {
                let children = named_children(node);
                match (children.first(), children.last()) {
                    (Some(key), Some(value)) if children.len() >= 2 => Expr::KeyValue {
                        key: Box::new(self.expr(*key)),
                        value: Box::new(self.expr(*value)),
                    },
                    _ => Expr::Bad(self.pos(node)),
                }
            }

            "func_literal" => Expr::FuncLit {
                ty: self.func_type(node),
                body: node.child_by_field_name("body")
                    .map(|body| self.block(body))
                    .unwrap_or_default(),
            },

            "unary_expression" =>
                Expr::Unary(self.boxed(node, "operand")),
            "binary_expression" =>
                Expr::Binary(self.boxed(node, "left"), self.boxed(node, "right")),
            "index_expression" => Expr::Index {
                x: self.boxed(node, "operand"),
                indices: field_children(node, "index").into_iter()
                    .map(|index| self.expr(index))
                    .collect(),
            },
            "slice_expression" => Expr::Slice {
                x: self.boxed(node, "operand"),
                bounds: ["start", "end", "capacity"].into_iter()
                    .filter_map(|bound| node.child_by_field_name(bound))
                    .map(|bound| self.expr(bound))
                    .collect(),
            },
            "type_assertion_expression" => Expr::TypeAssert {
                x: self.boxed(node, "operand"),
                ty: node.child_by_field_name("type")
                    .map(|ty| Box::new(self.expr(ty))),
            },
            "type_instantiation_expression" => Expr::Index {
                x: self.boxed(node, "type"),
                indices: unfielded_children(node).into_iter()
                    .map(|arg| self.expr(arg))
                    .collect(),
            },
            "parenthesized_expression" | "parenthesized_type" =>
                Expr::Paren(self.first(node)),

            "pointer_type" =>
                Expr::Star(self.first(node)),
            "array_type" => Expr::ArrayType {
                len: Some(self.boxed(node, "length")),
                elt: self.boxed(node, "element"),
            },
            "implicit_length_array_type" => Expr::ArrayType {
                len: Some(Box::new(Expr::Ellipsis(None))),
                elt: self.boxed(node, "element"),
            },
            "slice_type" => Expr::ArrayType {
                len: None,
                elt: self.boxed(node, "element"),
            },
            "map_type" => Expr::MapType {
                key: self.boxed(node, "key"),
                value: self.boxed(node, "value"),
            },
            "channel_type" =>
                Expr::ChanType(self.boxed(node, "value")),
            "function_type" =>
                Expr::FuncType(self.func_type(node)),
            "struct_type" => Expr::StructType(
                named_children(node).into_iter()
                    .find(|list| list.kind() == "field_declaration_list")
                    .map(|list| self.fields(list))
                    .unwrap_or_default()
            ),
            "interface_type" =>
                Expr::InterfaceType(self.interface_elems(node)),
            "generic_type" => Expr::Index {
                x: self.boxed(node, "type"),
                indices: node.child_by_field_name("type_arguments")
                    .map(|args| self.type_args(args))
                    .unwrap_or_default(),
            },
            "negated_type" =>
                Expr::Unary(self.first(node)),
            // `A | B | ~C` constraints
            "type_elem" | "type_constraint" | "constraint_elem" =>
                named_children(node).into_iter()
                    .map(|ty| self.expr(ty))
                    .reduce(|lhs, rhs| Expr::Binary(Box::new(lhs), Box::new(rhs)))
                    .unwrap_or(Expr::Bad(self.pos(node))),

            _ => {
                let children = named_children(node);
                match children.as_slice() {
                    [only] => self.expr(*only),
                    _ => Expr::Bad(self.pos(node)),
                }
            }
        }
    }

    fn field_ident(&self, node: Node<'_>, field: &str) -> Ident {
        match node.child_by_field_name(field) {
            Some(name) => self.ident(name),
            None => Ident { name: "_".to_string(), pos: self.pos(node) },
        }
    }

    fn type_args(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node).into_iter()
            .map(|arg| self.expr(arg))
            .collect()
    }

    fn elements(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node).into_iter()
            .map(|elt| self.expr(elt))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> File {
        parse_file(FileId(0), Path::new("test.go"), src)
            .expect("parse_file")
    }

    #[test]
    fn package_and_decls() {
        let file = parse("package p\n\nimport \"fmt\"\n\nconst a, b = 1, 2\n\nfunc f() { fmt.Println(a) }\n");
        assert_eq!(file.package.name, "p");
        assert_eq!(file.decls.len(), 2);
        match &file.decls[0] {
            Decl::Gen(GenDecl { kind: GenKind::Const, specs }) => match &specs[0] {
                Spec::Value(spec) => {
                    let names = spec.names.iter().map(|name| name.name.as_str()).collect::<Vec<_>>();
                    assert_eq!(names, ["a", "b"]);
                    assert_eq!(spec.values.len(), 2);
                    assert_eq!(spec.names[0].pos.line, 5);
                    assert_eq!(spec.names[0].pos.column, 7);
                }
                spec => panic!("unexpected spec {:?}", spec),
            },
            decl => panic!("unexpected decl {:?}", decl),
        }
        match &file.decls[1] {
            Decl::Func(func) => {
                assert_eq!(func.name.name, "f");
                assert!(func.recv.is_none());
                assert_eq!(func.body.as_ref().map(|body| body.stmts.len()), Some(1));
            }
            decl => panic!("unexpected decl {:?}", decl),
        }
    }

    #[test]
    fn grouped_specs() {
        let file = parse("package p\nvar (\n\tx int\n\ty = 2\n)\ntype (\n\tA = int\n\tb struct{}\n)\n");
        let kinds = file.decls.iter()
            .map(|decl| match decl {
                Decl::Gen(gen) => (gen.kind, gen.specs.len()),
                Decl::Func(_) => panic!("unexpected func"),
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, [(GenKind::Var, 2), (GenKind::Type, 2)]);
        match &file.decls[1] {
            Decl::Gen(gen) => match (&gen.specs[0], &gen.specs[1]) {
                (Spec::Type(alias), Spec::Type(strukt)) => {
                    assert_eq!(alias.name.name, "A");
                    assert!(matches!(&alias.ty, Expr::Ident(ident) if ident.name == "int"));
                    assert!(matches!(strukt.ty, Expr::StructType(_)));
                }
                specs => panic!("unexpected specs {:?}", specs),
            },
            Decl::Func(_) => unreachable!(),
        }
    }

    #[test]
    fn method_receiver() {
        let file = parse("package p\ntype t int\nfunc (x t) M() {}\n");
        match &file.decls[1] {
            Decl::Func(func) => {
                assert_eq!(func.name.name, "M");
                assert_eq!(func.recv.as_ref().map(Vec::len), Some(1));
            }
            decl => panic!("unexpected decl {:?}", decl),
        }
    }

    #[test]
    fn keyed_composite_literal() {
        let file = parse("package p\nvar v = s{f: g}\n");
        let Decl::Gen(gen) = &file.decls[0] else { panic!("expected var") };
        let Spec::Value(spec) = &gen.specs[0] else { panic!("expected value spec") };
        match &spec.values[0] {
            Expr::CompositeLit { ty: Some(ty), elts } => {
                assert!(matches!(&**ty, Expr::Ident(ident) if ident.name == "s"));
                match &elts[0] {
                    Expr::KeyValue { key, value } => {
                        assert!(matches!(&**key, Expr::Ident(ident) if ident.name == "f"));
                        assert!(matches!(&**value, Expr::Ident(ident) if ident.name == "g"));
                    }
                    elt => panic!("unexpected element {:?}", elt),
                }
            }
            value => panic!("unexpected value {:?}", value),
        }
    }

    #[test]
    fn syntax_error_position() {
        let err = parse_file(FileId(0), Path::new("bad.go"), "package p\n\nvar = 1\n\nconst c = 2\n")
            .expect_err("should not parse");
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 3),
            err => panic!("unexpected error {}", err),
        }
    }

    #[test]
    fn missing_package_clause() {
        let err = parse_file(FileId(0), Path::new("bad.go"), "")
            .expect_err("should not parse");
        assert!(matches!(err, Error::Parse { .. }));
    }
}
