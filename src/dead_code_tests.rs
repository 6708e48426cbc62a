#![cfg(test)]

use std::path::Path;
use pretty_assertions::assert_eq;
use crate::{
    ast::FileId,
    binding::BindingKind,
    dead_code::{scan, DeadCode},
    syntax::parse_file,
};

fn run_package(contents: &[&str], entry: bool) -> Vec<DeadCode> {
    let files = contents.iter()
        .enumerate()
        .map(|(index, content)| {
            let path = format!("file{}.go", index);
            parse_file(FileId(index as u32), Path::new(&path), content)
                .expect("parse_file")
        })
        .collect::<Vec<_>>();

    scan(&files, entry)
}

fn run(content: &str) -> Vec<DeadCode> {
    run_package(&[content], false)
}

fn run_entry(content: &str) -> Vec<DeadCode> {
    run_package(&[content], true)
}

fn lines(results: &[DeadCode]) -> Vec<(&str, u32)> {
    results.iter()
        .map(|result| (result.name.as_str(), result.pos.line))
        .collect()
}

#[test]
fn empty_package() {
    assert_eq!(0, run_package(&[], false).len());
    assert_eq!(0, run("package p\n").len());
}

#[test]
fn const_dead() {
    let results = run("package p\n\nconst unused = 1\n");
    assert_eq!(lines(&results), [("unused", 3)]);
    assert_eq!(results[0].kind, BindingKind::Const);
    assert_eq!(results[0].pos.column, 7);
}

#[test]
fn blank_var_uses() {
    let results = run("package p\n\nconst unused = 1\n\nvar _ = unused\n");
    assert_eq!(0, results.len());
}

#[test]
fn blank_assignment_uses() {
    let results = run("package p\n\nvar x = 1\n\nfunc init() {\n\t_ = x\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn blank_never_reported() {
    let results = run("package p\n\nconst _ = 1\n\nvar _ int\n\nfunc _() {}\n");
    assert_eq!(0, results.len());
}

#[test]
fn forward_reference() {
    let results = run("\
package p

func F() {
	_ = later
}

const later = 1
");
    assert_eq!(0, results.len());
}

#[test]
fn cross_file_reference() {
    let results = run_package(&[
        "package p\n\nfunc F() { helper() }\n",
        "package p\n\nfunc helper() {}\n\nfunc dead() {}\n",
    ], false);
    assert_eq!(lines(&results), [("dead", 5)]);
    assert_eq!(results[0].pos.file, FileId(1));
    assert_eq!(results[0].kind, BindingKind::Func);
}

#[test]
fn init_always_alive() {
    assert_eq!(0, run("package p\n\nfunc init() {}\n").len());
    assert_eq!(0, run_entry("package main\n\nfunc init() {}\n").len());
}

#[test]
fn main_alive_in_entry_package() {
    assert_eq!(0, run_entry("package main\n\nfunc main() {}\n").len());
}

#[test]
fn main_dead_in_library() {
    let results = run("package p\n\nfunc main() {}\n");
    assert_eq!(lines(&results), [("main", 3)]);
}

#[test]
fn exported_alive_in_library() {
    let results = run("package p\n\nfunc Exported() {}\n\nconst Max = 3\n\ntype T int\n\nvar V T\n");
    assert_eq!(0, results.len());
}

#[test]
fn exported_dead_in_entry_package() {
    let results = run_entry("package main\n\nfunc main() {}\n\nfunc Exported() {}\n");
    assert_eq!(lines(&results), [("Exported", 5)]);
}

#[test]
fn exported_local_dead() {
    let results = run("\
package p

func init() {
	const Local = 1
	const (
		init = 2
		main = 3
	)
}
");
    assert_eq!(lines(&results), [("Local", 4), ("init", 6), ("main", 7)]);
}

#[test]
fn shadowed_outer_dead() {
    let results = run("\
package p

func init() {
	const x = 1
	{
		const x = 2
		_ = x
	}
}
");
    assert_eq!(lines(&results), [("x", 4)]);
}

#[test]
fn shadowed_inner_dead() {
    let results = run("\
package p

func init() {
	const x = 1
	{
		const x = 2
	}
	_ = x
}
");
    assert_eq!(lines(&results), [("x", 6)]);
}

#[test]
fn redeclared_in_same_scope() {
    let results = run("\
package p

func init() {
	const c1, c2 = 2, 3
	_ = c1
}
");
    assert_eq!(lines(&results), [("c2", 4)]);
}

#[test]
fn initializer_reads_own_name() {
    let results = run("\
package p

var x = 1

func init() {
	var x = x
}
");
    assert_eq!(lines(&results), [("x", 3)]);
    assert_eq!(results[0].kind, BindingKind::Var);
}

#[test]
fn spec_type_after_names() {
    let results = run("\
package p

func init() {
	type t int
	var t2, t3 t = 1, t2
	_ = t3
}
");
    assert_eq!(0, results.len());
}

#[test]
fn struct_field_type() {
    let results = run("\
package p

type t int

type s struct {
	f t
}

var _ = s{}
");
    assert_eq!(0, results.len());
}

#[test]
fn struct_field_names_are_not_references() {
    let results = run("\
package p

const f = 1

type s struct {
	f int
}

var _ = s{f: 2}
");
    assert_eq!(lines(&results), [("f", 3)]);
}

#[test]
fn composite_literal_elements() {
    let results = run("\
package p

type pair struct {
	a, b interface{}
}

type left struct{}

type right struct{}

func F() {
	_ = pair{a: left{}, b: []right{}}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn local_type_dead() {
    let results = run("\
package p

type ttt string

func F() {
	type ttt int
	var c ttt
	_ = c
	type local int
}
");
    assert_eq!(lines(&results), [("ttt", 3), ("local", 9)]);
    assert_eq!(results[1].kind, BindingKind::Type);
}

#[test]
fn local_var_type_in_inner_block() {
    let results = run("\
package p

func F() {
	type used int
	{
		var c used
		_ = c
	}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn signature_types() {
    let results = run("\
package p

type param int

type result int

func F(a, b param) (result, error) {
	return 0, nil
}
");
    assert_eq!(0, results.len());
}

#[test]
fn func_type_params() {
    let results = run("\
package p

type FT func(a, b arg) ret

type arg int

type ret int
");
    assert_eq!(0, results.len());
}

#[test]
fn chan_types() {
    let results = run("\
package p

type elem int

type other int

type Ch chan other

func F() {
	ch := make(chan elem)
	_ = ch
}
");
    assert_eq!(0, results.len());
}

#[test]
fn array_length_and_element() {
    let results = run("\
package p

const size = 4

type cell int

type Grid [size][size]cell
");
    assert_eq!(0, results.len());
}

#[test]
fn slice_map_pointer_types() {
    let results = run("\
package p

type k int

type v int

type e int

var M map[k][]*v

func F(args ...e) {}
");
    assert_eq!(0, results.len());
}

#[test]
fn recursive_type() {
    let results = run("package p\n\ntype node struct {\n\tnext *node\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn unused_function() {
    let results = run("\
package p

func used() {}

func unused() {
	used()
}
");
    assert_eq!(lines(&results), [("unused", 5)]);
}

#[test]
fn recursive_function() {
    let results = run("package p\n\nfunc loop() {\n\tloop()\n}\n");
    assert_eq!(0, results.len());
}

#[test]
fn method_bodies_are_walked() {
    let results = run("\
package p

type t struct{}

func (t) method() {
	helper()
}

func helper() {}
");
    // the receiver type alone doesn't count as a use
    assert_eq!(lines(&results), [("t", 3)]);
}

#[test]
fn selector_member_is_a_reference() {
    let results = run("\
package p

func helper() {}

func F() {
	var x struct{}
	x.helper()
}
");
    assert_eq!(0, results.len());
}

#[test]
fn selector_member_resolves_across_files() {
    let results = run_package(&[
        "package p\n\nimport \"fmt\"\n\nfunc F() {\n\tfmt.Println()\n}\n",
        "package p\n\nfunc Println() {}\n\nfunc println() {}\n",
    ], true);
    assert_eq!(lines(&results), [("F", 5), ("println", 5)]);
}

#[test]
fn qualified_type_member_is_a_reference() {
    let results = run_entry("\
package main

import \"time\"

type Duration int

var d time.Duration

func main() {
	_ = d
}
");
    assert_eq!(0, results.len());
}

#[test]
fn assignment_targets_are_not_references() {
    let results = run("\
package p

var target int

func F() {
	target = 1
}
");
    assert_eq!(lines(&results), [("target", 3)]);
}

#[test]
fn control_flow_is_walked() {
    let results = run("\
package p

const limit = 3

func cond() bool { return true }

func step() {}

func each() []int { return nil }

func pick() int { return 0 }

func F(ch chan int) {
	for i := 0; i < limit; i++ {
		if cond() {
			step()
		}
	}
	for range each() {
	}
	switch pick() {
	case 1:
	}
	select {
	case <-ch:
	}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn case_clause_scope() {
    let results = run("\
package p

func F(x int) {
	switch x {
	case 1:
		const c = 1
	default:
		const d = 2
		_ = d
	}
}
");
    assert_eq!(lines(&results), [("c", 6)]);
}

#[test]
fn type_switch_cases() {
    let results = run("\
package p

type a int

func F(x interface{}) {
	switch x.(type) {
	case a:
	}
}
");
    assert_eq!(0, results.len());
}

#[test]
fn func_literal() {
    let results = run("\
package p

type arg int

var F = func(x arg) {
	helper()
}

func helper() {}
");
    assert_eq!(0, results.len());
}

#[test]
fn interface_methods() {
    let results = run("\
package p

type arg int

type embedded interface{}

type I interface {
	embedded
	M(arg) error
}
");
    assert_eq!(0, results.len());
}

#[test]
fn generics() {
    let results = run("\
package p

type number interface {
	~int | ~float64
}

type list[T any] struct {
	items []T
}

func Sum[T number](xs list[T]) T {
	var total T
	return total
}
");
    assert_eq!(0, results.len());
}

#[test]
fn unrelated_unresolved_name_hides_report() {
    // a local shadow elsewhere can't be told apart from a forward reference
    let results = run_package(&[
        "package p\n\nconst name = 1\n",
        "package p\n\nfunc F(name int) int {\n\treturn name\n}\n",
    ], false);
    assert_eq!(0, results.len());
}

#[test]
fn kinds() {
    let results = run("\
package p

const c = 1

var v = 2

type t int

func f() {}
");
    let kinds = results.iter().map(|result| result.kind).collect::<Vec<_>>();
    assert_eq!(kinds, [BindingKind::Const, BindingKind::Var, BindingKind::Type, BindingKind::Func]);
    assert_eq!(results[3].to_string(), "unused func f");
}

#[test]
fn deterministic() {
    let contents = [
        "package p\n\nconst a, b, c = 1, 2, 3\n\nvar d, e = 4, 5\n",
        "package p\n\nfunc f() {}\n\nfunc g() {}\n",
    ];
    let first = run_package(&contents, false);
    let second = run_package(&contents, false);
    assert_eq!(first, second);
    assert_eq!(
        lines(&first),
        [("a", 3), ("b", 3), ("c", 3), ("d", 5), ("e", 5), ("f", 3), ("g", 5)]
    );
}
