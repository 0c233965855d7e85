use tern::ast::{Expression, Pattern};
use tern::config::CheckConfig;
use tern::diagnostics::{Category, Severity};
use tern::types::{CheckResult, Type, check_source};

fn check(source: &str) -> CheckResult {
    check_source(source, &CheckConfig::default())
}

fn categories(result: &CheckResult) -> Vec<Category> {
    result.diagnostics.iter().map(|d| d.category).collect()
}

#[test]
fn match_on_literals() {
    let result = check("fun describe n -> match n with 0 -> \"zero\" | 1 -> \"one\" | _ -> \"many\"");
    assert!(result.passed);
    assert_eq!(result.type_of("describe").as_deref(), Some("int -> string"));
}

#[test]
fn match_destructures_tuples() {
    let result = check("fun fst p -> match p with (a, _) -> a;; let one = fst (1, \"x\")");
    assert!(result.passed);
    assert_eq!(result.type_of("fst").as_deref(), Some("'a * 'b -> 'a"));
    assert_eq!(result.type_of("one").as_deref(), Some("int"));
}

#[test]
fn match_nested_tuples() {
    let result = check("fun f p -> match p with ((a, b), c) -> a + b + c");
    assert!(result.passed);
    assert_eq!(result.type_of("f").as_deref(), Some("(int * int) * int -> int"));
}

#[test]
fn match_bool_and_unit_literals() {
    let result = check("let b = match true with true -> 1 | false -> 0;; let u = match () with () -> ()");
    assert!(result.passed);
    assert_eq!(result.type_of("b").as_deref(), Some("int"));
    assert_eq!(result.type_of("u").as_deref(), Some("unit"));
}

#[test]
fn match_pattern_type_must_fit_scrutinee() {
    let result = check("let r = match 1 with \"one\" -> 1 | _ -> 0");
    assert!(!result.passed);
    assert_eq!(categories(&result), vec![Category::UnificationMismatch]);
}

#[test]
fn match_arms_must_agree() {
    let result = check("let r = match 1 with 0 -> true | _ -> 1");
    assert!(!result.passed);
    assert_eq!(categories(&result), vec![Category::UnificationMismatch]);
}

#[test]
fn wildcard_binds_nothing() {
    let result = check("let r = match 1 with _ -> _x");
    assert!(!result.passed);
    assert_eq!(categories(&result), vec![Category::UnboundIdentifier]);
}

#[test]
fn wildcard_is_not_a_value() {
    let result = check("let y = match 1 with _ -> _");
    assert!(!result.passed);
    assert!(result.lookup("y").is_none());
    assert!(!result.diagnostics.is_empty());
    assert!(result.diagnostics.iter().all(|d| d.category == Category::Syntax));
}

#[test]
fn wildcard_pattern_node() {
    let result = check("let r = match (1, 2) with (_, b) -> b");
    assert!(result.passed);
    let Expression::Let(node) = &result.program.declarations[0] else {
        panic!("expected let");
    };
    let Expression::Match(m) = node.value.as_ref() else {
        panic!("expected match");
    };
    let Pattern::Tuple(tuple) = &m.arms[0].pattern else {
        panic!("expected tuple pattern");
    };
    assert!(matches!(tuple.items[0], Pattern::Wildcard(_)));
    assert_eq!(m.arms[0].pattern.bound_names(), vec!["b"]);
}

#[test]
fn duplicate_names_in_one_pattern() {
    let result = check("fun f p -> match p with (x, x) -> x");
    assert!(!result.passed);
    assert_eq!(categories(&result), vec![Category::DuplicateBinding]);
}

#[test]
fn arm_bindings_are_scoped_to_the_arm() {
    let result = check("let r = match (1, 2) with (a, b) -> a;; let s = b");
    assert!(!result.passed);
    assert_eq!(categories(&result), vec![Category::UnboundIdentifier]);
}

#[test]
fn unreachable_arms_warn() {
    let result = check("fun f n -> match n with x -> x | 0 -> 1 | _ -> 2");
    assert!(result.passed);
    assert_eq!(
        categories(&result),
        vec![Category::UnreachablePattern, Category::UnreachablePattern]
    );
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn refutable_tuple_does_not_hide_later_arms() {
    let result = check("fun f p -> match p with (0, y) -> y | (x, _) -> x");
    assert!(result.passed);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.type_of("f").as_deref(), Some("int * int -> int"));
}

#[test]
fn tuple_parameters() {
    let result = check("fun add_pair (a, b) -> a + b;; let seven = add_pair (3, 4)");
    assert!(result.passed);
    assert_eq!(result.type_of("add_pair").as_deref(), Some("int * int -> int"));
}

#[test]
fn pattern_slots_are_resolved() {
    let result = check("let r = match (1, true) with (n, flag) -> if flag then n else 0");
    assert!(result.passed);

    let Expression::Let(node) = &result.program.declarations[0] else {
        panic!("expected let");
    };
    let Expression::Match(m) = node.value.as_ref() else {
        panic!("expected match");
    };
    let Pattern::Tuple(tuple) = &m.arms[0].pattern else {
        panic!("expected tuple pattern");
    };
    assert_eq!(*tuple.items[0].ty(), Type::int());
    assert_eq!(*tuple.items[1].ty(), Type::bool());
    assert_eq!(tuple.ty, Type::Tuple(vec![Type::int(), Type::bool()]));
}
