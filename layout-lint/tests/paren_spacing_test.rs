//! Tests for the paren-spacing rule (LAY002).

// Test-specific lint suppressions
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use layout_lint::config::ParenSpacingOptions;
use layout_lint::error::StructuralError;
use layout_lint::fix::apply_fixes;
use layout_lint::rules::{ParenSpacing, Rule};
use layout_lint::test_utils::parse;
use layout_lint::token::Span;
use layout_lint::{Diagnostic, Fix, MessageKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

use MessageKind::{
    MissingClosingSpace, MissingOpeningSpace, RejectedClosingSpace, RejectedOpeningSpace,
};

fn lint(mode: &str, exceptions: &[&str], source: &str) -> Vec<Diagnostic> {
    let rule = ParenSpacing::from_options(&ParenSpacingOptions::new(mode, exceptions))
        .expect("valid options");
    let unit = parse(source).expect("valid source");
    rule.check(&unit).expect("well-formed unit")
}

fn fix(mode: &str, exceptions: &[&str], source: &str) -> (Vec<MessageKind>, String) {
    let diagnostics = lint(mode, exceptions, source);
    let fixed = apply_fixes(source, &diagnostics).expect("fixes apply");
    (diagnostics.iter().map(|d| d.kind).collect(), fixed)
}

#[rstest]
#[case::never_removes("never", &[], "foo( bar )", &[RejectedOpeningSpace, RejectedClosingSpace], "foo(bar)")]
#[case::never_accepts("never", &[], "foo(bar)", &[], "foo(bar)")]
#[case::always_adds("always", &[], "foo(bar)", &[MissingOpeningSpace, MissingClosingSpace], "foo( bar )")]
#[case::always_accepts("always", &[], "foo( bar )", &[], "foo( bar )")]
#[case::always_one_side("always", &[], "foo( bar)", &[MissingClosingSpace], "foo( bar )")]
#[case::empty_pair_untouched("always", &[], "foo()", &[], "foo()")]
#[case::brace_exception_tight("always", &["{}"], "foo({ a: 1 })", &[], "foo({ a: 1 })")]
#[case::brace_exception_spaced("always", &["{}"], "foo( { a: 1 } )", &[RejectedOpeningSpace, RejectedClosingSpace], "foo({ a: 1 })")]
#[case::brace_exception_never("never", &["{}"], "foo({ a: 1 })", &[MissingOpeningSpace, MissingClosingSpace], "foo( { a: 1 } )")]
#[case::bracket_exception("always", &["[]"], "foo([1, 2])", &[], "foo([1, 2])")]
#[case::paren_exception("always", &["()"], "((1 + 2))", &[MissingOpeningSpace, MissingClosingSpace], "(( 1 + 2 ))")]
#[case::empty_always_tight("always", &["empty"], "foo()", &[], "foo()")]
#[case::empty_always_spaced("always", &["empty"], "foo( )", &[RejectedOpeningSpace, RejectedClosingSpace], "foo()")]
#[case::empty_never_tight("never", &["empty"], "foo()", &[MissingOpeningSpace, MissingClosingSpace], "foo( )")]
#[case::empty_never_spaced("never", &["empty"], "foo( )", &[], "foo( )")]
#[case::never_spaced_empty_pair("never", &[], "foo( )", &[RejectedOpeningSpace, RejectedClosingSpace], "foo()")]
fn test_modes_and_exceptions(
    #[case] mode: &str,
    #[case] exceptions: &[&str],
    #[case] source: &str,
    #[case] expected: &[MessageKind],
    #[case] output: &str,
) {
    let (kinds, fixed) = fix(mode, exceptions, source);
    assert_eq!(kinds, expected);
    assert_eq!(fixed, output);
}

#[test]
fn test_paren_exception_reports_inner_pair() {
    let diagnostics = lint("always", &["()"], "((1 + 2))");
    let spans: Vec<_> = diagnostics.iter().map(|d| d.span).collect();
    assert_eq!(spans, vec![Span::new(1, 2), Span::new(7, 8)]);
}

#[rstest]
#[case::single_item("foo(bar)", &[], "foo(bar)")]
#[case::list("foo(a, b)", &[MissingOpeningSpace, MissingClosingSpace], "foo( a, b )")]
#[case::single_item_spaced("foo( bar )", &[RejectedOpeningSpace, RejectedClosingSpace], "foo(bar)")]
#[case::nested_call("foo(bar(baz))", &[MissingOpeningSpace, MissingClosingSpace], "foo( bar(baz) )")]
#[case::block_comment("foo(/* c */ a)", &[MissingOpeningSpace, MissingClosingSpace], "foo( /* c */ a )")]
#[case::call_argument("foo(bar())", &[MissingOpeningSpace, MissingClosingSpace], "foo( bar() )")]
#[case::member_access("foo(a.b)", &[], "foo(a.b)")]
fn test_loose(
    #[case] source: &str,
    #[case] expected: &[MessageKind],
    #[case] output: &str,
) {
    let (kinds, fixed) = fix("loose", &[], source);
    assert_eq!(kinds, expected);
    assert_eq!(fixed, output);
}

#[rstest]
#[case::lines_opener_shares_line("always", "bracket lines", "foo({\nbar: 1\n})", "foo( {\nbar: 1\n})")]
#[case::sides("always", "bracket sides", "foo({\nbar: 1\n})", "foo({\nbar: 1\n})")]
#[case::unclosed("always", "bracket unclosed", "foo({\nbar: 1\n})", "foo({\nbar: 1\n})")]
#[case::unclosed_balanced("always", "bracket unclosed", "foo([])", "foo( [] )")]
#[case::within_balanced("always", "bracket within", "foo([])", "foo([])")]
#[case::within_mixed("always", "bracket within", "foo({ a: 1 })", "foo( { a: 1 } )")]
#[case::lines_never("never", "bracket lines", "foo({\nbar: 1\n})", "foo({\nbar: 1\n} )")]
fn test_bracket_exceptions(
    #[case] mode: &str,
    #[case] exception: &str,
    #[case] source: &str,
    #[case] output: &str,
) {
    let (_, fixed) = fix(mode, &[exception], source);
    assert_eq!(fixed, output);
}

#[test]
fn test_line_comment_after_opener() {
    assert!(lint("never", &[], "foo( // why\nbar)").is_empty());
    assert!(lint("never", &[], "foo(\nbar\n)").is_empty());
}

#[test]
fn test_report_shapes() {
    let diagnostics = lint("always", &[], "foo(bar)");
    assert_eq!(diagnostics[0].span, Span::new(3, 4));
    assert_eq!(diagnostics[0].fix, Some(Fix::insert(4, " ")));
    assert_eq!(diagnostics[1].span, Span::new(7, 8));
    assert_eq!(diagnostics[1].fix, Some(Fix::insert(7, " ")));

    let diagnostics = lint("never", &[], "foo(  bar  )");
    assert_eq!(diagnostics[0].span, Span::new(4, 6));
    assert_eq!(diagnostics[0].fix, Some(Fix::remove(Span::new(4, 6))));
    assert_eq!(diagnostics[1].span, Span::new(9, 11));
    assert_eq!(diagnostics[1].start.column, 9);
}

#[test]
fn test_shared_gap_is_fixed_once() {
    for (mode, exceptions, source) in [
        ("never", &[][..], "foo( )"),
        ("never", &["empty"][..], "foo()"),
        ("always", &["empty"][..], "foo( )"),
    ] {
        let diagnostics = lint(mode, exceptions, source);
        assert_eq!(diagnostics.len(), 2, "{source}");
        assert!(diagnostics[0].fix.is_some(), "{source}");
        assert!(diagnostics[1].fix.is_none(), "{source}");
    }
}

#[rstest]
#[case("always", &[], "foo(bar, baz(1))")]
#[case("never", &[], "foo( bar, baz( 1 ) )")]
#[case("loose", &[], "foo(a, b(c))")]
#[case("always", &["()"], "((1 + 2))")]
#[case("always", &["{}", "[]"], "foo( { a: [ 1 ] } )")]
#[case("never", &["empty"], "foo()")]
#[case("always", &["bracket lines"], "foo({\nbar: 1\n})")]
fn test_fixes_are_idempotent(#[case] mode: &str, #[case] exceptions: &[&str], #[case] source: &str) {
    let (_, fixed) = fix(mode, exceptions, source);
    assert_eq!(lint(mode, exceptions, &fixed), Vec::new());
}

#[test]
fn test_unbalanced_parens_are_structural_errors() {
    let rule = ParenSpacing::from_options(&ParenSpacingOptions::default()).expect("valid options");

    let unit = parse("foo(bar").expect("valid source");
    assert!(rule.check(&unit).is_ok());

    let unit = parse("foo(").expect("valid source");
    assert_eq!(
        rule.check(&unit),
        Err(StructuralError::DanglingOpeningParen { offset: 3 })
    );

    let unit = parse(")").expect("valid source");
    assert_eq!(
        rule.check(&unit),
        Err(StructuralError::UnmatchedClosingParen { offset: 0 })
    );

    let unit = parse("(a))").expect("valid source");
    assert_eq!(
        rule.check(&unit),
        Err(StructuralError::UnmatchedClosingParen { offset: 3 })
    );
}
