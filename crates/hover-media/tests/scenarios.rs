//! End-to-end rewrites of whole stylesheets.

use hover_media::{process, Error};
use pretty_assertions::assert_eq;

fn run(input: &str, output: &str) {
    assert_eq!(process(input).unwrap(), output);
}

#[test]
fn single_selector() {
    run(
        ".this-is-a-class:hover {}",
        "@media (hover: hover) and (pointer: fine) {.this-is-a-class:hover {}\n}",
    );
}

#[test]
fn rule_with_declarations() {
    run(
        ".this-is-a-class:hover { text-decoration: underline; }",
        "@media (hover: hover) and (pointer: fine) {.this-is-a-class:hover { text-decoration: underline; } }",
    );
}

#[test]
fn descendant_selectors() {
    run(
        ".s-some-scope p a:hover p {}",
        "@media (hover: hover) and (pointer: fine) {.s-some-scope p a:hover p {}\n}",
    );
    run(
        ".js .link:hover .thing {}",
        "@media (hover: hover) and (pointer: fine) {.js .link:hover .thing {}\n}",
    );
}

#[test]
fn multiple_selectors() {
    run(
        ".this-is-a-class:hover, .banana {}",
        ".banana {}@media (hover: hover) and (pointer: fine) {.this-is-a-class:hover {}\n}",
    );
    run(
        ".this-is-a-class:hover, .banana:hover {}",
        "@media (hover: hover) and (pointer: fine) {.this-is-a-class:hover, .banana:hover {}\n}",
    );
}

#[test]
fn rules_inside_hover_query_are_skipped() {
    run(
        "@media (hover: hover) {.btn:hover {}}",
        "@media (hover: hover) and (pointer: fine) {.btn:hover {}}",
    );
    run(
        ".p-index { @media (hover: hover) {.btn:hover {}} }",
        ".p-index { @media (hover: hover) and (pointer: fine) {.btn:hover {}} }",
    );
}

#[test]
fn selector_list_pseudo_classes() {
    run(
        ":is(button, [role=\"button\"]):hover { background-color: transparent; }",
        "@media (hover: hover) and (pointer: fine) {:is(button,[role=\"button\"]):hover { background-color: transparent; } }",
    );
}

#[test]
fn hover_inside_not_is_ignored() {
    let css = ".list__item:not(:hover, .is-editing) .show-on-hover { visibility: hidden }";
    run(css, css);

    run(".a:NOT(:hover) {}", ".a:NOT(:hover) {}");
}

#[test]
fn numeric_attribute_and_id_selectors() {
    run(
        "a[data-n=1]:hover, #1a:hover {}",
        "@media (hover: hover) and (pointer: fine) {a[data-n=1]:hover, #1a:hover {}\n}",
    );
}

#[test]
fn bare_hover_is_ignored() {
    run(":hover { color: red }", ":hover { color: red }");
}

#[test]
fn surrounding_rules_keep_their_place() {
    run(
        "a {}\n.b:hover, .c { color: red; }\nd {}\n",
        "a {}\n.c { color: red; }\n@media (hover: hover) and (pointer: fine) {\n.b:hover { color: red; } }\nd {}\n",
    );
}

#[test]
fn nested_rule_is_wrapped_in_place() {
    run(
        "@supports (display: grid) {\n  .a:hover { color: red; }\n}",
        "@supports (display: grid) {\n  @media (hover: hover) and (pointer: fine) {\n  .a:hover { color: red; }\n  }\n}",
    );
}

#[test]
fn stylesheet_without_hover_round_trips() {
    let css = "/* base */\n@charset \"utf-8\";\nbody { margin: 0 }\n\n@media print {\n  a:focus { outline: none; }\n}\n";
    run(css, css);
}

#[test]
fn processing_is_idempotent() {
    let inputs = [
        ".a:hover {}",
        ".a:hover, .b { color: red; }",
        "@media (hover: hover) { .x:hover {} }",
        ".p { .q:hover { top: 0 } }",
        ":is(.a, .b):hover, .c:not(:hover) {}",
    ];
    for input in inputs {
        let once = process(input).unwrap();
        let twice = process(&once).unwrap();
        assert_eq!(twice, once, "input: {input}");
    }
}

#[test]
fn every_selector_survives_the_split() {
    let css = process(".a:hover, .b, .c:hover .d, .e:not(:hover) {}").unwrap();
    assert_eq!(
        css,
        ".b, .e:not(:hover) {}@media (hover: hover) and (pointer: fine) {.a:hover, .c:hover .d {}\n}"
    );
}

#[test]
fn invalid_hover_selector_is_an_error() {
    let err = process(".a:hover > {}").unwrap_err();
    match err {
        Error::Selector(selector_err) => {
            assert!(selector_err.to_string().contains(".a:hover >"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
