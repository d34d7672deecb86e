//! Selector classification: which selectors of a rule carry a real `:hover`.

use hover_media_selector::{parse, Selector};

use crate::Result;

/// A rule's selectors split by whether they carry an eligible `:hover`.
///
/// Selectors are in their strict rendering (see [`hover_media_selector`]).
/// Every selector of the list appears in exactly one of the two sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Hover-bearing selectors, in discovery order.
    pub hover_selectors: Vec<String>,
    /// The remaining selectors, in source order.
    pub non_hover_selectors: Vec<String>,
}

/// Cheap pre-check: a selector without the text `:hover` cannot match.
pub fn mentions_hover(selector: &str) -> bool {
    selector.contains(":hover")
}

/// Classify the selectors of a rule.
///
/// A selector is hover-bearing when it contains a `:hover` pseudo-class,
/// at any depth inside functional pseudos such as `:is()` or `:where()`,
/// that is not inside a `:not()` in any letter case. A selector that is just
/// `:hover` is never hover-bearing.
///
/// # Errors
///
/// Returns an error when `selector` is not a valid selector list.
pub fn classify(selector: &str) -> Result<Classification> {
    let list = parse(selector)?;
    let rendered: Vec<String> = list.iter().map(ToString::to_string).collect();

    let mut hover_selectors: Vec<String> = Vec::new();
    for (selector, rendering) in list.iter().zip(&rendered) {
        if is_hover_bearing(selector, rendering) && !hover_selectors.contains(rendering) {
            hover_selectors.push(rendering.clone());
        }
    }

    let non_hover_selectors = rendered
        .into_iter()
        .filter(|rendering| !hover_selectors.contains(rendering))
        .collect();

    Ok(Classification {
        hover_selectors,
        non_hover_selectors,
    })
}

fn is_hover_bearing(selector: &Selector, rendering: &str) -> bool {
    if rendering == ":hover" {
        return false;
    }
    let mut found = false;
    selector.walk_pseudo_classes(&mut |name, enclosing| {
        if name == "hover" && !enclosing.iter().any(|pseudo| pseudo.eq_ignore_ascii_case("not")) {
            found = true;
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hover(selector: &str) -> Vec<String> {
        classify(selector).unwrap().hover_selectors
    }

    #[test]
    fn fast_path() {
        assert!(mentions_hover(".a:hover"));
        assert!(mentions_hover(".a:not(:hover)"));
        assert!(!mentions_hover(".a:focus, .b"));
    }

    #[test]
    fn single_hover_selector() {
        let result = classify(".this-is-a-class:hover").unwrap();
        assert_eq!(result.hover_selectors, vec![".this-is-a-class:hover"]);
        assert!(result.non_hover_selectors.is_empty());
    }

    #[test]
    fn mixed_list_keeps_source_order() {
        let result = classify(".b, .a:hover, .c, .d:hover").unwrap();
        assert_eq!(result.hover_selectors, vec![".a:hover", ".d:hover"]);
        assert_eq!(result.non_hover_selectors, vec![".b", ".c"]);
    }

    #[test]
    fn descendant_selectors_move_whole() {
        assert_eq!(hover(".s-some-scope p a:hover p"), vec![".s-some-scope p a:hover p"]);
        assert_eq!(hover(".js .link:hover .thing"), vec![".js .link:hover .thing"]);
    }

    #[test]
    fn hover_inside_is_and_where() {
        assert_eq!(
            hover(":is(button, [role=\"button\"]):hover"),
            vec![":is(button,[role=\"button\"]):hover"]
        );
        assert_eq!(hover(".nav :is(a:hover, b)"), vec![".nav :is(a:hover,b)"]);
        assert_eq!(hover(":where(.x :is(.y:hover))"), vec![":where(.x :is(.y:hover))"]);
    }

    #[test]
    fn hover_inside_not_is_ignored() {
        let result = classify(".list__item:not(:hover, .is-editing) .show-on-hover").unwrap();
        assert!(result.hover_selectors.is_empty());
        assert_eq!(
            result.non_hover_selectors,
            vec![".list__item:not(:hover,.is-editing) .show-on-hover"]
        );

        assert!(hover(".a:not(:is(.b:hover))").is_empty());
        assert!(hover(".a:NOT(:hover)").is_empty());
        assert!(hover(".a:Not(.b, :is(.c:hover))").is_empty());
    }

    #[test]
    fn hover_next_to_not_is_kept() {
        assert_eq!(hover(".a:not(.b):hover"), vec![".a:not(.b):hover"]);
    }

    #[test]
    fn bare_hover_is_ignored() {
        let result = classify(":hover, .a").unwrap();
        assert!(result.hover_selectors.is_empty());
        assert_eq!(result.non_hover_selectors, vec![":hover", ".a"]);
    }

    #[test]
    fn duplicates_collapse() {
        let result = classify(".a:hover, .a:hover, .b").unwrap();
        assert_eq!(result.hover_selectors, vec![".a:hover"]);
        assert_eq!(result.non_hover_selectors, vec![".b"]);
    }

    #[test]
    fn pseudo_element_after_hover() {
        assert_eq!(hover("a:hover::after"), vec!["a:hover::after"]);
    }

    #[test]
    fn invalid_selector_is_an_error() {
        assert!(classify(".a:hover,,").is_err());
    }
}
