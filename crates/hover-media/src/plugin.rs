//! The hover-media stylesheet visitor.

use hover_media_core::{NodeId, Stylesheet, Visitor};

use crate::classify::{classify, mentions_hover};
use crate::logging::targets;
use crate::media::{is_inside_hover_media_query, upgrade_legacy_media};
use crate::mutate::split_rule;
use crate::partition::Partition;
use crate::Error;

/// Visitor that moves hover rules into `@media (hover: hover) and
/// (pointer: fine)` and upgrades plain `@media (hover: hover)` blocks.
///
/// ```
/// use hover_media::HoverMediaFix;
/// use hover_media_core::{parse, ParseOptions};
///
/// let mut sheet = parse(".a:hover, .b {}", &ParseOptions::default())?;
/// let mut plugin = HoverMediaFix::new();
/// sheet.walk(&mut plugin)?;
///
/// assert_eq!(plugin.rewritten(), 1);
/// assert_eq!(
///     sheet.to_css(),
///     ".b {}@media (hover: hover) and (pointer: fine) {.a:hover {}\n}"
/// );
/// # Ok::<(), hover_media::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HoverMediaFix {
    rewritten: usize,
    upgraded: usize,
}

impl HoverMediaFix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules moved into a feature query so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// Number of `@media (hover: hover)` blocks upgraded so far.
    pub fn upgraded(&self) -> usize {
        self.upgraded
    }
}

impl Visitor for HoverMediaFix {
    type Error = Error;

    fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), Error> {
        let Some(selector) = sheet.selector(rule) else {
            return Ok(());
        };
        if !mentions_hover(selector) {
            return Ok(());
        }
        if is_inside_hover_media_query(sheet, rule) {
            tracing::trace!(target: targets::PLUGIN, selector, "already inside hover media query");
            return Ok(());
        }

        let classification = classify(selector).inspect_err(|err| {
            let location = sheet.source(rule).map(ToString::to_string).unwrap_or_default();
            tracing::warn!(target: targets::PLUGIN, %location, %err, "cannot parse rule selector");
        })?;

        match Partition::from(classification) {
            Partition::Untouched => {
                tracing::trace!(target: targets::PLUGIN, selector, "no eligible :hover");
            }
            Partition::Split { hover, non_hover } => {
                split_rule(sheet, rule, &hover, &non_hover);
                self.rewritten += 1;
                tracing::debug!(
                    target: targets::PLUGIN,
                    hover = ?hover,
                    remaining = ?non_hover,
                    "moved hover selectors into media query"
                );
            }
        }
        Ok(())
    }

    fn visit_at_rule(&mut self, sheet: &mut Stylesheet, at_rule: NodeId) -> Result<(), Error> {
        if upgrade_legacy_media(sheet, at_rule) {
            self.upgraded += 1;
            tracing::debug!(target: targets::PLUGIN, "upgraded @media (hover: hover)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hover_media_core::{parse, ParseOptions};
    use pretty_assertions::assert_eq;

    fn run(css: &str) -> (String, HoverMediaFix) {
        let mut sheet = parse(css, &ParseOptions::default()).unwrap();
        let mut plugin = HoverMediaFix::new();
        sheet.walk(&mut plugin).unwrap();
        (sheet.to_css(), plugin)
    }

    #[test]
    fn counts_rewrites_and_upgrades() {
        let (_, plugin) = run(".a:hover {} @media (hover: hover) { .b:hover {} } .c:hover, .d {}");
        assert_eq!(plugin.rewritten(), 2);
        assert_eq!(plugin.upgraded(), 1);
    }

    #[test]
    fn generated_rules_are_not_rewritten_again() {
        let (css, plugin) = run(".a:hover, .b:hover, .c {}");
        assert_eq!(plugin.rewritten(), 1);
        assert_eq!(
            css,
            ".c {}@media (hover: hover) and (pointer: fine) {.a:hover, .b:hover {}\n}"
        );
    }

    #[test]
    fn rules_without_hover_are_left_alone() {
        let (css, plugin) = run(".a:focus { color: red }\n.b {}");
        assert_eq!(plugin.rewritten(), 0);
        assert_eq!(css, ".a:focus { color: red }\n.b {}");
    }

    struct Noop;

    impl Visitor for Noop {
        type Error = Error;
    }

    #[test]
    fn rewrites_a_sheet_walked_before() {
        let mut sheet = parse(".a:hover {}", &ParseOptions::default()).unwrap();
        sheet.walk(&mut Noop).unwrap();

        let mut plugin = HoverMediaFix::new();
        sheet.walk(&mut plugin).unwrap();
        assert_eq!(plugin.rewritten(), 1);
        assert_eq!(sheet.to_css(), "@media (hover: hover) and (pointer: fine) {.a:hover {}\n}");
    }

    #[test]
    fn invalid_selector_stops_the_walk() {
        let mut sheet = parse(".a:hover,, .b {}", &ParseOptions::default()).unwrap();
        let err = sheet.walk(&mut HoverMediaFix::new()).unwrap_err();
        assert!(matches!(err, Error::Selector(_)));
    }
}
