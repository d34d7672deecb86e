//! The hover feature query: synthesis, containment check and upgrade.

use hover_media_core::{NodeId, NodeType, Stylesheet};

/// Params of the feature query hover rules are wrapped in.
pub const MEDIA_PARAMS: &str = "(hover: hover) and (pointer: fine)";

/// Params of a plain hover query, upgraded to [`MEDIA_PARAMS`].
pub const LEGACY_MEDIA_PARAMS: &str = "(hover: hover)";

/// Build a detached `@media` block holding a copy of `rule` restricted to
/// `hover_selectors`.
///
/// The block takes over the rule's source position.
pub fn create_media_query(sheet: &mut Stylesheet, rule: NodeId, hover_selectors: &[String]) -> NodeId {
    let media = sheet.create_at_rule("media", MEDIA_PARAMS);
    let source = sheet.source(rule).cloned();
    sheet.set_source(media, source);

    let hover_rule = sheet.clone_node(rule);
    sheet.set_selectors(hover_rule, hover_selectors);
    sheet.append(media, hover_rule);
    media
}

/// Whether any at-rule between `rule` and the root already has
/// [`MEDIA_PARAMS`].
pub fn is_inside_hover_media_query(sheet: &Stylesheet, rule: NodeId) -> bool {
    sheet.ancestors(rule).any(|ancestor| {
        sheet.node_type(ancestor) == NodeType::AtRule
            && sheet
                .at_rule(ancestor)
                .is_some_and(|at_rule| at_rule.params == MEDIA_PARAMS)
    })
}

/// Rewrite `@media (hover: hover)` to the full hover query.
///
/// Returns whether the at-rule was changed. Its children are not touched.
pub fn upgrade_legacy_media(sheet: &mut Stylesheet, at_rule: NodeId) -> bool {
    match sheet.at_rule_mut(at_rule) {
        Some(media) if media.name == "media" && media.params == LEGACY_MEDIA_PARAMS => {
            media.params = MEDIA_PARAMS.to_string();
            true
        }
        _ => false,
    }
}
