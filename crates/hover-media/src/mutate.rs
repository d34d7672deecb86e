//! Applying a split to the stylesheet tree.

use hover_media_core::{NodeId, Stylesheet};

use crate::media::create_media_query;

/// Move the `hover` selectors of `rule` into a feature query inserted right
/// after it.
///
/// The rule itself is replaced by a copy restricted to `non_hover`, or
/// removed when `non_hover` is empty. Returns the inserted `@media` block.
pub fn split_rule(
    sheet: &mut Stylesheet,
    rule: NodeId,
    hover: &[String],
    non_hover: &[String],
) -> NodeId {
    let media = create_media_query(sheet, rule, hover);
    sheet.insert_after(rule, media);

    if non_hover.is_empty() {
        sheet.remove(rule);
    } else {
        let rest = sheet.clone_node(rule);
        sheet.set_selectors(rest, non_hover);
        sheet.replace_with(rule, rest);
    }
    media
}
