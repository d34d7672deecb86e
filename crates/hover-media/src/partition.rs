//! Splitting a rule's selectors into the part that moves and the part that stays.

use crate::classify::Classification;

/// What to do with a rule after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// No hover-bearing selector: leave the rule alone.
    Untouched,
    /// Move `hover` into the feature query and keep `non_hover` in place.
    ///
    /// `hover` is never empty; `non_hover` may be.
    Split {
        hover: Vec<String>,
        non_hover: Vec<String>,
    },
}

impl From<Classification> for Partition {
    fn from(classification: Classification) -> Self {
        let Classification {
            hover_selectors,
            non_hover_selectors,
        } = classification;

        if hover_selectors.is_empty() {
            Partition::Untouched
        } else {
            Partition::Split {
                hover: hover_selectors,
                non_hover: non_hover_selectors,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hover_set_is_untouched() {
        let classification = Classification {
            hover_selectors: vec![],
            non_hover_selectors: vec![".a".into()],
        };
        assert_eq!(Partition::from(classification), Partition::Untouched);
    }

    #[test]
    fn split_keeps_both_sides() {
        let classification = Classification {
            hover_selectors: vec![".a:hover".into()],
            non_hover_selectors: vec![],
        };
        assert_eq!(
            Partition::from(classification),
            Partition::Split {
                hover: vec![".a:hover".into()],
                non_hover: vec![],
            }
        );
    }
}
