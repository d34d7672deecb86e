//! Selector type definitions.
//!
//! The `Display` impls produce the strict rendering: no comments, a single
//! space for the descendant combinator, and no spaces around other
//! combinators or between the items of a nested selector list.

use std::fmt;

/// A comma-separated list of selectors (e.g. `.a:hover, .b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

impl SelectorList {
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// A complex selector: compound selectors joined by combinators.
///
/// A selector may start with a combinator (a relative selector such as the
/// `> a` in `:has(> a)` or in a nested rule).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selector {
    pub components: Vec<Component>,
}

impl Selector {
    /// Visit every pseudo-class in this selector, including those nested in
    /// the selector arguments of functional pseudos.
    ///
    /// The callback receives the pseudo-class name and the names of the
    /// functional pseudos enclosing it, outermost first.
    pub fn walk_pseudo_classes<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a str, &[&'a str]),
    {
        let mut enclosing = Vec::new();
        walk_components(&self.components, &mut enclosing, f);
    }
}

fn walk_components<'a, F>(components: &'a [Component], enclosing: &mut Vec<&'a str>, f: &mut F)
where
    F: FnMut(&'a str, &[&'a str]),
{
    for component in components {
        let pseudo = match component {
            Component::PseudoClass(pseudo) => {
                f(pseudo.name.as_str(), enclosing.as_slice());
                pseudo
            }
            Component::PseudoElement(pseudo) => pseudo,
            _ => continue,
        };
        if let Some(PseudoArgument::Selectors(list)) = &pseudo.argument {
            enclosing.push(pseudo.name.as_str());
            for selector in &list.selectors {
                walk_components(&selector.components, enclosing, f);
            }
            enclosing.pop();
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in &self.components {
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// One piece of a complex selector.
///
/// Names are kept as written in the source, escapes included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    /// Type selector, optionally namespaced (`a`, `svg|a`).
    Type(String),
    /// Universal selector, optionally namespaced (`*`, `ns|*`).
    Universal(String),
    /// Nesting selector (`&`).
    Nesting,
    /// Class selector; the name excludes the `.`.
    Class(String),
    /// ID selector; the name excludes the `#`.
    Id(String),
    Attribute(AttributeSelector),
    /// `:name` or `:name(...)`.
    PseudoClass(Pseudo),
    /// `::name` or `::name(...)`.
    PseudoElement(Pseudo),
    Combinator(Combinator),
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Type(name) | Component::Universal(name) => write!(f, "{name}"),
            Component::Nesting => write!(f, "&"),
            Component::Class(name) => write!(f, ".{name}"),
            Component::Id(name) => write!(f, "#{name}"),
            Component::Attribute(attribute) => write!(f, "{attribute}"),
            Component::PseudoClass(pseudo) => write!(f, ":{pseudo}"),
            Component::PseudoElement(pseudo) => write!(f, "::{pseudo}"),
            Component::Combinator(combinator) => write!(f, "{combinator}"),
        }
    }
}

/// Combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (whitespace).
    Descendant,
    /// Child combinator (`>`).
    Child,
    /// Next-sibling combinator (`+`).
    NextSibling,
    /// Subsequent-sibling combinator (`~`).
    SubsequentSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Descendant => write!(f, " "),
            Combinator::Child => write!(f, ">"),
            Combinator::NextSibling => write!(f, "+"),
            Combinator::SubsequentSibling => write!(f, "~"),
        }
    }
}

/// A pseudo-class or pseudo-element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pseudo {
    /// Name without colons, as written.
    pub name: String,
    /// Argument of a functional pseudo; `None` when there are no parentheses.
    pub argument: Option<PseudoArgument>,
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match &self.argument {
            Some(PseudoArgument::Selectors(list)) => write!(f, "({list})"),
            Some(PseudoArgument::Raw(raw)) => write!(f, "({raw})"),
            None => Ok(()),
        }
    }
}

/// The argument of a functional pseudo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoArgument {
    /// A nested selector list (`:is(a, b)`, `:not(.x)`).
    Selectors(SelectorList),
    /// Any other argument (`:nth-child(2n+1)`, `:lang(en)`), compacted.
    Raw(String),
}

/// Attribute selector (e.g. `[role="button" i]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Attribute name, optionally namespaced.
    pub name: String,
    /// Operator and value; the value keeps its quotes as written.
    pub matcher: Option<(AttributeOperator, String)>,
    /// Case-sensitivity modifier (`i` or `s`).
    pub modifier: Option<String>,
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.name)?;
        if let Some((operator, value)) = &self.matcher {
            write!(f, "{operator}{value}")?;
        }
        if let Some(modifier) = &self.modifier {
            let quoted = self
                .matcher
                .as_ref()
                .is_some_and(|(_, value)| value.ends_with(['"', '\'']));
            if quoted {
                write!(f, "{modifier}")?;
            } else {
                write!(f, " {modifier}")?;
            }
        }
        write!(f, "]")
    }
}

/// Attribute matching operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl fmt::Display for AttributeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        };
        f.write_str(operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> Component {
        Component::Class(name.into())
    }

    fn pseudo(name: &str, argument: Option<PseudoArgument>) -> Component {
        Component::PseudoClass(Pseudo {
            name: name.into(),
            argument,
        })
    }

    #[test]
    fn selector_display() {
        let selector = Selector {
            components: vec![
                class("a"),
                Component::Combinator(Combinator::Descendant),
                class("b"),
                Component::Combinator(Combinator::Child),
                class("c"),
                pseudo("hover", None),
            ],
        };
        assert_eq!(selector.to_string(), ".a .b>.c:hover");
    }

    #[test]
    fn nested_list_display() {
        let list = SelectorList {
            selectors: vec![
                Selector {
                    components: vec![Component::Type("button".into())],
                },
                Selector {
                    components: vec![Component::Attribute(AttributeSelector {
                        name: "role".into(),
                        matcher: Some((AttributeOperator::Equals, "\"button\"".into())),
                        modifier: None,
                    })],
                },
            ],
        };
        let selector = Selector {
            components: vec![
                pseudo("is", Some(PseudoArgument::Selectors(list))),
                pseudo("hover", None),
            ],
        };
        assert_eq!(selector.to_string(), ":is(button,[role=\"button\"]):hover");
    }

    #[test]
    fn walk_reports_enclosing_pseudos() {
        let inner = SelectorList {
            selectors: vec![Selector {
                components: vec![pseudo("hover", None)],
            }],
        };
        let selector = Selector {
            components: vec![
                class("x"),
                pseudo("not", Some(PseudoArgument::Selectors(inner))),
                pseudo("focus", None),
            ],
        };

        let mut seen = Vec::new();
        selector.walk_pseudo_classes(&mut |name, enclosing| {
            seen.push(format!("{name} in {enclosing:?}"));
        });
        assert_eq!(seen, vec!["not in []", "hover in [\"not\"]", "focus in []"]);
    }
}
