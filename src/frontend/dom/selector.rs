use super::DomError;
use std::{fmt::Display, str::FromStr};

/// The subset of CSS selectors used by the feedback components: tag names,
/// classes, attribute presence/equality and the descendant and child
/// combinators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// Compounds from left to right, never empty. The combinator of the first
    /// entry is unused.
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub value: Option<String>,
}

impl Compound {
    pub fn matches<'a>(
        &self,
        tag: &str,
        has_class: impl Fn(&str) -> bool,
        attr: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(t) = &self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.classes.iter().all(|c| has_class(c.as_str()))
            && self.attrs.iter().all(|a| match (&a.value, attr(a.name.as_str())) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(expected), Some(actual)) => expected == actual,
            })
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        Parser {
            input,
            chars: input.char_indices().peekable(),
        }
        .selector()
    }

    /// Selector for a single class.
    pub fn class(name: &str) -> Self {
        Selector {
            parts: vec![(
                Combinator::Descendant,
                Compound {
                    classes: vec![name.to_string()],
                    ..Default::default()
                },
            )],
        }
    }

    /// Compounds from left to right, each with the combinator joining it to
    /// the previous one.
    pub fn parts(&self) -> &[(Combinator, Compound)] {
        &self.parts
    }

    /// The rightmost compound, which the matched element itself must satisfy.
    pub fn subject(&self) -> Option<&Compound> {
        self.parts.last().map(|(_, compound)| compound)
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn selector(mut self) -> Result<Selector, DomError> {
        let mut parts = vec![];
        let mut combinator = Combinator::Descendant;
        loop {
            let had_space = self.skip_space();
            match self.chars.peek().map(|(_, c)| *c) {
                None => break,
                Some('>') => {
                    self.chars.next();
                    self.skip_space();
                    combinator = Combinator::Child;
                }
                Some(_) if had_space || parts.is_empty() => {}
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            }
            let compound = self.compound()?;
            parts.push((combinator, compound));
            combinator = Combinator::Descendant;
        }
        if parts.is_empty() {
            return Err(self.error("empty selector"));
        }
        Ok(Selector { parts })
    }

    fn compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        let tag = self.ident();
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '.' => {
                    self.chars.next();
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.error("expected class name"));
                    }
                    compound.classes.push(class);
                }
                '[' => {
                    self.chars.next();
                    compound.attrs.push(self.attr()?);
                }
                _ => break,
            }
        }
        if compound == Compound::default() {
            return Err(self.error("expected tag, class or attribute"));
        }
        Ok(compound)
    }

    fn attr(&mut self) -> Result<AttrMatch, DomError> {
        let name = self.ident();
        if name.is_empty() {
            return Err(self.error("expected attribute name"));
        }
        let value = match self.chars.next() {
            Some((_, ']')) => None,
            Some((_, '=')) => {
                let value = match self.chars.peek() {
                    Some(&(_, q)) if q == '"' || q == '\'' => {
                        self.chars.next();
                        let mut value = String::new();
                        loop {
                            match self.chars.next() {
                                Some((_, c)) if c == q => break,
                                Some((_, c)) => value.push(c),
                                None => return Err(self.error("unterminated string")),
                            }
                        }
                        value
                    }
                    _ => self.ident(),
                };
                match self.chars.next() {
                    Some((_, ']')) => Some(value),
                    _ => return Err(self.error("expected ']'")),
                }
            }
            _ => return Err(self.error("expected ']' or '='")),
        };
        Ok(AttrMatch { name, value })
    }

    fn ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        ident
    }

    fn skip_space(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn error(&mut self, reason: &str) -> DomError {
        let pos = self
            .chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len());
        DomError::InvalidSelector(format!("{reason} at {pos} in '{}'", self.input))
    }
}

/// Write `ident` as a CSS identifier, escaping what the browser would parse
/// differently.
fn write_ident(f: &mut std::fmt::Formatter<'_>, ident: &str) -> std::fmt::Result {
    if ident == "-" {
        return write!(f, "\\-");
    }
    let digit_at = usize::from(ident.starts_with('-'));
    for (i, c) in ident.chars().enumerate() {
        if c.is_control() || (i == digit_at && c.is_ascii_digit()) {
            write!(f, "\\{:x} ", c as u32)?;
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            write!(f, "{c}")?;
        } else {
            write!(f, "\\{c}")?;
        }
    }
    Ok(())
}

/// Write `value` as a double quoted CSS string.
fn write_string(f: &mut std::fmt::Formatter<'_>, value: &str) -> std::fmt::Result {
    write!(f, "\"")?;
    for c in value.chars() {
        match c {
            '"' | '\\' => write!(f, "\\{c}")?,
            c if c.is_control() => write!(f, "\\{:x} ", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl Display for Compound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(tag) = &self.tag {
            write_ident(f, tag)?;
        }
        for class in &self.classes {
            write!(f, ".")?;
            write_ident(f, class)?;
        }
        for attr in &self.attrs {
            write!(f, "[")?;
            write_ident(f, &attr.name)?;
            if let Some(value) = &attr.value {
                write!(f, "=")?;
                write_string(f, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (combinator, compound)) in self.parts.iter().enumerate() {
            if i > 0 {
                match combinator {
                    Combinator::Descendant => write!(f, " ")?,
                    Combinator::Child => write!(f, " > ")?,
                }
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}
