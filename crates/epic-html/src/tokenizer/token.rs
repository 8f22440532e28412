use std::collections::HashSet;
use std::fmt;

/// The tokenizer's only unrecoverable failure.
///
/// Markup mistakes are parse errors that the tokenizer recovers from; bytes that
/// are not UTF-8 cannot be turned into characters at all, so tokenization stops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// The input contains a byte sequence that is not valid UTF-8.
    #[error("html: invalid UTF-8 sequence at byte offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the first invalid byte.
        offset: usize,
    },
}

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A unit of HTML produced by [`HTMLTokenizer`](super::HTMLTokenizer).
///
/// Unlike the character-at-a-time tokens of the standard, runs of characters
/// are coalesced into a single [`Token::Text`], and a start tag carrying the
/// self-closing flag is its own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE ...>`. `data` is everything between the keyword and `>`,
    /// with leading whitespace removed.
    Doctype {
        /// Raw DOCTYPE contents, e.g. `html`.
        data: String,
    },

    /// `<name attr="value">`
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order, duplicates removed.
        attributes: Vec<Attribute>,
    },

    /// `<name attr="value"/>`
    SelfClosingTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order, duplicates removed.
        attributes: Vec<Attribute>,
    },

    /// `</name>`
    EndTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes are parsed on end tags but never rendered.
        attributes: Vec<Attribute>,
    },

    /// A run of character data, exactly as it appeared in the source.
    Text {
        /// The characters.
        data: String,
    },

    /// `<!--data-->`
    Comment {
        /// Comment contents without the delimiters.
        data: String,
    },

    /// Tokenization failed; no tokens follow this one.
    Error(TokenizeError),
}

impl Token {
    /// Create a new DOCTYPE token with empty data.
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            data: String::new(),
        }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a new end tag token with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// The tag name of a start, self-closing or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. }
            | Self::SelfClosingTag { name, .. }
            | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true if this is an [`Token::EndTag`].
    #[must_use]
    pub const fn is_end_tag(&self) -> bool {
        matches!(self, Self::EndTag { .. })
    }

    /// Mutation helpers for use during tokenization.
    /// These panic if called on the wrong token variant, which indicates a bug
    /// in the tokenizer state machine.
    ///
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn append_to_doctype(&mut self, c: char) {
        match self {
            Self::Doctype { data } => data.push(c),
            _ => panic!("append_to_doctype called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. }
            | Self::SelfClosingTag { name, .. }
            | Self::EndTag { name, .. } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    ///
    /// Turns a start tag into a [`Token::SelfClosingTag`]. The flag has no
    /// meaning on end tags, which are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { name, attributes } => {
                *self = Self::SelfClosingTag {
                    name: std::mem::take(name),
                    attributes: std::mem::take(attributes),
                };
            }
            Self::SelfClosingTag { .. } | Self::EndTag { .. } => {}
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// "Append the current input character to the comment token's data."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-comment token, indicating a tokenizer bug.
    pub fn append_to_comment(&mut self, s: &str) {
        match self {
            Self::Comment { data } => data.push_str(s),
            _ => panic!("append_to_comment called on non-comment token"),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn start_new_attribute(&mut self) {
        self.attributes_mut("start_new_attribute")
            .push(Attribute::new(String::new(), String::new()));
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "Append the current input character to the current attribute's name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(attr) = self
            .attributes_mut("append_to_current_attribute_name")
            .last_mut()
        {
            attr.name.push(c);
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    ///
    /// "Append the current input character to the current attribute's value."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        if let Some(attr) = self
            .attributes_mut("append_to_current_attribute_value")
            .last_mut()
        {
            attr.value.push(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error and the new attribute
    /// must be removed from the token."
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        match self {
            Self::StartTag { attributes, .. }
            | Self::SelfClosingTag { attributes, .. }
            | Self::EndTag { attributes, .. } => {
                attributes.split_last().is_some_and(|(current, earlier)| {
                    earlier.iter().any(|attr| attr.name == current.name)
                })
            }
            _ => false,
        }
    }

    /// Drop every attribute whose name already appeared earlier on the token.
    pub fn remove_duplicate_attributes(&mut self) {
        if let Self::StartTag { attributes, .. }
        | Self::SelfClosingTag { attributes, .. }
        | Self::EndTag { attributes, .. } = self
        {
            let mut seen = HashSet::with_capacity(attributes.len());
            attributes.retain(|attr| seen.insert(attr.name.clone()));
        }
    }

    fn attributes_mut(&mut self, caller: &str) -> &mut Vec<Attribute> {
        match self {
            Self::StartTag { attributes, .. }
            | Self::SelfClosingTag { attributes, .. }
            | Self::EndTag { attributes, .. } => attributes,
            _ => panic!("{caller} called on non-tag token"),
        }
    }
}

/// Writes `name="value"` pairs, or a bare `name` when the value is empty.
fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    for attr in attributes {
        write!(f, " {}", attr.name)?;
        if !attr.value.is_empty() {
            f.write_str("=\"")?;
            for (i, part) in attr.value.split('"').enumerate() {
                if i > 0 {
                    f.write_str("&quot;")?;
                }
                f.write_str(part)?;
            }
            f.write_str("\"")?;
        }
    }
    Ok(())
}

/// Renders the token back to HTML.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { data } if data.is_empty() => f.write_str("<!DOCTYPE>"),
            Self::Doctype { data } => write!(f, "<!DOCTYPE {data}>"),
            Self::StartTag { name, attributes } => {
                write!(f, "<{name}")?;
                write_attributes(f, attributes)?;
                f.write_str(">")
            }
            Self::SelfClosingTag { name, attributes } => {
                write!(f, "<{name}")?;
                write_attributes(f, attributes)?;
                f.write_str("/>")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Text { data } => f.write_str(data),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Error(_) => Ok(()),
        }
    }
}
