use html::{FragmentParser, SourceTree};
use std::borrow::Cow;
use std::fmt;

/// Produces the node tree a fragment is compiled from.
pub trait TreeSource {
    fn parse_fragment(&self, markup: &str) -> SourceTree;
}

impl TreeSource for FragmentParser {
    fn parse_fragment(&self, markup: &str) -> SourceTree {
        self.parse(markup)
    }
}

/// A live element that can serialize itself, children included.
pub trait OuterHtml {
    fn outer_html(&self) -> String;
}

/// Input of a compile.
pub enum FragmentSource<'a> {
    Markup(Cow<'a, str>),
    /// Decoded as UTF-8; invalid sequences become U+FFFD.
    Bytes(&'a [u8]),
    /// Compiled from the element's outer markup.
    Element(&'a dyn OuterHtml),
}

impl<'a> FragmentSource<'a> {
    pub fn element(element: &'a dyn OuterHtml) -> Self {
        FragmentSource::Element(element)
    }

    /// Markup from any `Display` value.
    pub fn display(value: &dyn fmt::Display) -> FragmentSource<'static> {
        FragmentSource::Markup(Cow::Owned(value.to_string()))
    }

    pub fn into_markup(self) -> Cow<'a, str> {
        match self {
            FragmentSource::Markup(markup) => markup,
            FragmentSource::Bytes(bytes) => String::from_utf8_lossy(bytes),
            FragmentSource::Element(element) => Cow::Owned(element.outer_html()),
        }
    }
}

impl fmt::Debug for FragmentSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentSource::Markup(markup) => f.debug_tuple("Markup").field(markup).finish(),
            FragmentSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            FragmentSource::Element(_) => f.write_str("Element(..)"),
        }
    }
}

impl<'a> From<&'a str> for FragmentSource<'a> {
    fn from(markup: &'a str) -> Self {
        FragmentSource::Markup(Cow::Borrowed(markup))
    }
}

impl From<String> for FragmentSource<'static> {
    fn from(markup: String) -> Self {
        FragmentSource::Markup(Cow::Owned(markup))
    }
}

impl<'a> From<Cow<'a, str>> for FragmentSource<'a> {
    fn from(markup: Cow<'a, str>) -> Self {
        FragmentSource::Markup(markup)
    }
}

impl<'a> From<&'a [u8]> for FragmentSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        FragmentSource::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FragmentSource<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        FragmentSource::Bytes(bytes)
    }
}
