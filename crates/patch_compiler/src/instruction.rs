use crate::identity::Key;
use crate::reconciler::Reconciler;
use std::fmt::Write as _;
use std::sync::Arc;

/// One replay step of a compiled program.
///
/// Instructions own their data and carry no state, so a program can be replayed any
/// number of times against any reconciler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    OpenTag {
        name: Arc<str>,
        key: Key,
        /// Attribute pairs in source order.
        attributes: Vec<(Arc<str>, Arc<str>)>,
    },
    CloseTag {
        name: Arc<str>,
    },
    EmitText {
        content: Arc<str>,
    },
    /// Leave the remaining children of the open element untouched.
    Skip,
}

/// How generated keys appear in a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyDisplay {
    #[default]
    Full,
    /// Generated keys print as `key=*`; explicit keys print in full.
    MaskGenerated,
}

impl Instruction {
    pub fn replay<R: Reconciler + ?Sized>(&self, reconciler: &mut R) -> Result<(), R::Error> {
        match self {
            Instruction::OpenTag {
                name,
                key,
                attributes,
            } => reconciler.open_element(name, key, attributes),
            Instruction::CloseTag { name } => reconciler.close_element(name),
            Instruction::EmitText { content } => reconciler.text(content),
            Instruction::Skip => reconciler.skip(),
        }
    }

    /// One-line listing form, e.g. `open div key="a" class="x"`, `text "hi"`, `close div`.
    pub fn listing_line(&self, keys: KeyDisplay) -> String {
        let mut line = String::new();
        match self {
            Instruction::OpenTag {
                name,
                key,
                attributes,
            } => {
                let _ = write!(line, "open {name}");
                if keys == KeyDisplay::MaskGenerated && key.is_generated() {
                    line.push_str(" key=*");
                } else {
                    let _ = write!(line, " key={:?}", key.as_str());
                }
                for (attr, value) in attributes {
                    let _ = write!(line, " {attr}={:?}", value.as_ref());
                }
            }
            Instruction::CloseTag { name } => {
                let _ = write!(line, "close {name}");
            }
            Instruction::EmitText { content } => {
                let _ = write!(line, "text {:?}", content.as_ref());
            }
            Instruction::Skip => line.push_str("skip"),
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_masks_only_generated_keys() {
        let generated = Instruction::OpenTag {
            name: Arc::from("div"),
            key: Key::generated("9f3a"),
            attributes: vec![(Arc::from("class"), Arc::from("a b"))],
        };
        let explicit = Instruction::OpenTag {
            name: Arc::from("span"),
            key: Key::explicit("x"),
            attributes: vec![(Arc::from("id"), Arc::from("x"))],
        };
        assert_eq!(
            generated.listing_line(KeyDisplay::MaskGenerated),
            r#"open div key=* class="a b""#
        );
        assert_eq!(
            generated.listing_line(KeyDisplay::Full),
            r#"open div key="9f3a" class="a b""#
        );
        assert_eq!(
            explicit.listing_line(KeyDisplay::MaskGenerated),
            r#"open span key="x" id="x""#
        );
    }

    #[test]
    fn listing_escapes_text() {
        let text = Instruction::EmitText {
            content: Arc::from("a \"b\"\n"),
        };
        assert_eq!(text.listing_line(KeyDisplay::Full), r#"text "a \"b\"\n""#);
        assert_eq!(Instruction::Skip.listing_line(KeyDisplay::Full), "skip");
        let close = Instruction::CloseTag {
            name: Arc::from("p"),
        };
        assert_eq!(close.listing_line(KeyDisplay::Full), "close p");
    }
}
