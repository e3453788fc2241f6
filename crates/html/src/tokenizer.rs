//! Fragment tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`, lowercased on output.
//! Attribute names use the same class.
//!
//! Known limitations:
//! - Not an HTML5 state machine; there is no parse-error recovery beyond skipping bytes.
//! - Only `script` and `style` are raw text; `textarea`/`title` are tokenized as markup.
//! - Raw text close-tag scanning accepts only ASCII whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Whether `name` reads back as this exact tag name: an ASCII letter, then name
/// characters, all lowercase.
pub fn is_tag_name(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_alphabetic) && is_attribute_name(name)
}

/// Whether `name` reads back as this exact attribute name.
pub fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| is_name_byte(b) && !b.is_ascii_uppercase())
}

/// Whether `text` written verbatim inside `element` would close it early. Only `script`
/// and `style` bodies are raw; for any other element this is `false`.
pub fn ends_raw_text(element: &str, text: &str) -> bool {
    let close_tag = match element {
        "script" => SCRIPT_CLOSE_TAG,
        "style" => STYLE_CLOSE_TAG,
        _ => return false,
    };
    find_rawtext_close_tag(text.as_bytes(), close_tag).is_some()
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(needle))
}

/// Finds `</script` / `</style` (any case, optional ASCII whitespace, then `>`).
/// Returns `(start_of_close_tag, end_after_gt)` relative to `haystack`.
fn find_rawtext_close_tag(haystack: &[u8], close_tag: &[u8]) -> Option<(usize, usize)> {
    debug_assert!(close_tag.starts_with(b"</"));
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= haystack.len() {
        i += memchr(b'<', &haystack[i..])?;
        if starts_with_ignore_ascii_case_at(haystack, i, close_tag) {
            let mut k = i + n;
            while k < haystack.len() && haystack[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < haystack.len() && haystack[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Single-pass cursor over the input.
///
/// Invariant: `pos` only ever stops on ASCII structural bytes or after ASCII-only runs, so
/// every slice taken from `input` sits on UTF-8 character boundaries.
pub struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            out: Vec::new(),
        }
    }

    pub fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] != b'<' {
                self.text_run();
            } else if self.input[self.pos..].starts_with(COMMENT_START) {
                self.comment();
            } else if starts_with_ignore_ascii_case_at(self.bytes, self.pos, b"<!doctype") {
                if !self.doctype() {
                    break;
                }
            } else if self.bytes.get(self.pos + 1) == Some(&b'/') {
                self.end_tag();
            } else if self
                .bytes
                .get(self.pos + 1)
                .is_some_and(u8::is_ascii_alphabetic)
            {
                if let Some((name, close_tag)) = self.start_tag()
                    && !self.rawtext(name, close_tag)
                {
                    break;
                }
            } else {
                // A lone `<` is literal text.
                self.push_text("<");
                self.pos += 1;
            }
        }
        self.out
    }

    fn push_text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if decoded.is_empty() {
            return;
        }
        if let Some(Token::Text(prev)) = self.out.last_mut() {
            prev.push_str(&decoded);
        } else {
            self.out.push(Token::Text(decoded));
        }
    }

    fn text_run(&mut self) {
        let start = self.pos;
        let end = memchr(b'<', &self.bytes[start..]).map_or(self.bytes.len(), |rel| start + rel);
        self.pos = end;
        let raw = &self.input[start..end];
        self.push_text(raw);
    }

    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        match self.input[body_start..].find(COMMENT_END) {
            Some(rel) => {
                let body = &self.input[body_start..body_start + rel];
                self.out.push(Token::Comment(body.to_string()));
                self.pos = body_start + rel + COMMENT_END.len();
            }
            None => {
                self.out
                    .push(Token::Comment(self.input[body_start..].to_string()));
                self.pos = self.bytes.len();
            }
        }
    }

    /// Returns false when the doctype is unterminated (the rest of input is dropped).
    fn doctype(&mut self) -> bool {
        let rest = &self.input[self.pos + 2..];
        let Some(end) = rest.find('>') else {
            return false;
        };
        self.out.push(Token::Doctype(rest[..end].trim().to_string()));
        self.pos += 2 + end + 1;
        true
    }

    fn scan_name(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }
        &input[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.scan_name().to_ascii_lowercase();
        let bytes = self.bytes;
        let here = self.pos;
        self.pos = memchr(b'>', &bytes[here..]).map_or(bytes.len(), |rel| here + rel + 1);
        if !name.is_empty() {
            self.out.push(Token::EndTag(name));
        }
    }

    /// Emits a start tag. Returns the element name and its close tag when the body must be
    /// scanned verbatim.
    fn start_tag(&mut self) -> Option<(String, &'static [u8])> {
        self.pos += 1;
        let name = self.scan_name().to_ascii_lowercase();
        let mut attributes: Vec<(String, Option<String>)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let Some(&b) = self.bytes.get(self.pos) else {
                break;
            };
            if b == b'>' {
                self.pos += 1;
                break;
            }
            if b == b'/' {
                if self.bytes.get(self.pos + 1) == Some(&b'>') {
                    self_closing = true;
                    self.pos += 2;
                    break;
                }
                self.pos += 1;
                continue;
            }
            let attr_name = self.scan_name();
            if attr_name.is_empty() {
                // Skip one whole character so the cursor stays on a char boundary.
                let width = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos += width;
                continue;
            }
            let attr_name = attr_name.to_ascii_lowercase();
            self.skip_whitespace();
            let value = if self.bytes.get(self.pos) == Some(&b'=') {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value())
            } else {
                None
            };
            attributes.push((attr_name, value));
        }

        if is_void_element(&name) {
            self_closing = true;
        }
        let close_tag = match name.as_str() {
            "script" if !self_closing => Some(SCRIPT_CLOSE_TAG),
            "style" if !self_closing => Some(STYLE_CLOSE_TAG),
            _ => None,
        };
        let rawtext = close_tag.map(|tag| (name.clone(), tag));
        self.out.push(Token::StartTag {
            name,
            attributes,
            self_closing,
        });
        rawtext
    }

    fn attribute_value(&mut self) -> String {
        match self.bytes.get(self.pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let end = memchr(quote, &self.bytes[start..])
                    .map_or(self.bytes.len(), |rel| start + rel);
                let raw = &self.input[start..end];
                self.pos = (end + 1).min(self.bytes.len());
                decode_entities(raw)
            }
            _ => {
                let start = self.pos;
                while self.pos < self.bytes.len() {
                    let b = self.bytes[self.pos];
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    if b == b'/' && self.bytes.get(self.pos + 1) == Some(&b'>') {
                        break;
                    }
                    self.pos += 1;
                }
                decode_entities(&self.input[start..self.pos])
            }
        }
    }

    /// Returns false when the close tag is missing and the rest of input was consumed.
    fn rawtext(&mut self, name: String, close_tag: &'static [u8]) -> bool {
        let start = self.pos;
        match find_rawtext_close_tag(&self.bytes[start..], close_tag) {
            Some((rel_start, rel_end)) => {
                let body = &self.input[start..start + rel_start];
                if !body.is_empty() {
                    self.out.push(Token::Text(body.to_string()));
                }
                self.out.push(Token::EndTag(name));
                self.pos = start + rel_end;
                true
            }
            None => {
                // Missing close tag: the remainder is the body and the element ends at EOF.
                let body = &self.input[start..];
                if !body.is_empty() {
                    self.out.push(Token::Text(body.to_string()));
                }
                self.out.push(Token::EndTag(name));
                self.pos = self.bytes.len();
                false
            }
        }
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag(name.to_string())
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn tokenize_lowercases_tag_and_attribute_names() {
        let tokens = tokenize("<DiV ID=one Class='a b'>x</DIV>");
        assert_eq!(
            tokens,
            vec![
                start("div", &[("id", Some("one")), ("class", Some("a b"))], false),
                text("x"),
                end("div"),
            ]
        );
    }

    #[test]
    fn tokenize_keeps_boolean_and_empty_attributes_apart() {
        let tokens = tokenize(r#"<input disabled value="">"#);
        assert_eq!(
            tokens,
            vec![start(
                "input",
                &[("disabled", None), ("value", Some(""))],
                true
            )]
        );
    }

    #[test]
    fn tokenize_marks_void_and_explicit_self_closing_tags() {
        let tokens = tokenize("<br><my-widget/><img src=x/>");
        assert_eq!(
            tokens,
            vec![
                start("br", &[], true),
                start("my-widget", &[], true),
                start("img", &[("src", Some("x"))], true),
            ]
        );
    }

    #[test]
    fn tokenize_decodes_entities_in_text_and_values() {
        let tokens = tokenize(r#"<a title="&lt;x&gt;">a &amp; b</a>"#);
        assert_eq!(
            tokens,
            vec![
                start("a", &[("title", Some("<x>"))], false),
                text("a & b"),
                end("a"),
            ]
        );
    }

    #[test]
    fn tokenize_preserves_utf8_around_tags() {
        let tokens = tokenize("¡Hola <b>café</b> 😊");
        assert_eq!(
            tokens,
            vec![
                text("¡Hola "),
                start("b", &[], false),
                text("café"),
                end("b"),
                text(" 😊"),
            ]
        );
    }

    #[test]
    fn tokenize_skips_non_ascii_garbage_inside_tags() {
        let tokens = tokenize("<p é data=naïve>ok</p>");
        assert_eq!(
            tokens,
            vec![
                start("p", &[("data", Some("naïve"))], false),
                text("ok"),
                end("p"),
            ]
        );
    }

    #[test]
    fn tokenize_treats_lone_angle_brackets_as_text() {
        let tokens = tokenize("a < b <3");
        assert_eq!(tokens, vec![text("a < b <3")]);
    }

    #[test]
    fn tokenize_emits_comments_and_doctypes() {
        let tokens = tokenize("<!DOCTYPE html><!-- note --><p></p><!-- open");
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("DOCTYPE html".to_string()),
                Token::Comment(" note ".to_string()),
                start("p", &[], false),
                end("p"),
                Token::Comment(" open".to_string()),
            ]
        );
    }

    #[test]
    fn tokenize_reads_script_body_verbatim() {
        let tokens = tokenize("<script>if (a < b) { x = '&amp;'; }</ScRiPt >done");
        assert_eq!(
            tokens,
            vec![
                start("script", &[], false),
                text("if (a < b) { x = '&amp;'; }"),
                end("script"),
                text("done"),
            ]
        );
    }

    #[test]
    fn rawtext_close_tag_ignores_near_matches() {
        let tokens = tokenize("<style>ok</stylex >no</style>");
        assert_eq!(
            tokens,
            vec![
                start("style", &[], false),
                text("ok</stylex >no"),
                end("style"),
            ]
        );
    }

    #[test]
    fn rawtext_without_close_tag_runs_to_end() {
        let mut body = String::new();
        for _ in 0..10_000 {
            body.push_str("x<y>\n");
        }
        let tokens = tokenize(&format!("<script>{body}"));
        assert_eq!(
            tokens,
            vec![start("script", &[], false), text(&body), end("script")]
        );
    }

    #[test]
    fn name_checks_follow_the_tokenizer() {
        assert!(is_tag_name("h1"));
        assert!(is_tag_name("my-el:x"));
        assert!(!is_tag_name("1h"));
        assert!(!is_tag_name("Div"));
        assert!(!is_tag_name("a b"));
        assert!(!is_tag_name(""));
        assert!(is_attribute_name("data-x"));
        assert!(is_attribute_name("_x"));
        assert!(!is_attribute_name("a=b"));
        assert!(!is_attribute_name("on\"click\""));
    }

    #[test]
    fn raw_text_end_detection() {
        assert!(ends_raw_text("script", "a</SCRIPT >b"));
        assert!(!ends_raw_text("script", "a</script"));
        assert!(!ends_raw_text("script", "</style>"));
        assert!(ends_raw_text("style", "</style>"));
        assert!(!ends_raw_text("div", "</div>"));
    }

    #[test]
    fn tokenize_handles_many_simple_tags_linearly() {
        let input = "<a></a>".repeat(20_000);
        assert_eq!(tokenize(&input).len(), 40_000);
    }

    #[test]
    fn tokenize_handles_tons_of_angle_brackets() {
        let input = "<".repeat(200_000);
        let tokens = tokenize(&input);
        assert_eq!(tokens, vec![text(&input)]);
    }
}
