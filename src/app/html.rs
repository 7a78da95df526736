//! Tolerant HTML scanning for the document codec.
//!
//! This is not a conforming WHATWG parser; it is the small subset an HTML
//! notepad needs. The tokenizer never fails: anything it cannot make sense
//! of is either skipped (broken markup) or kept as literal text (stray
//! `<`), so opening a malformed file always produces a best-effort
//! document.

/// A single markup token. Text is entity-decoded; tag and attribute names
/// are lowercased.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
}

impl Token {
    /// Attribute lookup on start tags. Returns `None` for other tokens.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Token::Start { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Elements whose content is raw text we do not edit; their bodies are
/// dropped entirely on input.
fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style" | "title")
}

/// Scan `html` into a token stream. Comments, doctypes and processing
/// instructions are consumed and dropped.
pub fn tokenize(html: &str) -> Vec<Token> {
    let bytes = html.as_bytes();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;
    let mut text_start = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' && is_markup_start(bytes, i) {
            if i > text_start {
                push_text(&mut tokens, &html[text_start..i]);
            }
            i = consume_markup(html, i, &mut tokens);
            text_start = i;
        } else {
            i += 1;
        }
    }
    if bytes.len() > text_start {
        push_text(&mut tokens, &html[text_start..]);
    }
    tokens
}

fn is_markup_start(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i + 1) {
        Some(b'!') | Some(b'?') | Some(b'/') => true,
        Some(c) => c.is_ascii_alphabetic(),
        None => false,
    }
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    tokens.push(Token::Text(decode_entities(raw)));
}

/// Consume one piece of markup starting at the `<` at `start`, pushing a
/// token when one results. Returns the position to resume scanning from.
fn consume_markup(html: &str, start: usize, tokens: &mut Vec<Token>) -> usize {
    let rest = &html[start..];
    if rest.starts_with("<!--") {
        return match rest[4..].find("-->") {
            Some(p) => start + 4 + p + 3,
            None => html.len(),
        };
    }
    if rest.starts_with("<!") || rest.starts_with("<?") {
        return match rest.find('>') {
            Some(p) => start + p + 1,
            None => html.len(),
        };
    }

    match scan_tag(html, start) {
        Some((token, next)) => {
            let raw_until = match &token {
                Token::Start { name, .. } if is_raw_text_element(name) => Some(name.clone()),
                _ => None,
            };
            tokens.push(token);
            match raw_until {
                Some(name) => skip_raw_text(html, next, &name),
                None => next,
            }
        }
        // Unterminated tag: discard the rest of the input.
        None => html.len(),
    }
}

/// Skip the body of a raw-text element, stopping at its end tag (which is
/// left for the normal scan) or end of input.
fn skip_raw_text(html: &str, from: usize, name: &str) -> usize {
    let needle = format!("</{}", name);
    let lower = html[from..].to_ascii_lowercase();
    match lower.find(&needle) {
        Some(p) => from + p,
        None => html.len(),
    }
}

/// Parse a start or end tag beginning at the `<` at `start`. Returns the
/// token and the position just past the closing `>`, or `None` if the tag
/// never closes.
fn scan_tag(html: &str, start: usize) -> Option<(Token, usize)> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') => {
                i += 1;
            }
            Some(_) => {
                let (attr, next) = scan_attr(html, i)?;
                if !closing {
                    attrs.push(attr);
                }
                i = next;
            }
        }
    }

    let token = if closing {
        Token::End { name }
    } else {
        Token::Start { name, attrs }
    };
    Some((token, i))
}

fn scan_attr(html: &str, start: usize) -> Option<((String, String), usize)> {
    let bytes = html.as_bytes();
    let mut i = start;
    let name_start = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/') {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return Some(((name, String::new()), i));
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let value = match bytes.get(i) {
        Some(&q) if q == b'"' || q == b'\'' => {
            i += 1;
            let value_start = i;
            while i < bytes.len() && bytes[i] != q {
                i += 1;
            }
            if i >= bytes.len() {
                return None;
            }
            let raw = &html[value_start..i];
            i += 1;
            decode_entities(raw)
        }
        _ => {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
            decode_entities(&html[value_start..i])
        }
    };
    Some(((name, value), i))
}

/// Decode the character references an HTML notepad actually meets.
/// Unrecognized references are kept literally.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one_entity(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one_entity(s: &str) -> Option<(String, usize)> {
    // References we handle are short; give up past a dozen chars.
    let semi = s
        .char_indices()
        .take(12)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let body = &s[1..semi];
    let decoded = match body {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "quot" => "\"".to_string(),
        "apos" => "'".to_string(),
        // U+00A0 so the document builder can tell it from collapsible
        // whitespace.
        "nbsp" => "\u{a0}".to_string(),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?.to_string()
        }
    };
    Some((decoded, semi + 1))
}

/// Escape text content for serialization.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str) -> Token {
        Token::Start {
            name: name.to_string(),
            attrs: vec![],
        }
    }

    fn end(name: &str) -> Token {
        Token::End {
            name: name.to_string(),
        }
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn test_simple_document() {
        let tokens = tokenize("<html><body><p>Hi</p></body></html>");
        assert_eq!(
            tokens,
            vec![
                start("html"),
                start("body"),
                start("p"),
                text("Hi"),
                end("p"),
                end("body"),
                end("html"),
            ]
        );
    }

    #[test]
    fn test_attributes() {
        let tokens = tokenize(r#"<p align="center"><font color=red face='Courier'>x</font></p>"#);
        assert_eq!(tokens[0].attr("align"), Some("center"));
        assert_eq!(tokens[1].attr("color"), Some("red"));
        assert_eq!(tokens[1].attr("face"), Some("Courier"));
        assert_eq!(tokens[1].attr("size"), None);
    }

    #[test]
    fn test_names_are_lowercased() {
        let tokens = tokenize("<B Class=x>y</B>");
        assert_eq!(tokens[0].attr("class"), Some("x"));
        assert_eq!(tokens[2], end("b"));
    }

    #[test]
    fn test_comments_and_doctype_dropped() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -->a<!---->b");
        assert_eq!(tokens, vec![text("a"), text("b")]);
    }

    #[test]
    fn test_script_and_style_bodies_dropped() {
        let tokens = tokenize("<style>p { color: red; }</style><p>a</p><script>if (1 < 2) {}</script>");
        assert_eq!(
            tokens,
            vec![
                start("style"),
                end("style"),
                start("p"),
                text("a"),
                end("p"),
                start("script"),
                end("script"),
            ]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        let tokens = tokenize("a<br/>b");
        assert_eq!(tokens, vec![text("a"), start("br"), text("b")]);
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let tokens = tokenize("1 < 2");
        assert_eq!(tokens, vec![text("1 < 2")]);
    }

    #[test]
    fn test_unterminated_tag_discards_tail() {
        let tokens = tokenize("a<b c");
        assert_eq!(tokens, vec![text("a")]);
    }

    #[test]
    fn test_unterminated_comment() {
        let tokens = tokenize("a<!-- b");
        assert_eq!(tokens, vec![text("a")]);
    }

    #[test]
    fn test_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&quot;x&quot; &apos;y&apos;"), "\"x\" 'y'");
        assert_eq!(decode_entities("x&nbsp;y"), "x\u{a0}y");
        assert_eq!(decode_entities("&#72;&#105;"), "Hi");
        assert_eq!(decode_entities("&#x48;&#x69;"), "Hi");
    }

    #[test]
    fn test_unknown_entity_kept_literal() {
        assert_eq!(decode_entities("&bogus; & done"), "&bogus; & done");
    }

    #[test]
    fn test_escape_round_trip() {
        let original = "a & b < c > d";
        assert_eq!(decode_entities(&escape_text(original)), original);
    }
}
