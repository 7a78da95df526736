//! The rich document model.
//!
//! A `RichDocument` is flat text plus a run-length list of styled spans and
//! one alignment per paragraph. All positions are byte offsets into the
//! text, matching FLTK `TextBuffer` positions, so the model can mirror the
//! editor buffer edit-for-edit. The HTML codec lives here too: `from_html`
//! builds a document from a token stream, `to_html` emits the minimal
//! markup that parses back to the same document.

use std::ops::Range;

use fltk::enums::{Color, Font};
use fltk::text::StyleTableEntry;

use super::html::{self, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextColor {
    #[default]
    Black,
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
    Huge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharStyle {
    pub bold: bool,
    pub italic: bool,
    pub color: TextColor,
    pub family: FontFamily,
    pub size: FontSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A run of identically styled bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub len: usize,
    pub style: CharStyle,
}

/// Styles captured for undo of formatting commands. The text is unchanged
/// by those, so spans and alignments are all that needs restoring.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSnapshot {
    spans: Vec<Span>,
    aligns: Vec<Alignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RichDocument {
    text: String,
    spans: Vec<Span>,
    aligns: Vec<Alignment>,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RichDocument {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            spans: Vec::new(),
            aligns: vec![Alignment::default()],
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.aligns
    }

    /// Paragraph index containing byte position `pos`.
    fn line_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len());
        self.text[..pos].matches('\n').count()
    }

    // --- Edit mirroring ---

    /// Mirror a text insertion. The inserted bytes take the style of the
    /// byte to their left (left affinity, like typing after styled text);
    /// at position 0 they take the style of the old first byte.
    pub fn insert(&mut self, pos: usize, s: &str) {
        if s.is_empty() {
            return;
        }
        let pos = pos.min(self.text.len());

        let line = self.line_of(pos);
        let new_lines = s.matches('\n').count();
        if new_lines > 0 {
            let align = self.aligns[line];
            for _ in 0..new_lines {
                self.aligns.insert(line + 1, align);
            }
        }

        self.text.insert_str(pos, s);

        if self.spans.is_empty() {
            self.spans.push(Span {
                len: s.len(),
                style: CharStyle::default(),
            });
            return;
        }
        let mut off = 0;
        for span in &mut self.spans {
            let end = off + span.len;
            if pos == 0 || (pos > off && pos <= end) {
                span.len += s.len();
                return;
            }
            off = end;
        }
        // pos past the end of the pre-insert text
        if let Some(last) = self.spans.last_mut() {
            last.len += s.len();
        }
    }

    /// Mirror a text deletion of `len` bytes at `pos`.
    pub fn delete(&mut self, pos: usize, len: usize) {
        if len == 0 || pos >= self.text.len() {
            return;
        }
        let end = (pos + len).min(self.text.len());

        let line = self.line_of(pos);
        let removed_lines = self.text[pos..end].matches('\n').count();
        for _ in 0..removed_lines {
            self.aligns.remove(line + 1);
        }

        self.text.replace_range(pos..end, "");

        let mut new_spans = Vec::with_capacity(self.spans.len());
        let mut off = 0;
        for span in self.spans.drain(..) {
            let s_start = off;
            let s_end = off + span.len;
            off = s_end;
            let cut = s_end.min(end).saturating_sub(s_start.max(pos));
            let keep = span.len - cut;
            if keep > 0 {
                new_spans.push(Span {
                    len: keep,
                    style: span.style,
                });
            }
        }
        self.spans = new_spans;
        self.coalesce();
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            match merged.last_mut() {
                Some(last) if last.style == span.style => last.len += span.len,
                _ => merged.push(span),
            }
        }
        self.spans = merged;
    }

    // --- Formatting ---

    /// Apply a character-style change to the byte range `start..end`.
    pub fn apply_char_style<F: Fn(&mut CharStyle)>(&mut self, start: usize, end: usize, f: F) {
        let end = end.min(self.text.len());
        if start >= end {
            return;
        }
        let mut new_spans = Vec::with_capacity(self.spans.len() + 2);
        let mut off = 0;
        for span in self.spans.drain(..) {
            let s_start = off;
            let s_end = off + span.len;
            off = s_end;
            let o_start = s_start.max(start);
            let o_end = s_end.min(end);
            if o_start >= o_end {
                new_spans.push(span);
                continue;
            }
            if o_start > s_start {
                new_spans.push(Span {
                    len: o_start - s_start,
                    style: span.style,
                });
            }
            let mut styled = span.style;
            f(&mut styled);
            new_spans.push(Span {
                len: o_end - o_start,
                style: styled,
            });
            if s_end > o_end {
                new_spans.push(Span {
                    len: s_end - o_end,
                    style: span.style,
                });
            }
        }
        self.spans = new_spans;
        self.coalesce();
    }

    /// Set the alignment of every paragraph touched by `start..=end`.
    pub fn set_alignment(&mut self, start: usize, end: usize, align: Alignment) {
        let first = self.line_of(start);
        let last = self.line_of(end);
        for line in first..=last.min(self.aligns.len() - 1) {
            self.aligns[line] = align;
        }
    }

    pub fn styles(&self) -> StyleSnapshot {
        StyleSnapshot {
            spans: self.spans.clone(),
            aligns: self.aligns.clone(),
        }
    }

    /// Restore a snapshot taken by [`styles`](Self::styles). Only valid
    /// while the text is byte-identical to when the snapshot was taken,
    /// which the undo sequencing guarantees.
    pub fn restore_styles(&mut self, snapshot: StyleSnapshot) {
        debug_assert_eq!(
            snapshot.spans.iter().map(|s| s.len).sum::<usize>(),
            self.text.len()
        );
        self.spans = snapshot.spans;
        self.aligns = snapshot.aligns;
    }

    // --- View support ---

    /// Styled runs intersecting `start..end`, clipped to it.
    pub fn runs(&self, start: usize, end: usize) -> Vec<(Range<usize>, CharStyle)> {
        let mut out = Vec::new();
        let mut off = 0;
        for span in &self.spans {
            let s_start = off;
            let s_end = off + span.len;
            off = s_end;
            let o_start = s_start.max(start);
            let o_end = s_end.min(end);
            if o_start < o_end {
                out.push((o_start..o_end, span.style));
            }
        }
        out
    }

    /// One style-table letter per text byte, for
    /// `TextEditor::set_highlight_data`.
    pub fn style_bytes(&self, table: &mut StyleTable) -> String {
        let mut out = String::with_capacity(self.text.len());
        for span in &self.spans {
            let c = table.style_char(span.style);
            for _ in 0..span.len {
                out.push(c);
            }
        }
        out
    }

    fn line_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;
        for (i, b) in self.text.bytes().enumerate() {
            if b == b'\n' {
                ranges.push(start..i);
                start = i + 1;
            }
        }
        ranges.push(start..self.text.len());
        ranges
    }

    // --- HTML codec ---

    /// Build a document from HTML text. Never fails; malformed input
    /// yields whatever the tolerant scan could recover.
    pub fn from_html(input: &str) -> Self {
        let mut builder = Builder::new();
        for token in html::tokenize(input) {
            builder.token(token);
        }
        builder.finish()
    }

    /// Serialize to minimal markup: a single unstyled left-aligned
    /// paragraph is emitted as bare (escaped) text, everything else gets
    /// `<p>` wrappers and inline tags. `from_html(to_html(d))` reproduces
    /// `d`'s serialization exactly.
    pub fn to_html(&self) -> String {
        let lines = self.line_ranges();
        if lines.len() == 1 && self.aligns[0] == Alignment::Left {
            return self.line_html(lines[0].clone());
        }
        let mut parts = Vec::with_capacity(lines.len());
        for (i, range) in lines.iter().enumerate() {
            let body = if range.is_empty() {
                "<br>".to_string()
            } else {
                self.line_html(range.clone())
            };
            let part = match self.aligns.get(i).copied().unwrap_or_default() {
                Alignment::Left => format!("<p>{}</p>", body),
                Alignment::Center => format!("<p align=\"center\">{}</p>", body),
                Alignment::Right => format!("<p align=\"right\">{}</p>", body),
            };
            parts.push(part);
        }
        parts.join("\n")
    }

    /// Serialize as a complete HTML file (the form written on save).
    pub fn to_file_html(&self) -> String {
        format!("<html>\n<body>\n{}\n</body>\n</html>\n", self.to_html())
    }

    fn line_html(&self, range: Range<usize>) -> String {
        let line = &self.text[range.clone()];
        if line.is_empty() {
            return String::new();
        }
        // Spaces at line edges or next to other spaces would collapse on
        // re-parse; those are emitted as &nbsp; so the round trip is exact.
        let bytes = line.as_bytes();
        let protected = |i: usize| -> bool {
            i == 0 || i + 1 == bytes.len() || bytes[i - 1] == b' '
        };
        let mut out = String::new();
        for (run, style) in self.runs(range.start, range.end) {
            let (open, close) = style_tags(&style);
            out.push_str(&open);
            for (i, c) in self.text[run.clone()].char_indices() {
                let line_pos = run.start - range.start + i;
                if c == ' ' && protected(line_pos) {
                    out.push_str("&nbsp;");
                } else {
                    out.push_str(&html::escape_text(&c.to_string()));
                }
            }
            out.push_str(&close);
        }
        out
    }
}

fn style_tags(style: &CharStyle) -> (String, String) {
    let mut open = String::new();
    let mut close = String::new();

    let mut font_attrs = String::new();
    if style.color != TextColor::default() {
        let name = match style.color {
            TextColor::Black => "black",
            TextColor::Red => "red",
            TextColor::Green => "green",
            TextColor::Blue => "blue",
        };
        font_attrs.push_str(&format!(" color=\"{}\"", name));
    }
    if style.family != FontFamily::default() {
        let face = match style.family {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Courier => "Courier",
            FontFamily::Times => "Times",
        };
        font_attrs.push_str(&format!(" face=\"{}\"", face));
    }
    if style.size != FontSize::default() {
        let size = match style.size {
            FontSize::Small => "2",
            FontSize::Normal => "3",
            FontSize::Large => "4",
            FontSize::Huge => "6",
        };
        font_attrs.push_str(&format!(" size=\"{}\"", size));
    }
    if !font_attrs.is_empty() {
        open.push_str(&format!("<font{}>", font_attrs));
    }
    if style.bold {
        open.push_str("<b>");
    }
    if style.italic {
        open.push_str("<i>");
        close.push_str("</i>");
    }
    if style.bold {
        close.push_str("</b>");
    }
    if !font_attrs.is_empty() {
        close.push_str("</font>");
    }
    (open, close)
}

// --- Parse ---

fn parse_color(value: &str) -> Option<TextColor> {
    match value.to_ascii_lowercase().as_str() {
        "black" | "#000000" => Some(TextColor::Black),
        "red" | "#ff0000" => Some(TextColor::Red),
        "green" | "#008000" | "#00ff00" => Some(TextColor::Green),
        "blue" | "#0000ff" => Some(TextColor::Blue),
        _ => None,
    }
}

fn parse_face(value: &str) -> Option<FontFamily> {
    let v = value.to_ascii_lowercase();
    if v.contains("courier") {
        Some(FontFamily::Courier)
    } else if v.contains("times") {
        Some(FontFamily::Times)
    } else if v.contains("helvetica") || v.contains("arial") {
        Some(FontFamily::Helvetica)
    } else {
        None
    }
}

fn parse_size(value: &str) -> Option<FontSize> {
    match value.trim().parse::<i32>().ok()? {
        i32::MIN..=2 => Some(FontSize::Small),
        3 => Some(FontSize::Normal),
        4..=5 => Some(FontSize::Large),
        _ => Some(FontSize::Huge),
    }
}

fn parse_align(value: &str) -> Option<Alignment> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div" | "li" | "blockquote" | "pre" | "tr" | "ul" | "ol" | "table"
    )
}

fn heading_style(name: &str, base: CharStyle) -> Option<CharStyle> {
    let size = match name {
        "h1" | "h2" => FontSize::Huge,
        "h3" | "h4" => FontSize::Large,
        "h5" | "h6" => FontSize::Normal,
        _ => return None,
    };
    let mut style = base;
    style.bold = true;
    style.size = size;
    Some(style)
}

struct Builder {
    text: String,
    spans: Vec<Span>,
    aligns: Vec<Alignment>,
    // (tag name, style in effect inside it); index 0 is a sentinel
    stack: Vec<(String, CharStyle)>,
    pending_space: bool,
    line_len: usize,
    // a block tag opened and nothing has been emitted inside it yet
    block_started: bool,
    // the trailing newline, if any, is a paragraph break rather than an
    // explicit <br> line break
    trailing_break: bool,
}

impl Builder {
    fn new() -> Self {
        Self {
            text: String::new(),
            spans: Vec::new(),
            aligns: vec![Alignment::default()],
            stack: vec![(String::new(), CharStyle::default())],
            pending_space: false,
            line_len: 0,
            block_started: false,
            trailing_break: false,
        }
    }

    fn style(&self) -> CharStyle {
        self.stack.last().map(|(_, s)| *s).unwrap_or_default()
    }

    fn push_char(&mut self, c: char) {
        let style = self.style();
        self.text.push(c);
        let len = c.len_utf8();
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.len += len,
            _ => self.spans.push(Span { len, style }),
        }
        if c == '\n' {
            self.aligns.push(Alignment::default());
            self.line_len = 0;
            self.pending_space = false;
        } else {
            self.line_len += len;
        }
        self.block_started = false;
        self.trailing_break = false;
    }

    fn emit(&mut self, c: char) {
        if self.pending_space && self.line_len > 0 {
            self.push_char(' ');
        }
        self.pending_space = false;
        self.push_char(c);
    }

    fn newline(&mut self) {
        self.push_char('\n');
    }

    fn break_if_content(&mut self) {
        if self.line_len > 0 {
            self.newline();
            self.trailing_break = true;
        }
        self.pending_space = false;
    }

    fn set_current_align(&mut self, align: Alignment) {
        let idx = self.aligns.len() - 1;
        self.aligns[idx] = align;
    }

    fn token(&mut self, token: Token) {
        match &token {
            Token::Text(text) => {
                let text = text.clone();
                for c in text.chars() {
                    match c {
                        ' ' | '\t' | '\n' | '\r' => self.pending_space = true,
                        '\u{a0}' => self.emit(' '),
                        _ => self.emit(c),
                    }
                }
            }
            Token::Start { name, .. } => self.start_tag(name.clone(), &token),
            Token::End { name } => self.end_tag(&name.clone()),
        }
    }

    fn start_tag(&mut self, name: String, token: &Token) {
        let base = self.style();
        match name.as_str() {
            "b" | "strong" => {
                let mut s = base;
                s.bold = true;
                self.stack.push((name, s));
            }
            "i" | "em" => {
                let mut s = base;
                s.italic = true;
                self.stack.push((name, s));
            }
            "u" => self.stack.push((name, base)),
            "font" => {
                let mut s = base;
                if let Some(c) = token.attr("color").and_then(parse_color) {
                    s.color = c;
                }
                if let Some(f) = token.attr("face").and_then(parse_face) {
                    s.family = f;
                }
                if let Some(z) = token.attr("size").and_then(parse_size) {
                    s.size = z;
                }
                self.stack.push((name, s));
            }
            "br" => {
                // A <br> alone at the top of a block stands for an empty
                // paragraph, so its newline is a paragraph break; anywhere
                // else it is an explicit line break.
                let placeholder = self.line_len == 0 && self.block_started;
                self.newline();
                if placeholder {
                    self.trailing_break = true;
                }
            }
            _ if heading_style(&name, base).is_some() => {
                self.break_if_content();
                if let Some(a) = token.attr("align").and_then(parse_align) {
                    self.set_current_align(a);
                }
                let style = heading_style(&name, base).unwrap_or(base);
                self.stack.push((name, style));
                self.block_started = true;
            }
            _ if is_block(&name) => {
                self.break_if_content();
                if let Some(a) = token.attr("align").and_then(parse_align) {
                    self.set_current_align(a);
                }
                self.block_started = true;
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        let is_styling = matches!(name, "b" | "strong" | "i" | "em" | "u" | "font")
            || heading_style(name, CharStyle::default()).is_some();
        if is_styling {
            // Pop to the matching open tag, closing anything left open
            // inside it (tolerates misnested markup).
            if self.stack.iter().skip(1).any(|(n, _)| n == name) {
                while self.stack.len() > 1 {
                    let (popped, _) = self.stack.pop().unwrap_or_default();
                    if popped == name {
                        break;
                    }
                }
            }
            if heading_style(name, CharStyle::default()).is_some() {
                self.break_if_content();
            }
        } else if is_block(name) {
            self.break_if_content();
        }
    }

    fn finish(mut self) -> RichDocument {
        // The newline left behind by the final paragraph block is a
        // separator, not content. Strip that one only; a trailing empty
        // line made by an explicit <br> stays.
        if self.trailing_break && self.text.ends_with('\n') {
            self.text.pop();
            if let Some(last) = self.spans.last_mut() {
                last.len -= 1;
                if last.len == 0 {
                    self.spans.pop();
                }
            }
            if self.aligns.len() > 1 {
                self.aligns.pop();
            }
        }
        RichDocument {
            text: self.text,
            spans: self.spans,
            aligns: self.aligns,
        }
    }
}

// --- FLTK style table ---

/// Interns the distinct `CharStyle`s of a document and hands out the
/// style-table letters FLTK expects, starting at 'A'.
pub struct StyleTable {
    styles: Vec<CharStyle>,
}

/// Letters 'A'..; more distinct styles than this fall back to plain.
const MAX_STYLES: usize = 56;

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTable {
    pub fn new() -> Self {
        Self {
            styles: vec![CharStyle::default()],
        }
    }

    pub fn style_char(&mut self, style: CharStyle) -> char {
        if let Some(i) = self.styles.iter().position(|s| *s == style) {
            return index_char(i);
        }
        if self.styles.len() >= MAX_STYLES {
            return index_char(0);
        }
        self.styles.push(style);
        index_char(self.styles.len() - 1)
    }

    pub fn entries(&self, font_size: i32, dark_mode: bool) -> Vec<StyleTableEntry> {
        self.styles
            .iter()
            .map(|s| StyleTableEntry {
                color: style_color(s.color, dark_mode),
                font: style_font(s),
                size: style_size(s.size, font_size),
            })
            .collect()
    }
}

fn index_char(i: usize) -> char {
    (b'A' + i as u8) as char
}

fn style_font(style: &CharStyle) -> Font {
    match (style.family, style.bold, style.italic) {
        (FontFamily::Helvetica, false, false) => Font::Helvetica,
        (FontFamily::Helvetica, true, false) => Font::HelveticaBold,
        (FontFamily::Helvetica, false, true) => Font::HelveticaItalic,
        (FontFamily::Helvetica, true, true) => Font::HelveticaBoldItalic,
        (FontFamily::Courier, false, false) => Font::Courier,
        (FontFamily::Courier, true, false) => Font::CourierBold,
        (FontFamily::Courier, false, true) => Font::CourierItalic,
        (FontFamily::Courier, true, true) => Font::CourierBoldItalic,
        (FontFamily::Times, false, false) => Font::Times,
        (FontFamily::Times, true, false) => Font::TimesBold,
        (FontFamily::Times, false, true) => Font::TimesItalic,
        (FontFamily::Times, true, true) => Font::TimesBoldItalic,
    }
}

fn style_size(size: FontSize, base: i32) -> i32 {
    match size {
        FontSize::Small => base - 4,
        FontSize::Normal => base,
        FontSize::Large => base + 4,
        FontSize::Huge => base + 8,
    }
}

fn style_color(color: TextColor, dark_mode: bool) -> Color {
    if dark_mode {
        match color {
            TextColor::Black => Color::from_rgb(220, 220, 220),
            TextColor::Red => Color::from_rgb(240, 100, 100),
            TextColor::Green => Color::from_rgb(110, 200, 120),
            TextColor::Blue => Color::from_rgb(120, 160, 255),
        }
    } else {
        match color {
            TextColor::Black => Color::Black,
            TextColor::Red => Color::from_rgb(200, 30, 30),
            TextColor::Green => Color::from_rgb(20, 130, 40),
            TextColor::Blue => Color::from_rgb(30, 60, 200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> CharStyle {
        CharStyle {
            bold: true,
            ..CharStyle::default()
        }
    }

    #[test]
    fn test_empty_document_round_trip() {
        let doc = RichDocument::new();
        assert_eq!(doc.to_html(), "");
        let reparsed = RichDocument::from_html(&doc.to_file_html());
        assert!(reparsed.is_empty());
        assert_eq!(reparsed, RichDocument::new());
    }

    #[test]
    fn test_plain_text_of_simple_file() {
        let doc = RichDocument::from_html("<html><body><p>Hi</p></body></html>");
        assert_eq!(doc.text(), "Hi");
        assert_eq!(doc.to_html(), "Hi");
    }

    #[test]
    fn test_unstyled_paragraph_serializes_bare() {
        let doc = RichDocument::from_html("<p>Hi</p>");
        assert_eq!(doc.to_html(), "Hi");
    }

    #[test]
    fn test_serialize_parse_idempotent() {
        let cases = [
            "",
            "Hi",
            "a  b",
            " leading and trailing ",
            "<p>a</p>\n<p><br></p>\n<p>b</p>",
            "<p>a</p>\n<p><br></p>",
            "<p><br></p>\n<p><br></p>",
            "<b>x</b> and <i>y</i>",
            "<font color=\"red\" size=\"6\"><b>title</b></font>",
            "<p align=\"center\">mid</p>\n<p align=\"right\">end</p>",
        ];
        for case in cases {
            let once = RichDocument::from_html(case).to_html();
            let twice = RichDocument::from_html(&once).to_html();
            assert_eq!(once, twice, "not idempotent for {:?}", case);
        }
    }

    #[test]
    fn test_trailing_empty_line_round_trips() {
        let mut doc = RichDocument::new();
        doc.insert(0, "a\n");
        let html = doc.to_html();
        assert_eq!(html, "<p>a</p>\n<p><br></p>");
        assert_eq!(RichDocument::from_html(&html), doc);
        assert_eq!(RichDocument::from_html(&doc.to_file_html()), doc);
    }

    #[test]
    fn test_document_of_empty_lines_round_trips() {
        let mut doc = RichDocument::new();
        doc.insert(0, "\n");
        let reparsed = RichDocument::from_html(&doc.to_html());
        assert_eq!(reparsed.text(), "\n");
        assert_eq!(reparsed.alignments().len(), 2);
    }

    #[test]
    fn test_explicit_br_line_break_kept() {
        let doc = RichDocument::from_html("a<br>");
        assert_eq!(doc.text(), "a\n");
        let doc = RichDocument::from_html("a<br><br>");
        assert_eq!(doc.text(), "a\n\n");
    }

    #[test]
    fn test_paragraphs_become_newlines() {
        let doc = RichDocument::from_html("<p>a</p><p>b</p><p></p><p>c</p>");
        assert_eq!(doc.text(), "a\nb\nc");
    }

    #[test]
    fn test_whitespace_collapses_but_nbsp_survives() {
        let doc = RichDocument::from_html("<p>a \n\t b</p>");
        assert_eq!(doc.text(), "a b");
        let doc = RichDocument::from_html("a&nbsp;&nbsp;b");
        assert_eq!(doc.text(), "a  b");
    }

    #[test]
    fn test_protected_spaces_round_trip() {
        let mut doc = RichDocument::new();
        doc.insert(0, " a  b ");
        let html = doc.to_html();
        assert_eq!(RichDocument::from_html(&html).text(), " a  b ");
    }

    #[test]
    fn test_inline_styles_parse() {
        let doc = RichDocument::from_html("x<b>y</b>z");
        assert_eq!(doc.text(), "xyz");
        assert_eq!(
            doc.runs(0, 3),
            vec![
                (0..1, CharStyle::default()),
                (1..2, bold()),
                (2..3, CharStyle::default()),
            ]
        );
    }

    #[test]
    fn test_misnested_markup_tolerated() {
        let doc = RichDocument::from_html("<b><i>x</b>y");
        assert_eq!(doc.text(), "xy");
        // </b> closed the dangling <i> too
        assert_eq!(doc.runs(1, 2)[0].1, CharStyle::default());
    }

    #[test]
    fn test_font_attributes_parse() {
        let doc = RichDocument::from_html("<font color=\"blue\" face=\"Courier\" size=\"2\">x</font>");
        let style = doc.runs(0, 1)[0].1;
        assert_eq!(style.color, TextColor::Blue);
        assert_eq!(style.family, FontFamily::Courier);
        assert_eq!(style.size, FontSize::Small);
    }

    #[test]
    fn test_heading_maps_to_bold_large() {
        let doc = RichDocument::from_html("<h1>t</h1>after");
        assert_eq!(doc.text(), "t\nafter");
        let style = doc.runs(0, 1)[0].1;
        assert!(style.bold);
        assert_eq!(style.size, FontSize::Huge);
        assert_eq!(doc.runs(2, 3)[0].1, CharStyle::default());
    }

    #[test]
    fn test_alignment_parses_and_serializes() {
        let doc = RichDocument::from_html("<p align=\"center\">x</p>");
        assert_eq!(doc.alignments(), &[Alignment::Center]);
        assert_eq!(doc.to_html(), "<p align=\"center\">x</p>");
    }

    #[test]
    fn test_script_contents_ignored() {
        let doc = RichDocument::from_html("<script>var x = '<p>no</p>';</script>yes");
        assert_eq!(doc.text(), "yes");
    }

    #[test]
    fn test_insert_inherits_left_style() {
        let mut doc = RichDocument::from_html("<b>ab</b>cd");
        doc.insert(2, "X");
        assert_eq!(doc.text(), "abXcd");
        assert_eq!(doc.runs(0, 3), vec![(0..3, bold())]);
        doc.insert(0, "Y");
        assert_eq!(doc.runs(0, 1)[0].1, bold());
    }

    #[test]
    fn test_insert_into_empty() {
        let mut doc = RichDocument::new();
        doc.insert(0, "hi");
        assert_eq!(doc.text(), "hi");
        assert_eq!(doc.runs(0, 2), vec![(0..2, CharStyle::default())]);
    }

    #[test]
    fn test_delete_across_spans() {
        let mut doc = RichDocument::from_html("ab<b>cd</b>ef");
        doc.delete(1, 4);
        assert_eq!(doc.text(), "af");
        assert_eq!(doc.runs(0, 2), vec![(0..2, CharStyle::default())]);
    }

    #[test]
    fn test_delete_merges_paragraph_alignment() {
        let mut doc = RichDocument::from_html("<p>a</p><p align=\"center\">b</p>");
        assert_eq!(doc.alignments(), &[Alignment::Left, Alignment::Center]);
        doc.delete(1, 1); // remove the newline
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.alignments(), &[Alignment::Left]);
    }

    #[test]
    fn test_insert_newline_splits_paragraph() {
        let mut doc = RichDocument::new();
        doc.insert(0, "ab");
        doc.set_alignment(0, 0, Alignment::Right);
        doc.insert(1, "\n");
        assert_eq!(doc.alignments(), &[Alignment::Right, Alignment::Right]);
    }

    #[test]
    fn test_apply_char_style_splits_spans() {
        let mut doc = RichDocument::new();
        doc.insert(0, "abcd");
        doc.apply_char_style(1, 3, |s| s.italic = true);
        let italic = CharStyle {
            italic: true,
            ..CharStyle::default()
        };
        assert_eq!(
            doc.runs(0, 4),
            vec![
                (0..1, CharStyle::default()),
                (1..3, italic),
                (3..4, CharStyle::default()),
            ]
        );
        // undoing the change coalesces back to one span
        doc.apply_char_style(1, 3, |s| s.italic = false);
        assert_eq!(doc.runs(0, 4), vec![(0..4, CharStyle::default())]);
    }

    #[test]
    fn test_style_snapshot_restore() {
        let mut doc = RichDocument::new();
        doc.insert(0, "abcd");
        let before = doc.styles();
        doc.apply_char_style(0, 4, |s| s.color = TextColor::Red);
        doc.set_alignment(0, 0, Alignment::Center);
        doc.restore_styles(before);
        assert_eq!(doc.runs(0, 4), vec![(0..4, CharStyle::default())]);
        assert_eq!(doc.alignments(), &[Alignment::Left]);
    }

    #[test]
    fn test_style_bytes_matches_text_len() {
        let doc = RichDocument::from_html("a<b>b</b>\u{e9}");
        let mut table = StyleTable::new();
        let styles = doc.style_bytes(&mut table);
        assert_eq!(styles.len(), doc.len());
        assert!(styles.starts_with('A'));
    }

    #[test]
    fn test_style_table_interns() {
        let mut table = StyleTable::new();
        assert_eq!(table.style_char(CharStyle::default()), 'A');
        let b = table.style_char(bold());
        assert_eq!(b, 'B');
        assert_eq!(table.style_char(bold()), 'B');
        let entries = table.entries(16, false);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].font, Font::HelveticaBold);
        assert_eq!(entries[1].size, 16);
    }

    #[test]
    fn test_styled_text_round_trip_preserves_styles() {
        let mut doc = RichDocument::new();
        doc.insert(0, "hello world");
        doc.apply_char_style(0, 5, |s| {
            s.bold = true;
            s.color = TextColor::Red;
        });
        let reparsed = RichDocument::from_html(&doc.to_html());
        assert_eq!(reparsed.text(), "hello world");
        assert_eq!(reparsed.runs(0, 5)[0].1.color, TextColor::Red);
        assert!(reparsed.runs(0, 5)[0].1.bold);
        assert_eq!(reparsed.runs(5, 11)[0].1, CharStyle::default());
    }
}
