//! Rich-text tokenizer – turns the restricted remarks markup into a lazy
//! stream of [`MarkupEvent`]s.
//!
//! Recognised tags:
//! - `<b>` / `<strong>`, `<i>` / `<em>`, `<u>` – style on / off
//! - `<br>` – line break (self-closing)
//! - `</p>` – paragraph break; an opening `<p>` carries no event unless a
//!   paragraph is already open, which it ends first
//!
//! Anything else that looks like a tag is dropped while its text content keeps
//! flowing. Malformed input never fails: a `<` that does not start a tag is
//! plain text, and closing tags without a matching opener are swallowed.

use std::iter::FusedIterator;

/// The inline styles the markup can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
}

impl StyleKind {
    const ALL: [StyleKind; 3] = [StyleKind::Bold, StyleKind::Italic, StyleKind::Underline];

    fn index(self) -> usize {
        match self {
            StyleKind::Bold => 0,
            StyleKind::Italic => 1,
            StyleKind::Underline => 2,
        }
    }
}

/// One structural or textual event of the remarks markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Literal character data, entity-decoded, concatenated up to the next
    /// event boundary.
    Text(String),
    StyleOn(StyleKind),
    StyleOff(StyleKind),
    LineBreak,
    ParagraphBreak,
}

/// Tokenize `input` into a pull-based event stream.
///
/// The returned iterator is cheap to clone; a clone replays the remaining
/// events independently, and calling `tokenize` again restarts from the top.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Pull-based tokenizer over a remarks string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Event found while a text run was still being returned.
    pending: Option<MarkupEvent>,
    /// Currently open count per [`StyleKind`], used to drop unmatched closes.
    open: [u32; 3],
    /// Inside a `<p>`; a second `<p>` closes it first.
    in_paragraph: bool,
}

/// A lexically complete tag: `<name ...>` or `</name ...>`.
struct RawTag {
    name: String,
    closing: bool,
    /// Byte offset just past the closing `>`.
    end: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending: None,
            open: [0; 3],
            in_paragraph: false,
        }
    }

    /// Classify a tag, updating the open-style counters.
    fn event_for(&mut self, tag: &RawTag) -> Option<MarkupEvent> {
        let name = tag.name.to_ascii_lowercase();
        let kind = match name.as_str() {
            "b" | "strong" => Some(StyleKind::Bold),
            "i" | "em" => Some(StyleKind::Italic),
            "u" => Some(StyleKind::Underline),
            _ => None,
        };

        if let Some(kind) = kind {
            let slot = &mut self.open[kind.index()];
            if !tag.closing {
                *slot += 1;
                return Some(MarkupEvent::StyleOn(kind));
            }
            if *slot == 0 {
                log::debug!("Ignoring unmatched closing tag </{}>", tag.name);
                return None;
            }
            *slot -= 1;
            return Some(MarkupEvent::StyleOff(kind));
        }

        match (name.as_str(), tag.closing) {
            ("br", _) => Some(MarkupEvent::LineBreak),
            ("p", true) => {
                self.in_paragraph = false;
                Some(MarkupEvent::ParagraphBreak)
            }
            ("p", false) => {
                let implied_close = self.in_paragraph;
                self.in_paragraph = true;
                implied_close.then_some(MarkupEvent::ParagraphBreak)
            }
            _ => None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Try to read a tag (or comment / declaration) at `self.pos`, which must
    /// point at `<`. Returns `None` when the `<` is literal text.
    fn read_tag(&self) -> Option<Markup> {
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map(|i| self.pos + 4 + i + 3)
                .unwrap_or(self.input.len());
            return Some(Markup::Skip(end));
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map(|i| self.pos + i + 1)?;
            return Some(Markup::Skip(end));
        }

        let mut offset = 1;
        let closing = rest[offset..].starts_with('/');
        if closing {
            offset += 1;
        }

        let name_len = rest[offset..]
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len() - offset);
        let name = &rest[offset..offset + name_len];
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        offset += name_len;

        // Scan attributes up to `>`, honouring quoted values.
        let mut quote: Option<char> = None;
        for (i, c) in rest[offset..].char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '>') => {
                    return Some(Markup::Tag(RawTag {
                        name: name.to_string(),
                        closing,
                        end: self.pos + offset + i + 1,
                    }));
                }
                (None, '<') => return None,
                _ => {}
            }
        }
        None
    }
}

enum Markup {
    Tag(RawTag),
    /// Comment or declaration; resume scanning at the given offset.
    Skip(usize),
}

impl Iterator for Tokenizer<'_> {
    type Item = MarkupEvent;

    fn next(&mut self) -> Option<MarkupEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        let mut text = String::new();
        while self.pos < self.input.len() {
            if !self.rest().starts_with('<') {
                let len = self.rest().find('<').unwrap_or(self.rest().len());
                text.push_str(&decode_entities(&self.rest()[..len]));
                self.pos += len;
                continue;
            }

            match self.read_tag() {
                Some(Markup::Tag(tag)) => {
                    self.pos = tag.end;
                    if let Some(event) = self.event_for(&tag) {
                        if text.is_empty() {
                            return Some(event);
                        }
                        self.pending = Some(event);
                        return Some(MarkupEvent::Text(text));
                    }
                }
                Some(Markup::Skip(end)) => self.pos = end,
                None => {
                    text.push('<');
                    self.pos += 1;
                }
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(MarkupEvent::Text(text))
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Whether every style opened in `input` is closed again.
pub fn is_balanced(input: &str) -> bool {
    let mut tokenizer = tokenize(input);
    tokenizer.by_ref().for_each(drop);
    StyleKind::ALL
        .iter()
        .all(|kind| tokenizer.open[kind.index()] == 0)
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // Entity names are short; a `;` further away leaves a literal `&`.
        let decoded = rest[1..]
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi + 1]).map(|c| (c, semi + 2)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the body of one entity (between `&` and `;`).
fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "copy" => '©',
        "reg" => '®',
        "deg" => '°',
        "euro" => '€',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "bull" => '•',
        "aacute" => 'á',
        "agrave" => 'à',
        "eacute" => 'é',
        "egrave" => 'è',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "auml" => 'ä',
        "ouml" => 'ö',
        "uuml" => 'ü',
        "ccedil" => 'ç',
        "ntilde" => 'ñ',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarkupEvent::*;

    fn events(input: &str) -> Vec<MarkupEvent> {
        tokenize(input).collect()
    }

    fn text(s: &str) -> MarkupEvent {
        Text(s.to_string())
    }

    #[test]
    fn bold_then_plain() {
        assert_eq!(
            events("<b>Hi</b> there"),
            vec![
                StyleOn(StyleKind::Bold),
                text("Hi"),
                StyleOff(StyleKind::Bold),
                text(" there")
            ]
        );
    }

    #[test]
    fn line_break() {
        assert_eq!(events("A<br>B"), vec![text("A"), LineBreak, text("B")]);
        assert_eq!(events("A<br/>B"), vec![text("A"), LineBreak, text("B")]);
        assert_eq!(events("A<BR />B"), vec![text("A"), LineBreak, text("B")]);
    }

    #[test]
    fn paragraphs() {
        assert_eq!(
            events("<p>X</p><p>Y</p>"),
            vec![text("X"), ParagraphBreak, text("Y"), ParagraphBreak]
        );
    }

    #[test]
    fn aliases_and_case() {
        assert_eq!(
            events("<STRONG>a</STRONG><em>b</em><u>c</u>"),
            vec![
                StyleOn(StyleKind::Bold),
                text("a"),
                StyleOff(StyleKind::Bold),
                StyleOn(StyleKind::Italic),
                text("b"),
                StyleOff(StyleKind::Italic),
                StyleOn(StyleKind::Underline),
                text("c"),
                StyleOff(StyleKind::Underline),
            ]
        );
    }

    #[test]
    fn unknown_tags_pass_content_through() {
        assert_eq!(
            events(r#"one <span class="x">two</span> three"#),
            vec![text("one two three")]
        );
    }

    #[test]
    fn unmatched_close_is_dropped() {
        assert_eq!(events("a</b>b"), vec![text("ab")]);
    }

    #[test]
    fn unclosed_open_keeps_text() {
        assert_eq!(
            events("<b>bold text"),
            vec![StyleOn(StyleKind::Bold), text("bold text")]
        );
        assert!(!is_balanced("<b>bold text"));
        assert!(is_balanced("<b>x</b><i>y</i>"));
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        assert_eq!(events("1 < 2 and 3 <> 4"), vec![text("1 < 2 and 3 <> 4")]);
        assert_eq!(events("tail <b"), vec![text("tail <b")]);
    }

    #[test]
    fn comments_and_entities() {
        assert_eq!(
            events("a<!-- hidden <b> -->b &amp; c &lt;d&gt;"),
            vec![text("ab & c <d>")]
        );
    }

    #[test]
    fn numeric_and_named_entities() {
        assert_eq!(
            events("caf&#233; &eacute; &#x41;&#X42;"),
            vec![text("café é AB")]
        );
        // `&amp;` decodes once, never twice
        assert_eq!(events("&amp;lt;"), vec![text("&lt;")]);
    }

    #[test]
    fn unknown_entities_stay_literal() {
        assert_eq!(
            events("R&D &bogus; &#xZZ; a & b &#1114112;"),
            vec![text("R&D &bogus; &#xZZ; a & b &#1114112;")]
        );
    }

    #[test]
    fn nested_paragraph_open_closes_previous() {
        assert_eq!(
            events("<p>X<p>Y</p>"),
            vec![text("X"), ParagraphBreak, text("Y"), ParagraphBreak]
        );
        // first <p> carries no event
        assert_eq!(events("<p>X</p>"), vec![text("X"), ParagraphBreak]);
    }

    #[test]
    fn quoted_gt_inside_attribute() {
        assert_eq!(
            events(r#"<span title="a>b">x</span>"#),
            vec![text("x")]
        );
    }

    #[test]
    fn restartable() {
        let input = "<i>x</i><br>y";
        let mut first = tokenize(input);
        first.next();
        let replay = first.clone();
        assert_eq!(first.collect::<Vec<_>>(), replay.collect::<Vec<_>>());
        assert_eq!(events(input), events(input));
    }

    #[test]
    fn empty_input() {
        assert!(events("").is_empty());
        assert!(events("<p></p>").len() == 1);
    }
}
