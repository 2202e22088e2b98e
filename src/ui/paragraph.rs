//! Turns a session snapshot into the styled, wrapped and windowed block of
//! text shown while typing.

use crossterm::style::{ContentStyle, StyledContent};

use crate::session::state::SessionState;
use crate::ui::ansi::{self, RESET, SgrState, Token};

/// Stands in for spaces while wrapping so styled spaces stay breakable.
const SPACE_SENTINEL: char = '\u{e000}';

const MIN_LINE_WIDTH: usize = 5;
const MAX_LINE_WIDTH: usize = 40;
const VISIBLE_LINES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Correct,
    ToEnter,
    Mistake,
    Cursor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStyles {
    pub correct: ContentStyle,
    pub to_enter: ContentStyle,
    pub mistake: ContentStyle,
    pub cursor: ContentStyle,
}

impl TextStyles {
    /// No escapes at all; handy for tests and dumb terminals.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn paint(&self, role: Role, text: &str) -> String {
        let style = match role {
            Role::Correct => self.correct,
            Role::ToEnter => self.to_enter,
            Role::Mistake => self.mistake,
            Role::Cursor => self.cursor,
        };
        StyledContent::new(style, text).to_string()
    }

    fn paint_each(&self, role: Role, chars: &[char], out: &mut String) {
        let mut buf = [0u8; 4];
        for ch in chars {
            out.push_str(&self.paint(role, ch.encode_utf8(&mut buf)));
        }
    }
}

/// Renders target and input as one styled string: typed characters, each
/// active mistake shown as the expected character, the cursor character,
/// then everything still to type.
pub fn compose(state: &SessionState, styles: &TextStyles) -> String {
    let target = state.target();
    let input = state.input();
    let mut out = String::new();

    let mut from = 0;
    for idx in state.mistakes().active() {
        styles.paint_each(Role::Correct, &input[from..idx], &mut out);
        out.push_str(&styles.paint(Role::Mistake, &target[idx].to_string()));
        from = idx + 1;
    }
    styles.paint_each(Role::Correct, &input[from..], &mut out);

    if let Some(cursor) = target.get(input.len()) {
        out.push_str(&styles.paint(Role::Cursor, &cursor.to_string()));
        let rest: String = target[input.len() + 1..].iter().collect();
        if !rest.is_empty() {
            out.push_str(&styles.paint(Role::ToEnter, &rest));
        }
    }
    out
}

pub fn line_width(term_width: u16) -> usize {
    (term_width as usize * 6 / 10).clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
}

/// Groups tokens into words, each ending after a space sentinel plus any
/// closing sequences that follow it.
fn split_words(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut words = Vec::new();
    let mut current = Vec::new();
    let mut after_break = false;
    for token in tokens {
        if after_break {
            if matches!(&token, Token::Sgr(params) if ansi::is_closing(params)) {
                current.push(token);
                continue;
            }
            words.push(std::mem::take(&mut current));
        }
        after_break = token == Token::Char(SPACE_SENTINEL);
        current.push(token);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

struct LineBuilder {
    lines: Vec<String>,
    line: String,
    width: usize,
    state: SgrState,
}

impl LineBuilder {
    fn push_sgr(&mut self, params: &[u16]) {
        self.line.push_str(&ansi::sgr_escape(params));
        self.state.apply(params);
    }

    fn push_char(&mut self, ch: char, width: usize) {
        self.line.push(ch);
        self.width += width;
    }

    /// Ends the current line, closing any open style and reopening it on
    /// the next so lines render on their own.
    fn break_line(&mut self) {
        let open = !self.state.is_default();
        if open {
            self.line.push_str(RESET);
        }
        self.lines.push(std::mem::take(&mut self.line));
        if open {
            self.line.push_str(&self.state.to_escape());
        }
        self.width = 0;
    }
}

/// Word-wraps styled text at `width` columns. Breaks fall after spaces;
/// words wider than a line are split at the limit.
pub fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let substituted = paragraph.replace(' ', &SPACE_SENTINEL.to_string());
    let mut builder = LineBuilder {
        lines: Vec::new(),
        line: String::new(),
        width: 0,
        state: SgrState::default(),
    };

    for word in split_words(ansi::tokenize(&substituted)) {
        let word_width: usize = word
            .iter()
            .map(|t| match t {
                Token::Char(c) => ansi::char_width(*c),
                Token::Sgr(_) => 0,
            })
            .sum();
        if builder.width > 0 && builder.width + word_width > width {
            builder.break_line();
        }
        for token in word {
            match token {
                Token::Sgr(params) => builder.push_sgr(&params),
                Token::Char(ch) => {
                    let w = ansi::char_width(ch);
                    if builder.width > 0 && builder.width + w > width {
                        builder.break_line();
                    }
                    builder.push_char(ch, w);
                }
            }
        }
    }
    if !builder.line.is_empty() || builder.lines.is_empty() {
        builder.lines.push(builder.line);
    }

    builder
        .lines
        .into_iter()
        .map(|line| line.replace(SPACE_SENTINEL, " "))
        .collect()
}

/// Index of the line holding character offset `cursor`.
pub fn cursor_line(lines: &[String], cursor: usize) -> usize {
    let mut seen = 0;
    for (idx, line) in lines.iter().enumerate() {
        seen += ansi::strip(line).chars().count();
        if cursor < seen {
            return idx;
        }
    }
    lines.len().saturating_sub(1)
}

/// The line before the cursor line and the two after it, or the first
/// three lines while the cursor is on the first.
pub fn window(lines: &[String], cursor_line: usize) -> &[String] {
    let start = cursor_line.saturating_sub(1).min(lines.len());
    let end = (start + VISIBLE_LINES).min(lines.len());
    &lines[start..end]
}

/// Left padding that centres the paragraph by its average line width. The
/// last line is usually short and is left out unless it is the only one.
pub fn indent(lines: &[String], term_width: u16) -> usize {
    let measured = if lines.len() > 1 {
        &lines[..lines.len() - 1]
    } else {
        lines
    };
    let avg = if measured.is_empty() {
        0
    } else {
        measured.iter().map(|l| ansi::visible_width(l)).sum::<usize>() / measured.len()
    };
    (term_width as usize / 2).saturating_sub(avg / 2)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParagraphView {
    pub lines: Vec<String>,
    pub indent: usize,
    pub top_padding: usize,
}

impl ParagraphView {
    pub fn layout(state: &SessionState, styles: &TextStyles, term_width: u16, term_height: u16) -> Self {
        let wrapped = wrap(&compose(state, styles), line_width(term_width));
        let current = cursor_line(&wrapped, state.cursor());
        let indent = indent(&wrapped, term_width);
        Self {
            lines: window(&wrapped, current).to_vec(),
            indent,
            top_padding: (term_height as usize / 2).saturating_sub(3),
        }
    }

    /// The visible lines, indented and joined with newlines.
    pub fn render(&self) -> String {
        let pad = " ".repeat(self.indent);
        self.lines
            .iter()
            .map(|line| format!("{pad}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full typing screen: vertical padding, the clock line, a blank line
    /// and the paragraph.
    pub fn render_with_clock(&self, clock: &str) -> String {
        format!(
            "{}{}{clock}\n\n{}",
            "\n".repeat(self.top_padding),
            " ".repeat(self.indent),
            self.render()
        )
    }
}
