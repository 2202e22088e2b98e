//! Handling of the ANSI escape sequences the paragraph engine emits:
//! tokenizing through `vte`, stripping, tracking SGR state across line
//! breaks, and converting styled lines into ratatui text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

pub const RESET: &str = "\x1b[0m";

/// A visible character or a graphics rendition (`ESC [ ... m`) with its
/// numeric parameters. Escapes other than SGR carry nothing the paragraph
/// needs and are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Char(char),
    Sgr(Vec<u16>),
}

#[derive(Default)]
struct TokenCollector {
    tokens: Vec<Token>,
}

impl Perform for TokenCollector {
    fn print(&mut self, c: char) {
        self.tokens.push(Token::Char(c));
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\t') {
            self.tokens.push(Token::Char(byte as char));
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if action != 'm' || ignore || !intermediates.is_empty() {
            return;
        }
        // Colon sub-parameters (`38:2:r:g:b`) flatten to the same list as
        // the semicolon form.
        let mut values: Vec<u16> = params.iter().flatten().copied().collect();
        if values.is_empty() {
            values.push(0);
        }
        self.tokens.push(Token::Sgr(values));
    }
}

pub fn tokenize(s: &str) -> Vec<Token> {
    let mut parser = Parser::new();
    let mut collector = TokenCollector::default();
    parser.advance(&mut collector, s.as_bytes());
    collector.tokens
}

pub fn strip(s: &str) -> String {
    tokenize(s)
        .into_iter()
        .filter_map(|t| match t {
            Token::Char(c) => Some(c),
            Token::Sgr(_) => None,
        })
        .collect()
}

pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Terminal columns taken by `s` once escapes are removed.
pub fn visible_width(s: &str) -> usize {
    tokenize(s)
        .into_iter()
        .map(|t| match t {
            Token::Char(c) => char_width(c),
            Token::Sgr(_) => 0,
        })
        .sum()
}

/// Re-encodes SGR parameters as an escape sequence.
pub fn sgr_escape(params: &[u16]) -> String {
    let joined: Vec<String> = params.iter().map(u16::to_string).collect();
    format!("\x1b[{}m", joined.join(";"))
}

/// True for SGR parameters that only switch attributes or colours off.
pub fn is_closing(params: &[u16]) -> bool {
    params
        .iter()
        .all(|p| matches!(p, 0 | 22 | 23 | 24 | 27 | 39 | 49 | 59))
}

/// Graphics state accumulated from SGR sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SgrState {
    fg: Option<Color>,
    bg: Option<Color>,
    modifiers: Modifier,
}

fn extended_color(params: &mut impl Iterator<Item = u16>) -> Option<Color> {
    match params.next()? {
        5 => params.next().map(|n| Color::Indexed(n as u8)),
        2 => {
            let r = params.next()? as u8;
            let g = params.next()? as u8;
            let b = params.next()? as u8;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

impl SgrState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the parameters of one SGR sequence.
    pub fn apply(&mut self, params: &[u16]) {
        let mut params = params.iter().copied();
        while let Some(p) = params.next() {
            match p {
                0 => *self = Self::default(),
                1 => self.modifiers.insert(Modifier::BOLD),
                2 => self.modifiers.insert(Modifier::DIM),
                3 => self.modifiers.insert(Modifier::ITALIC),
                4 => self.modifiers.insert(Modifier::UNDERLINED),
                5 => self.modifiers.insert(Modifier::SLOW_BLINK),
                7 => self.modifiers.insert(Modifier::REVERSED),
                9 => self.modifiers.insert(Modifier::CROSSED_OUT),
                22 => self.modifiers.remove(Modifier::BOLD | Modifier::DIM),
                23 => self.modifiers.remove(Modifier::ITALIC),
                24 => self.modifiers.remove(Modifier::UNDERLINED),
                25 => self.modifiers.remove(Modifier::SLOW_BLINK),
                27 => self.modifiers.remove(Modifier::REVERSED),
                29 => self.modifiers.remove(Modifier::CROSSED_OUT),
                30..=37 => self.fg = Some(Color::Indexed((p - 30) as u8)),
                38 => self.fg = extended_color(&mut params),
                39 => self.fg = None,
                40..=47 => self.bg = Some(Color::Indexed((p - 40) as u8)),
                48 => self.bg = extended_color(&mut params),
                49 => self.bg = None,
                90..=97 => self.fg = Some(Color::Indexed((p - 90 + 8) as u8)),
                100..=107 => self.bg = Some(Color::Indexed((p - 100 + 8) as u8)),
                _ => {}
            }
        }
    }

    /// A single SGR sequence that recreates this state from a reset.
    pub fn to_escape(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        for (modifier, code) in [
            (Modifier::BOLD, "1"),
            (Modifier::DIM, "2"),
            (Modifier::ITALIC, "3"),
            (Modifier::UNDERLINED, "4"),
            (Modifier::SLOW_BLINK, "5"),
            (Modifier::REVERSED, "7"),
            (Modifier::CROSSED_OUT, "9"),
        ] {
            if self.modifiers.contains(modifier) {
                params.push(code.to_string());
            }
        }
        for (color, base) in [(self.fg, 38), (self.bg, 48)] {
            match color {
                Some(Color::Indexed(n)) => params.push(format!("{base};5;{n}")),
                Some(Color::Rgb(r, g, b)) => params.push(format!("{base};2;{r};{g};{b}")),
                _ => {}
            }
        }
        if params.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", params.join(";"))
    }

    pub fn to_style(&self) -> Style {
        let mut style = Style::default().add_modifier(self.modifiers);
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        style
    }
}

/// Converts escaped text into ratatui lines, one per `\n`.
pub fn to_text(s: &str) -> Text<'static> {
    let mut state = SgrState::default();
    let mut lines = Vec::new();
    for raw_line in s.split('\n') {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        for token in tokenize(raw_line) {
            match token {
                Token::Char(c) => run.push(c),
                Token::Sgr(params) => {
                    if !run.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut run), state.to_style()));
                    }
                    state.apply(&params);
                }
            }
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, state.to_style()));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collects_sgr_params() {
        let tokens = tokenize("a\x1b[38;5;1mb\x1b[0m\x1b[m");
        assert_eq!(
            tokens,
            vec![
                Token::Char('a'),
                Token::Sgr(vec![38, 5, 1]),
                Token::Char('b'),
                Token::Sgr(vec![0]),
                Token::Sgr(vec![0]),
            ]
        );
    }

    #[test]
    fn test_tokenize_drops_non_sgr_escapes() {
        let tokens = tokenize("\x1b[2Kx\x1b[3;4Hy");
        assert_eq!(tokens, vec![Token::Char('x'), Token::Char('y')]);
    }

    #[test]
    fn test_colon_params_flatten() {
        assert_eq!(tokenize("\x1b[38:2:1:2:3m"), vec![Token::Sgr(vec![38, 2, 1, 2, 3])]);
    }

    #[test]
    fn test_strip_and_width() {
        let s = "\x1b[1mhé\x1b[22m 世";
        assert_eq!(strip(s), "hé 世");
        assert_eq!(visible_width(s), 5);
        assert_eq!(strip("a\nb"), "a\nb");
    }

    #[test]
    fn test_is_closing() {
        assert!(is_closing(&[0]));
        assert!(is_closing(&[39]));
        assert!(is_closing(&[22, 24]));
        assert!(!is_closing(&[1]));
        assert!(!is_closing(&[38, 5, 9]));
    }

    #[test]
    fn test_sgr_escape_round_trips_through_tokenize() {
        let seq = sgr_escape(&[38, 2, 10, 20, 30]);
        assert_eq!(seq, "\x1b[38;2;10;20;30m");
        assert_eq!(tokenize(&seq), vec![Token::Sgr(vec![38, 2, 10, 20, 30])]);
    }

    #[test]
    fn test_state_round_trips_through_escape() {
        let mut state = SgrState::default();
        state.apply(&[38, 2, 1, 2, 3]);
        state.apply(&[4]);
        state.apply(&[48, 5, 200]);
        let mut replayed = SgrState::default();
        for token in tokenize(&state.to_escape()) {
            if let Token::Sgr(params) = token {
                replayed.apply(&params);
            }
        }
        assert_eq!(replayed, state);

        state.apply(&[0]);
        assert!(state.is_default());
        assert_eq!(state.to_escape(), "");
    }

    #[test]
    fn test_to_text_styles_spans() {
        let text = to_text("ab\x1b[38;5;1;4mc\x1b[0m\nd");
        assert_eq!(text.lines.len(), 2);
        let first = &text.lines[0];
        assert_eq!(first.spans.len(), 2);
        assert_eq!(first.spans[0].content, "ab");
        assert_eq!(first.spans[1].content, "c");
        assert_eq!(first.spans[1].style.fg, Some(Color::Indexed(1)));
        assert!(first.spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(text.lines[1].spans[0].style, Style::default());
    }
}
