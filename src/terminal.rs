#![cfg(feature = "std")]

//! Terminal front end: a raw-mode line editor below a scrolling transcript.

use std::io::{self, Stdout, Write};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use crossterm::{cursor, queue};
use regex::Regex;
use tokio::sync::mpsc::UnboundedSender;

use crate::protocol::DEFAULT_PROMPT;
use crate::screen::Screen;
use crate::submitter::Key;

/// Renders server HTML fragments as plain terminal text.
pub struct TextRenderer {
    whitespace: Regex,
    line_break: Regex,
    paragraph_end: Regex,
    tag: Regex,
    around_newline: Regex,
    blank_lines: Regex,
}

impl TextRenderer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            whitespace: Regex::new(r"[ \t\r\n]+")?,
            line_break: Regex::new(r"(?i)<br\s*/?>")?,
            paragraph_end: Regex::new(r"(?i)</p\s*>")?,
            tag: Regex::new(r"<[^>]*>")?,
            around_newline: Regex::new(r" *\n *")?,
            blank_lines: Regex::new(r"\n{3,}")?,
        })
    }

    /// Paragraphs are separated by a blank line, `<br>` becomes a newline,
    /// every other tag is dropped and the common entities are decoded.
    pub fn render(&self, html: &str) -> String {
        let text = self.whitespace.replace_all(html, " ");
        let text = self.line_break.replace_all(&text, "\n");
        let text = self.paragraph_end.replace_all(&text, "\n\n");
        let text = self.tag.replace_all(&text, "");
        let text = self.around_newline.replace_all(&text, "\n");
        let text = self.blank_lines.replace_all(&text, "\n\n");
        decode_entities(text.trim_matches(|c| c == '\n' || c == ' '))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn is_user_response(html: &str) -> bool {
    html.trim_start().starts_with("<p class=\"user_response\"")
}

/// Enables raw mode for as long as it lives.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}", e))?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// [`Screen`] drawing to the terminal.
///
/// The input line always sits at the bottom; transcript output is printed
/// above it and the line is redrawn afterwards.
pub struct TerminalScreen {
    out: Stdout,
    renderer: TextRenderer,
    prompt: String,
    input: String,
}

impl TerminalScreen {
    pub fn new() -> anyhow::Result<Self> {
        let renderer = TextRenderer::new()
            .map_err(|e| anyhow::anyhow!("Failed to build text renderer: {}", e))?;
        Ok(Self {
            out: io::stdout(),
            renderer,
            prompt: DEFAULT_PROMPT.to_string(),
            input: String::new(),
        })
    }

    fn clear_line(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))
    }

    fn draw_input(&mut self) -> io::Result<()> {
        self.clear_line()?;
        queue!(self.out, Print(&self.prompt), Print(" "), Print(&self.input))?;
        self.out.flush()
    }

    fn print_block(&mut self, html: &str) -> io::Result<()> {
        let text = self.renderer.render(html);
        self.clear_line()?;
        if is_user_response(html) {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        for line in text.split('\n') {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        queue!(self.out, SetAttribute(Attribute::Reset), Print("\r\n"))?;
        self.draw_input()
    }

    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            log::error!("Terminal write failed: {}", e);
        }
    }
}

impl Screen for TerminalScreen {
    fn append_html(&mut self, html: &str) {
        let result = self.print_block(html);
        Self::report(result);
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
        let result = self.draw_input();
        Self::report(result);
    }

    fn prompt(&self) -> String {
        self.prompt.clone()
    }

    fn set_headline(&mut self, headline: &str) {
        let title = self.renderer.render(headline);
        let result = queue!(self.out, SetTitle(&title)).and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn show_input(&mut self, input: &str) {
        self.input = input.to_string();
        let result = self.draw_input();
        Self::report(result);
    }
}

/// Translate a terminal key press into an input-line key.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char('c') if ctrl => Some(Key::Quit),
        KeyCode::Char('d') if ctrl => Some(Key::EndOfInput),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

/// Read terminal events on a dedicated thread and forward mapped keys.
///
/// The thread ends when the receiver is dropped or the terminal fails.
pub fn spawn_key_reader(keys: UnboundedSender<Key>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key_event)) => {
                if let Some(key) = map_key(key_event) {
                    let quit = key == Key::Quit;
                    if keys.send(key).is_err() || quit {
                        return;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read terminal event: {}", e);
                let _ = keys.send(Key::Quit);
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_to_text(html: &str) -> String {
        TextRenderer::new().unwrap().render(html)
    }

    #[test]
    fn renderer_patterns_compile() {
        assert!(TextRenderer::new().is_ok());
    }

    #[test]
    fn paragraphs_become_blank_line_separated() {
        let text = html_to_text("<p>You are in a maze.</p><p>Exits lead <b>north</b>.</p>");
        assert_eq!(text, "You are in a maze.\n\nExits lead north.");
    }

    #[test]
    fn breaks_and_indents_survive() {
        let text = html_to_text("<p>Inventory:<br>&nbsp;&nbsp;a lamp</p>");
        assert_eq!(text, "Inventory:\n  a lamp");
    }

    #[test]
    fn entities_are_decoded_once() {
        assert_eq!(html_to_text("<i>&amp;lt; &lt;x&gt;</i>"), "&lt; <x>");
    }

    #[test]
    fn connection_lost_notice_reads_cleanly() {
        assert_eq!(
            html_to_text(crate::protocol::CONNECTION_LOST_NOTICE),
            "Connection lost"
        );
    }

    #[test]
    fn arrow_keys_map_to_recall() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(map_key(up), Some(Key::Up));
        assert_eq!(map_key(down), Some(Key::Down));
    }

    #[test]
    fn control_keys_quit_or_end_input() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Key::Quit));
        assert_eq!(map_key(ctrl_d), Some(Key::EndOfInput));
        assert_eq!(map_key(ctrl_x), None);
        let shifted = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(map_key(shifted), Some(Key::Char('N')));
    }
}
