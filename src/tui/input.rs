use super::theme::{BLUE, BRIGHT_WHITE, DIM, PINK};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 单行文本输入框，支持 UTF-8 (中英文)
#[derive(Debug, Clone, Default)]
pub struct InputBox {
    /// 输入内容
    content: String,
    /// 光标位置（按字符计数，非字节）
    cursor: usize,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在光标处插入字符
    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte(&self.content, self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Backspace: 删除光标前的字符
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at_cursor();
        }
    }

    /// Delete: 删除光标后的字符
    pub fn delete_forward(&mut self) {
        if self.cursor < self.char_count() {
            self.remove_at_cursor();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }

    /// 处理编辑类按键。返回 `Some(changed)` 表示按键已被消费，
    /// `changed` 为内容是否发生变化；不认识的按键返回 `None`。
    pub fn handle_edit_key(&mut self, key: &KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Backspace => {
                self.delete_back();
                Some(true)
            }
            KeyCode::Delete => {
                self.delete_forward();
                Some(true)
            }
            KeyCode::Left => {
                self.move_left();
                Some(false)
            }
            KeyCode::Right => {
                self.move_right();
                Some(false)
            }
            KeyCode::Home => {
                self.move_home();
                Some(false)
            }
            KeyCode::End => {
                self.move_end();
                Some(false)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                Some(true)
            }
            _ => None,
        }
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn remove_at_cursor(&mut self) {
        let byte_pos = char_to_byte(&self.content, self.cursor);
        let next_byte_pos = char_to_byte(&self.content, self.cursor + 1);
        self.content.drain(byte_pos..next_byte_pos);
    }
}

/// 渲染输入框
pub fn render_input_box(f: &mut Frame, input: &InputBox, label: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIM));

    // label + 光标前文本 + 光标 + 光标后文本
    let chars: Vec<char> = input.content().chars().collect();
    let cursor_pos = input.cursor_pos().min(chars.len());
    let before: String = chars[..cursor_pos].iter().collect();
    let (cursor_char, after) = match chars.get(cursor_pos) {
        Some(c) => (c.to_string(), chars[cursor_pos + 1..].iter().collect()),
        None => (" ".to_string(), String::new()),
    };

    let spans = vec![
        Span::styled(
            format!("{label} "),
            Style::default().fg(PINK).add_modifier(Modifier::BOLD),
        ),
        Span::styled(before, Style::default().fg(BRIGHT_WHITE)),
        Span::styled(cursor_char, Style::default().fg(ratatui::style::Color::Black).bg(BLUE)),
        Span::styled(after, Style::default().fg(BRIGHT_WHITE)),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(paragraph, area);
}

/// UTF-8 安全的字符位置转字节位置
fn char_to_byte(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
