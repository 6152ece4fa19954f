//! 终端交互选择
//!
//! 每次提示临时进入备用屏幕，结束后恢复终端，安装输出仍打印在普通屏幕上。

pub mod input;
mod layout;
pub mod list;
mod theme;

use crate::selector::{Selection, Selector};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{render_input_box, InputBox};
use list::{ListAction, ListState};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};

/// 基于 ratatui 的 `Selector` 实现
#[derive(Debug, Default)]
pub struct TerminalSelector;

impl TerminalSelector {
    pub fn new() -> Self {
        Self
    }

    fn run_list(&mut self, title: &str, items: &[String], multi: bool) -> Result<Selection<Vec<usize>>> {
        if items.is_empty() {
            return Ok(Selection::Cancelled);
        }
        let mut state = ListState::new(items, multi);
        let mut session = TerminalSession::enter()?;
        loop {
            session.draw(|f| state.render(f, title))?;
            match state.handle_key(next_key()?) {
                ListAction::Continue => {}
                ListAction::Confirm(indices) => return Ok(Selection::Picked(indices)),
                ListAction::Cancel => return Ok(Selection::Cancelled),
            }
        }
    }
}

impl Selector for TerminalSelector {
    fn choose_one(&mut self, title: &str, items: &[String]) -> Result<Selection<usize>> {
        Ok(match self.run_list(title, items, false)? {
            Selection::Picked(indices) => match indices.first() {
                Some(&idx) => Selection::Picked(idx),
                None => Selection::Cancelled,
            },
            Selection::Cancelled => Selection::Cancelled,
        })
    }

    fn choose_many(&mut self, title: &str, items: &[String]) -> Result<Selection<Vec<usize>>> {
        self.run_list(title, items, true)
    }

    fn prompt_text(&mut self, message: &str) -> Result<Selection<String>> {
        let mut prompt = TextPrompt::default();
        let mut session = TerminalSession::enter()?;
        loop {
            session.draw(|f| prompt.render(f, message))?;
            match prompt.handle_key(next_key()?) {
                TextAction::Continue => {}
                TextAction::Submit(text) => return Ok(Selection::Picked(text)),
                TextAction::Cancel => return Ok(Selection::Cancelled),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TextAction {
    Continue,
    Submit(String),
    Cancel,
}

#[derive(Debug, Default)]
struct TextPrompt {
    input: InputBox,
}

impl TextPrompt {
    fn handle_key(&mut self, key: KeyEvent) -> TextAction {
        match key.code {
            KeyCode::Esc => TextAction::Cancel,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                TextAction::Cancel
            }
            KeyCode::Enter => TextAction::Submit(self.input.content().trim().to_string()),
            _ => {
                self.input.handle_edit_key(&key);
                TextAction::Continue
            }
        }
    }

    fn render(&self, f: &mut Frame, message: &str) {
        let chunks = layout::prompt_layout(f.area());
        layout::render_header(f, message, chunks[0]);
        render_input_box(f, &self.input, ">", chunks[1]);
        layout::render_footer(f, "Enter 确认  Esc 取消", chunks[2]);
    }
}

/// raw mode + 备用屏幕，Drop 时恢复
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// 阻塞读取下一个按下事件
fn next_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}
