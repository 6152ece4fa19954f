use super::input::{render_input_box, InputBox};
use super::layout;
use super::theme::{BLUE, BRIGHT_WHITE, DESC_DIM, DIM, PINK, SEL_BG};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::collections::BTreeSet;

/// 按键处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Continue,
    /// 确认，携带原始下标（升序）
    Confirm(Vec<usize>),
    Cancel,
}

/// 可过滤的单选 / 多选列表
#[derive(Debug)]
pub struct ListState {
    items: Vec<String>,
    multi: bool,
    filter: InputBox,
    /// 过滤后可见条目的原始下标
    filtered: Vec<usize>,
    /// 光标在 `filtered` 中的位置
    selected: usize,
    /// 已标记的原始下标
    marked: BTreeSet<usize>,
}

impl ListState {
    pub fn new(items: &[String], multi: bool) -> Self {
        Self {
            items: items.to_vec(),
            multi,
            filter: InputBox::new(),
            filtered: (0..items.len()).collect(),
            selected: 0,
            marked: BTreeSet::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        match key.code {
            KeyCode::Esc => return ListAction::Cancel,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ListAction::Cancel
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => self.move_down(),
            KeyCode::Char(' ') if self.multi => {
                if let Some(&real_idx) = self.filtered.get(self.selected) {
                    if !self.marked.remove(&real_idx) {
                        self.marked.insert(real_idx);
                    }
                    // 标记后自动下移
                    self.move_down();
                }
            }
            KeyCode::Enter => {
                if self.multi && !self.marked.is_empty() {
                    return ListAction::Confirm(self.marked.iter().copied().collect());
                }
                // 没有标记时取光标所在行
                if let Some(&real_idx) = self.filtered.get(self.selected) {
                    return ListAction::Confirm(vec![real_idx]);
                }
            }
            _ => {
                if self.filter.handle_edit_key(&key) == Some(true) {
                    self.apply_filter();
                }
            }
        }
        ListAction::Continue
    }

    fn move_down(&mut self) {
        let max = self.filtered.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    /// 大小写不敏感的子串过滤
    fn apply_filter(&mut self) {
        let needle = self.filter.content().to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.to_lowercase().contains(&needle))
            .map(|(idx, _)| idx)
            .collect();
        self.selected = self.selected.min(self.filtered.len().saturating_sub(1));
    }

    pub fn render(&self, f: &mut Frame, title: &str) {
        let chunks = layout::list_layout(f.area());
        layout::render_header(f, title, chunks[0]);
        render_input_box(f, &self.filter, "过滤:", chunks[1]);

        let area = chunks[2];
        let visible = area.height as usize;
        let offset = layout::scroll_offset(self.selected, visible);

        let lines: Vec<Line> = if self.filtered.is_empty() {
            vec![Line::from(Span::styled("  (没有匹配项)", Style::default().fg(DIM)))]
        } else {
            self.filtered
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(pos, &idx)| self.render_row(pos == self.selected, idx))
                .collect()
        };
        f.render_widget(Paragraph::new(lines), area);

        let hint = if self.multi {
            format!(
                "↑↓ 移动  Space 标记  Enter 确认  Esc 取消  已标记 {}",
                self.marked.len()
            )
        } else {
            "↑↓ 移动  Enter 确认  Esc 取消".to_string()
        };
        layout::render_footer(f, &hint, chunks[3]);
    }

    fn render_row(&self, highlighted: bool, idx: usize) -> Line<'_> {
        let is_marked = self.marked.contains(&idx);
        let pointer = if highlighted { "▸ " } else { "  " };
        let mark = match (self.multi, is_marked) {
            (false, _) => "",
            (true, true) => "● ",
            (true, false) => "○ ",
        };

        let text_style = match (highlighted, is_marked) {
            (_, true) => Style::default().fg(BLUE),
            (true, false) => Style::default().fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD),
            (false, false) => Style::default().fg(DESC_DIM),
        };
        let mut line = Line::from(vec![
            Span::styled(pointer, Style::default().fg(PINK)),
            Span::styled(mark, Style::default().fg(BLUE)),
            Span::styled(self.items[idx].as_str(), text_style),
        ]);
        if highlighted {
            line = line.style(Style::default().bg(SEL_BG));
        }
        line
    }
}
