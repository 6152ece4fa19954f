use super::theme::{DIM, PINK};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 列表界面布局：Header(3) + 过滤框(3) + 列表(弹性) + Footer(1)
pub fn list_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area)
        .to_vec()
}

/// 文本输入布局：Header(3) + 输入框(3) + Footer(1)
pub fn prompt_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area)
        .to_vec()
}

pub fn render_header(f: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(PINK).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// 按键提示行
pub fn render_footer(f: &mut Frame, text: &str, area: Rect) {
    let footer = Paragraph::new(format!(" {}", text)).style(Style::default().fg(DIM));
    f.render_widget(footer, area);
}

/// 让光标行保持在可见区域内，返回滚动偏移
pub fn scroll_offset(selected: usize, visible_height: usize) -> usize {
    if visible_height == 0 {
        return selected;
    }
    selected.saturating_sub(visible_height - 1)
}
