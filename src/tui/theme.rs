//! 选择界面配色

use ratatui::style::Color;

/// 标题 / 输入提示
pub const PINK: Color = Color::Rgb(245, 169, 184);
/// 已标记条目
pub const BLUE: Color = Color::Rgb(91, 206, 250);
/// 光标行背景色
pub const SEL_BG: Color = Color::Rgb(45, 35, 55);
pub const BRIGHT_WHITE: Color = Color::Rgb(255, 255, 255);
/// 次要信息
pub const DIM: Color = Color::Rgb(130, 130, 140);
/// 光标行内的普通文字
pub const DESC_DIM: Color = Color::Rgb(180, 180, 190);
