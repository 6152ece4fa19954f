//! 交互选择能力。核心逻辑只依赖这个 trait，终端实现位于 `tui`。

use anyhow::Result;

/// 一次交互的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Picked(T),
    Cancelled,
}

pub trait Selector {
    /// 单选，返回所选下标
    fn choose_one(&mut self, title: &str, items: &[String]) -> Result<Selection<usize>>;

    /// 多选，返回所选下标（升序）
    fn choose_many(&mut self, title: &str, items: &[String]) -> Result<Selection<Vec<usize>>>;

    /// 文本输入
    fn prompt_text(&mut self, message: &str) -> Result<Selection<String>>;
}

#[cfg(test)]
pub mod scripted {
    use super::{Selection, Selector};
    use anyhow::{anyhow, Result};
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    pub enum Answer {
        One(usize),
        Many(Vec<usize>),
        Text(String),
        Cancel,
    }

    /// 按顺序回放预设答案，并记录每次提示的选项
    #[derive(Debug, Default)]
    pub struct ScriptedSelector {
        answers: VecDeque<Answer>,
        pub prompts: Vec<(String, Vec<String>)>,
    }

    impl ScriptedSelector {
        pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                prompts: Vec::new(),
            }
        }

        fn next(&mut self, title: &str, items: &[String]) -> Result<Answer> {
            self.prompts.push((title.to_string(), items.to_vec()));
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow!("unexpected prompt: {title}"))
        }
    }

    impl Selector for ScriptedSelector {
        fn choose_one(&mut self, title: &str, items: &[String]) -> Result<Selection<usize>> {
            match self.next(title, items)? {
                Answer::One(idx) => Ok(Selection::Picked(idx)),
                Answer::Cancel => Ok(Selection::Cancelled),
                other => Err(anyhow!("expected single choice, scripted {other:?}")),
            }
        }

        fn choose_many(&mut self, title: &str, items: &[String]) -> Result<Selection<Vec<usize>>> {
            match self.next(title, items)? {
                Answer::Many(idx) => Ok(Selection::Picked(idx)),
                Answer::Cancel => Ok(Selection::Cancelled),
                other => Err(anyhow!("expected multi choice, scripted {other:?}")),
            }
        }

        fn prompt_text(&mut self, message: &str) -> Result<Selection<String>> {
            match self.next(message, &[])? {
                Answer::Text(text) => Ok(Selection::Picked(text)),
                Answer::Cancel => Ok(Selection::Cancelled),
                other => Err(anyhow!("expected text, scripted {other:?}")),
            }
        }
    }
}
