//! 输出解析函数

use serde_json::Value;
use std::collections::BTreeSet;

/// 安装动词（npm / yarn / pnpm 写法）
const INSTALL_VERBS: &[&str] = &["install", "i", "add"];
/// shell 控制符的起始字符（`&&` `||` `;` `|` `&`），之后属于另一条命令
const CONTROL_CHARS: &[char] = &['&', '|', ';'];

/// 清理终端输出中的 ANSI 转义序列和特殊字符
pub fn clean_terminal_output(input: &str) -> String {
    let mut result = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\r' => {
                if chars.peek() != Some(&'\n') && !result.ends_with('\n') {
                    result.push('\n');
                }
            }
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => result.push(c),
        }
    }

    let mut cleaned_lines = Vec::new();
    let mut prev_empty = false;
    for line in result.lines() {
        let is_empty = line.trim().is_empty();
        if is_empty && prev_empty {
            continue;
        }
        cleaned_lines.push(line);
        prev_empty = is_empty;
    }

    cleaned_lines.join("\n")
}

/// 去掉包说明符末尾的 `@version`，保留开头的 scope 标记
pub fn strip_version(spec: &str) -> &str {
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(pos) => &spec[..search_from + pos],
        None => spec,
    }
}

/// 从安装命令中提取包名（去重，保持出现顺序）
///
/// `npm install @scope/pkg@1.2.3 other@2.0.0` → `["@scope/pkg", "other"]`
pub fn extract_package_names(command: &str) -> Vec<String> {
    let mut tokens = command.split_whitespace();
    if !tokens.by_ref().any(|tok| INSTALL_VERBS.contains(&tok)) {
        return Vec::new();
    }

    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        // 控制符可能紧贴在包名后面，如 `foo&&npm`
        let (word, terminated) = match token.find(CONTROL_CHARS) {
            Some(pos) => (&token[..pos], true),
            None => (token, false),
        };
        let word = word.trim_matches(|c| c == '"' || c == '\'');
        if !word.is_empty() && !word.starts_with('-') {
            let name = strip_version(word);
            if !is_safe_package_name(name) {
                log::warn!("忽略无法识别的包名 {:?} (来自 `{}`)", name, command);
            } else if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        if terminated {
            break;
        }
    }
    names
}

/// 包名只允许 npm 命名规则内的字符，保证拼进 `sh -c` 时不会被 shell 解释
pub fn is_safe_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '/' | '.' | '-' | '_' | '~'))
}

/// 解析 `npm ls --depth=0 --json` 的输出，返回顶层依赖名
///
/// pnpm 的输出是项目数组，同样支持；devDependencies 也计入。
pub fn parse_installed_packages(json: &str) -> Result<BTreeSet<String>, serde_json::Error> {
    let root: Value = serde_json::from_str(json)?;
    let mut names = BTreeSet::new();
    let projects = match &root {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    };
    for project in projects {
        for key in ["dependencies", "devDependencies"] {
            if let Some(deps) = project.get(key).and_then(Value::as_object) {
                names.extend(deps.keys().cloned());
            }
        }
    }
    Ok(names)
}
