use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "cojus",
    about = "输入文档编号，执行对应 API 的 npm 安装命令"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 数据目录（覆盖配置文件与 COJUS_DATA_DIR）
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 按文档编号安装。
    /// 示例:
    ///   cojus install 101 102        # 依次安装两个文档的默认命令
    ///   cojus install 5@3.9.1        # 安装指定版本
    ///   cojus -101 -102              # 旧写法，等同于 install 101 102
    Install {
        /// 文档编号或 编号@版本标签
        #[arg(value_name = "SPEC", required = true)]
        specs: Vec<InstallSpec>,
        /// 有多个版本时交互选择，而不是使用默认版本
        #[arg(long)]
        pick: bool,
        /// 有失败或未找到的条目时以非零状态退出
        #[arg(long)]
        strict: bool,
    },
    /// 按标题或编号搜索，选择后安装
    Search {
        /// 搜索词；省略时交互输入
        query: Option<String>,
        #[arg(long)]
        strict: bool,
    },
    /// 卸载目录中已安装的包
    #[command(alias = "delete")]
    Uninstall {
        #[arg(long)]
        strict: bool,
    },
    /// 列出所有文档编号与安装命令
    List,
    /// 从远端表同步目录与版本数据
    Sync,
}

/// `101` 或 `101@2.0.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSpec {
    pub id: u32,
    pub version: Option<String>,
}

impl FromStr for InstallSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = match s.split_once('@') {
            Some((id, tag)) => {
                if tag.is_empty() {
                    return Err(format!("`{s}` 缺少版本标签"));
                }
                (id, Some(tag.to_string()))
            }
            None => (s, None),
        };
        let id = id
            .parse::<u32>()
            .map_err(|_| format!("`{s}` 不是有效的文档编号"))?;
        Ok(Self { id, version })
    }
}

/// 把旧写法 `cojus -101 -102` 改写为 `cojus install 101 102`
///
/// 跳过前置的全局选项（如 `-v`、`--data-dir <PATH>`），第一个非选项参数是
/// `-<数字>` 时才改写，其余参数原样保留。
pub fn normalize_legacy_args(args: Vec<String>) -> Vec<String> {
    let Some(pos) = first_operand(&args) else {
        return args;
    };
    if !is_legacy_id(&args[pos]) {
        return args;
    }

    let mut out = Vec::with_capacity(args.len() + 1);
    for (idx, arg) in args.into_iter().enumerate() {
        if idx == pos {
            out.push("install".to_string());
        }
        if idx >= pos && is_legacy_id(&arg) {
            out.push(arg[1..].to_string());
        } else {
            out.push(arg);
        }
    }
    out
}

/// 程序名之后第一个不是全局选项的参数
fn first_operand(args: &[String]) -> Option<usize> {
    let mut idx = 1;
    while idx < args.len() {
        let arg = args[idx].as_str();
        if is_legacy_id(arg) || !arg.starts_with('-') {
            return Some(idx);
        }
        // --data-dir 的值单独占一个参数
        if arg == "--data-dir" {
            idx += 1;
        }
        idx += 1;
    }
    None
}

fn is_legacy_id(arg: &str) -> bool {
    arg.strip_prefix('-')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}
