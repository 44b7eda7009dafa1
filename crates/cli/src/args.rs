// crates/cli/src/args.rs
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use log::LevelFilter;

use crate::options::OutputFormat;
use crate::parsers::parse_key_val;

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "polyloc",
    version = crate::VERSION,
    about = "多言語対応の PSLOC/LSLOC 集計ツール (埋め込みスクリプト/スタイル対応)"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// 対象ファイルまたはディレクトリ
    #[arg(required = true, value_hint = ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// 出力フォーマット
    #[arg(long, value_enum, default_value = "table", help_heading = "出力")]
    pub format: OutputFormat,

    /// 論理行を差分比較用ファイルとしてこのディレクトリへ追記出力する
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath, help_heading = "出力")]
    pub diff_dir: Option<PathBuf>,

    /// 重複コード検出用のチェックサムを収集し、同一ファイル群を表示する
    #[arg(long, help_heading = "解析")]
    pub dups: bool,

    /// 複雑度キーワード (演算/条件/論理/代入など) を集計する
    #[arg(long, help_heading = "解析")]
    pub complexity: bool,

    /// 追加の言語プロファイル (JSON 配列)
    #[arg(long, value_name = "JSON", value_hint = ValueHint::FilePath, help_heading = "言語")]
    pub profiles: Option<PathBuf>,

    /// 拡張子を言語に割り当てる (例: vue=html)。複数指定可
    #[arg(long = "map-ext", value_name = "EXT=LANG", value_parser = parse_key_val, help_heading = "言語")]
    pub map_ext: Vec<(String, String)>,

    /// 隠しファイル/ディレクトリも走査する
    #[arg(long, help_heading = "走査")]
    pub hidden: bool,

    /// 詳細ログ (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet", help_heading = "ログ")]
    pub verbose: u8,

    /// エラー以外のログを出さない
    #[arg(short, long, help_heading = "ログ")]
    pub quiet: bool,
}

impl Args {
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
