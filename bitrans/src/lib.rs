//! # bitrans
//!
//! bitransは、ルール定義に基づいて2つの記号アルファベットの間で
//! テキストを変換する、双方向の置換エンジンです。
//!
//! ## 概要
//!
//! ルール定義は「入力トークン → 出力トークン」の対応の集まりです。
//! コンパイル時にルールを優先度長の降順に並べ、行処理時には順に1回ずつ
//! 貪欲に適用します。一度置換された位置は後のルールでは置換されないため、
//! 後戻りなしに最長一致が実現されます。
//!
//! ## 主な機能
//!
//! - **双方向の変換**: 1つのルール定義を方向1(左から右)と方向2(右から左)の両方で使用
//! - **区切り文字の保持**: 空白・ピリオド・カンマを区切り代替文字に置き換えて処理し、出力時に復元
//! - **コメント**: 行内のコメント範囲と行全体のコメントを置換の対象外にする
//! - **同音異字ルール**: 複数の出力候補から決定的な乱数で1つを選択
//! - **Unicodeエスケープ**: `&XXXX;`形式で任意の文字をルールに記述
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bitrans::rules::{CompileOptions, Direction, RuleCompiler};
//! use bitrans::Transliterator;
//!
//! let rules = "##BIT1 Latn Grek
//! ch   &03C7;
//! th   &03B8;
//! a    &03B1;
//! t    &03C4;";
//!
//! let (rules, _diagnostics) =
//!     RuleCompiler::from_reader(rules.as_bytes(), CompileOptions::new(Direction::Forward))?;
//! assert_eq!(rules.num_rules(), 4);
//!
//! let transliterator = Transliterator::new(rules);
//! let mut worker = transliterator.new_worker();
//! assert_eq!(worker.process_line("that, chat")?, "θατ, χατ");
//! # Ok(())
//! # }
//! ```

/// ルール記述のUnicodeエスケープ
pub mod codec;

/// 診断メッセージ
pub mod diagnostics;

/// 入力行への適用
pub mod engine;

/// エラー型の定義
pub mod errors;

/// 処理中の行の内部表現
pub mod line;

/// 行単位の読み込み
pub mod reader;

/// ルール定義のコンパイル
pub mod rules;

/// ルールのトークン
pub mod token;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use diagnostics::{Diagnostic, Diagnostics, Severity, Verbosity};
pub use engine::{Transliterator, Worker};
pub use rules::{compile_rules, RuleCompiler, RuleSet};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
