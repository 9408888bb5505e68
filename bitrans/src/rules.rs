//! ルール定義とそのコンパイル結果
//!
//! ルール定義は行指向のテキストです。
//!
//! ```text
//! ##BIT1 Eva- Cuva
//! #=_
//! #(comment)
//! {(comment)}
//! ch   C
//! sh   S
//! ------
//! a    A   Á
//! ```
//!
//! 1行目はヘッダーで、方向の強制と2つのアルファベット識別子を表します。
//! 2行目の`#=`で区切り代替文字を再定義できます。`(comment)`を含む行はコメント区切り、
//! `------`はソートブロック区切り、それ以外の2語以上の行が置換ルールです。
//! 詳細は[`RuleCompiler`]を参照してください。
//!
//! # 例
//!
//! ```
//! use bitrans::rules::{compile_rules, Direction};
//!
//! let (rules, _diagnostics) = compile_rules(["##BIT", "th Z", "t T"], Direction::Forward)?;
//! assert_eq!(rules.num_rules(), 2);
//! assert_eq!(rules.order().as_slice(), &[0, 1]);
//! # Ok::<(), bitrans::errors::BitransError>(())
//! ```

mod compiler;
pub mod orderer;
pub mod store;
pub mod tokenizer;

use std::fmt;

pub use compiler::{compile_rules, RuleCompiler};
pub use orderer::Order;
pub use store::{Rule, RuleStore};

/// 既定の区切り代替文字
pub const DEFAULT_PLACEHOLDER: u8 = b'#';

/// 変換の方向
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 方向1: 左から右。1語目が入力、残りが出力候補
    #[default]
    Forward,
    /// 方向2: 右から左。2語目以降がそれぞれ入力、1語目が出力
    Reverse,
}

impl Direction {
    /// ヘッダーやコマンドラインの`1`/`2`から方向を得ます。
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Forward),
            '2' => Some(Self::Reverse),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "1"),
            Self::Reverse => write!(f, "2"),
        }
    }
}

/// 4文字のアルファベット識別子
///
/// 置換処理には使われず、入力ファイルのヘッダーとの照合にだけ使われます。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlphabetCode([u8; 4]);

impl AlphabetCode {
    /// 未指定を表す空白4文字の識別子
    pub const BLANK: Self = Self(*b"    ");

    /// 4バイトから識別子を作成します。
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// 識別子のバイト列を返します。
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Default for AlphabetCode {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Display for AlphabetCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for AlphabetCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AlphabetCode({self})")
    }
}

/// 入力側・出力側のアルファベット識別子
///
/// 要求された方向に合わせて向きが揃えられています。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Alphabets {
    /// 入力側
    pub input: AlphabetCode,
    /// 出力側
    pub output: AlphabetCode,
}

/// コメント区切りの組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentDelimiter {
    /// 開始文字
    pub start: u8,
    /// 終了文字。`None`の場合は開始文字で始まる行全体がコメント
    pub end: Option<u8>,
}

impl CommentDelimiter {
    /// 行全体のコメントを表す場合に`true`を返します。
    #[inline(always)]
    pub fn is_whole_line(&self) -> bool {
        self.end.is_none()
    }
}

/// コンパイルの設定
///
/// 上限値の既定値は従来のツールの固定長テーブルと同じです。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub(crate) direction: Direction,
    pub(crate) max_rules: usize,
    pub(crate) max_comments: usize,
    pub(crate) max_token_storage: usize,
    pub(crate) max_rule_line_width: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new(Direction::Forward)
    }
}

impl CompileOptions {
    /// 指定された方向の既定設定を作成します。
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction,
            max_rules: 512,
            max_comments: 6,
            max_token_storage: 2048,
            max_rule_line_width: 64,
        }
    }

    /// ルール数の上限を指定します。
    pub const fn max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = max_rules;
        self
    }

    /// コメント区切りの数の上限を指定します。
    pub const fn max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    /// 入力側・出力側それぞれのトークン格納領域の上限(バイト)を指定します。
    ///
    /// トークン1個は長さ+1バイトを消費します。
    pub const fn max_token_storage(mut self, max_token_storage: usize) -> Self {
        self.max_token_storage = max_token_storage;
        self
    }

    /// ルール定義の行幅を指定します。1行に置けるのは幅-3バイトまでです。
    pub const fn max_rule_line_width(mut self, width: usize) -> Self {
        self.max_rule_line_width = width;
        self
    }

    /// 変換の方向を返します。
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// コンパイル済みのルール集合
///
/// ルールの格納領域と確定した適用順序、そして行処理に必要な設定
/// (区切り代替文字、コメント区切り、アルファベット識別子)をまとめて保持します。
/// 作成後は変更されません。
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) store: RuleStore,
    pub(crate) order: Order,
    pub(crate) direction: Direction,
    pub(crate) placeholder: u8,
    pub(crate) comments: Vec<CommentDelimiter>,
    pub(crate) alphabets: Alphabets,
    pub(crate) ambiguity: Option<Direction>,
}

impl RuleSet {
    /// ルールの格納領域を返します。
    #[inline(always)]
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// 適用順序を返します。
    #[inline(always)]
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// ルール数を返します。
    #[inline(always)]
    pub fn num_rules(&self) -> usize {
        self.store.len()
    }

    /// コンパイル時の方向を返します。
    #[inline(always)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 区切り代替文字を返します。
    #[inline(always)]
    pub fn placeholder(&self) -> u8 {
        self.placeholder
    }

    /// コメント区切りを返します。
    #[inline(always)]
    pub fn comments(&self) -> &[CommentDelimiter] {
        &self.comments
    }

    /// アルファベット識別子を返します。
    #[inline(always)]
    pub fn alphabets(&self) -> Alphabets {
        self.alphabets
    }

    /// 3語以上の置換レコードがあった場合、その時の方向を返します。
    ///
    /// 方向1なら曖昧な定義を符号化し、方向2なら復号することを意味します。
    #[inline(always)]
    pub fn ambiguity(&self) -> Option<Direction> {
        self.ambiguity
    }
}
