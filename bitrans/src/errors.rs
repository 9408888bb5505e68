//! エラー型の定義
//!
//! このモジュールは、bitransライブラリで使用されるすべてのエラー型を定義します。
//! ルール定義のコンパイル時エラーと、行処理時のエラーの両方をここで扱います。

use std::error::Error;
use std::fmt;

use crate::rules::Direction;

/// bitrans専用のResult型
///
/// エラー型としてデフォルトで[`BitransError`]を使用します。
pub type Result<T, E = BitransError> = std::result::Result<T, E>;

/// bitransのエラー型
///
/// コンパイル時の構造的なエラー(ヘッダー、容量、重複ルール、未知のレコード)は
/// コンパイル全体を中断します。行処理時のエラーも実行全体を中断します。
#[derive(Debug, thiserror::Error)]
pub enum BitransError {
    /// ルール定義のヘッダーが不正
    #[error("line {line}: rules definition has no valid header: {msg}")]
    MalformedHeader {
        /// 行番号(1始まり)
        line: usize,
        /// エラーメッセージ
        msg: String,
    },

    /// 容量超過エラー
    ///
    /// [`CapacityError`]のエラーバリアント。
    #[error(transparent)]
    CapacityExceeded(CapacityError),

    /// 不正なUnicodeエスケープ
    #[error("line {line}: illegal unicode escape in token '{word}'")]
    InvalidEscape {
        /// 行番号(1始まり)
        line: usize,
        /// 問題のあるトークン
        word: String,
    },

    /// 同じ入力トークンを持つルールが複数存在する
    ///
    /// 検出されたすべての重複トークンを保持します。
    #[error("multiple rules for {}", .tokens.join(", "))]
    DuplicateRule {
        /// 重複している入力トークン
        tokens: Vec<String>,
    },

    /// ユーザーが要求した方向がルール定義で禁止されている
    #[error("user-requested direction {requested} forbidden, rules definition enforces direction {enforced}")]
    DirectionConflict {
        /// 要求された方向
        requested: Direction,
        /// ルール定義が強制する方向
        enforced: Direction,
    },

    /// 区切り文字の再定義が不正
    #[error("line {line}: invalid separator redefinition: {msg}")]
    InvalidSeparatorRedefinition {
        /// 行番号(1始まり)
        line: usize,
        /// エラーメッセージ
        msg: String,
    },

    /// 認識できないレコード
    #[error("line {line}: record not recognised: {record}")]
    UnrecognizedRecord {
        /// 行番号(1始まり)
        line: usize,
        /// レコードの内容
        record: String,
    },

    /// 入力ファイルのアルファベットがルール定義と一致しない(厳格モードのみ)
    #[error("alphabet in IVTFF file '{found}' does not match rules definition '{expected}'")]
    AlphabetMismatch {
        /// 入力ファイルのアルファベットコード
        found: String,
        /// ルール定義の入力アルファベットコード
        expected: String,
    },

    /// 行が長すぎる
    #[error("{kind} line {line} too long: {len} bytes (max {max})")]
    LineTooLong {
        /// 行の種類
        kind: LineKind,
        /// 行番号(1始まり)
        line: usize,
        /// 行の長さ
        len: usize,
        /// 許容される最大長
        max: usize,
    },

    /// 標準I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// UTF-8エンコーディングエラー
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl BitransError {
    /// ヘッダー不正エラーを生成します
    pub(crate) fn malformed_header<S>(line: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedHeader {
            line,
            msg: msg.into(),
        }
    }

    /// 容量超過エラーを生成します
    ///
    /// # 引数
    ///
    /// * `kind` - 超過した容量の種類
    /// * `limit` - 設定された上限
    pub(crate) fn capacity_exceeded(kind: Capacity, limit: usize) -> Self {
        Self::CapacityExceeded(CapacityError { kind, limit })
    }

    /// 区切り文字の再定義エラーを生成します
    pub(crate) fn invalid_separator<S>(line: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidSeparatorRedefinition {
            line,
            msg: msg.into(),
        }
    }

    /// 未知のレコードエラーを生成します
    pub(crate) fn unrecognized<S>(line: usize, record: S) -> Self
    where
        S: Into<String>,
    {
        Self::UnrecognizedRecord {
            line,
            record: record.into(),
        }
    }
}

/// 上限が設定されている容量の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// ルール数
    Rules,
    /// コメント区切りの数
    Comments,
    /// トークン格納領域の合計バイト数
    TokenStorage,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Comments => write!(f, "comment records"),
            Self::TokenStorage => write!(f, "combined token storage"),
        }
    }
}

/// 容量を超過した場合に使用されるエラー
#[derive(Debug)]
pub struct CapacityError {
    /// 超過した容量の種類
    pub(crate) kind: Capacity,

    /// 設定された上限
    pub(crate) limit: usize,
}

impl CapacityError {
    /// 超過した容量の種類を返します。
    pub fn kind(&self) -> Capacity {
        self.kind
    }

    /// 設定された上限を返します。
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CapacityError: too many {} (limit {})", self.kind, self.limit)
    }
}

impl Error for CapacityError {}

/// 長さ制限の対象となる行の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// ルール定義の行
    Rules,
    /// 入力テキストの行
    Input,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Input => write!(f, "input"),
        }
    }
}
