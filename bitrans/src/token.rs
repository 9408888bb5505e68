//! ルールのトークン
//!
//! ルールの入力・出力として使われる、エスケープ展開済みのバイト列を定義します。

use std::fmt;

use crate::codec::{self, Escape, ESCAPE_MARKER};
use crate::errors::{BitransError, Result};

/// エスケープ展開済みのバイト列
///
/// 実際の長さ([`Token::real_len`])とは別に、ルールの並べ替えにだけ使う
/// 優先度長([`Token::priority_len`])を持ちます。優先度長は区切り代替文字を1、
/// それ以外の文字を2として数えます。エスケープ1個は、展開後のバイト数に関係なく
/// 1文字(2)として数えます。
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    bytes: Vec<u8>,
    priority_len: usize,
}

impl Token {
    /// ルール定義の単語をデコードしてトークンを作成します。
    ///
    /// # 引数
    ///
    /// * `word` - 単語の生バイト列
    /// * `placeholder` - 現在の区切り代替文字
    /// * `line` - エラー報告用の行番号
    ///
    /// # エラー
    ///
    /// 16進数字が不正なエスケープを含む場合、[`BitransError::InvalidEscape`]を返します。
    pub(crate) fn decode(word: &[u8], placeholder: u8, line: usize) -> Result<Self> {
        let mut bytes = Vec::with_capacity(word.len());
        let mut priority_len = 0;
        let mut pos = 0;

        while pos < word.len() {
            let c = word[pos];
            let escape = if c == ESCAPE_MARKER {
                codec::scan_escape(word, pos)
            } else {
                Escape::Literal
            };
            match escape {
                Escape::Literal => {
                    bytes.push(c);
                    priority_len += if c == placeholder { 1 } else { 2 };
                    pos += 1;
                }
                Escape::Char(seq) => {
                    bytes.extend_from_slice(seq.as_bytes());
                    priority_len += 2;
                    pos += Escape::CONSUMED;
                }
                Escape::Invalid => {
                    return Err(BitransError::InvalidEscape {
                        line,
                        word: String::from_utf8_lossy(word).into_owned(),
                    });
                }
            }
        }

        Ok(Self {
            bytes,
            priority_len,
        })
    }

    /// トークンのバイト列を返します。
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 実際のバイト数を返します。
    #[inline(always)]
    pub fn real_len(&self) -> usize {
        self.bytes.len()
    }

    /// 並べ替え用の優先度長を返します。
    #[inline(always)]
    pub fn priority_len(&self) -> usize {
        self.priority_len
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("text", &String::from_utf8_lossy(&self.bytes))
            .field("real_len", &self.real_len())
            .field("priority_len", &self.priority_len)
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
