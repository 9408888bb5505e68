//! Unicodeエスケープのデコード
//!
//! ルール定義のトークン内では、`&XXXX;`(16進数4桁とセミコロン)で
//! 基本多言語面の任意の文字を表すことができます。このモジュールは
//! 16進数字の解釈と、コードポイントから1〜3バイトのUTF-8列への変換を行います。

/// エスケープの開始文字
pub const ESCAPE_MARKER: u8 = b'&';

/// エスケープの終端文字
pub const ESCAPE_TERMINATOR: u8 = b';';

/// エスケープ1個が占めるバイト数(`&XXXX;`)
const ESCAPE_LEN: usize = 6;

/// 1〜3バイトのUTF-8列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8Seq {
    bytes: [u8; 3],
    len: u8,
}

impl Utf8Seq {
    /// バイト列として返します。
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

/// 16進数字1文字を0〜15の値に変換します。
///
/// 受け付けるのは`0-9`と大文字の`A-F`だけです。
pub fn decode_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// コードポイント(0〜65535)を段階的なUTF-8符号化で1〜3バイトに変換します。
///
/// 65535を超える値は`None`です。
pub fn encode_codepoint(cp: u32) -> Option<Utf8Seq> {
    if cp < 0x80 {
        Some(Utf8Seq {
            bytes: [cp as u8, 0, 0],
            len: 1,
        })
    } else if cp < 0x800 {
        Some(Utf8Seq {
            bytes: [0xC0 | (cp >> 6) as u8, 0x80 | (cp & 0x3F) as u8, 0],
            len: 2,
        })
    } else if cp <= 0xFFFF {
        Some(Utf8Seq {
            bytes: [
                0xE0 | (cp >> 12) as u8,
                0x80 | ((cp >> 6) & 0x3F) as u8,
                0x80 | (cp & 0x3F) as u8,
            ],
            len: 3,
        })
    } else {
        None
    }
}

/// エスケープ開始文字の位置で読み取った結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escape {
    /// エスケープではない。開始文字をそのまま1バイトとして扱う
    Literal,
    /// デコードされた文字。エスケープ全体(6バイト)を消費する
    Char(Utf8Seq),
    /// 終端文字まで揃っているが16進数字が不正
    Invalid,
}

impl Escape {
    /// エスケープとして消費するバイト数
    pub(crate) const CONSUMED: usize = ESCAPE_LEN;
}

/// `word[pos]`にあるエスケープ開始文字を読み取ります。
///
/// 開始文字の後ろに4文字と終端文字が続かない場合はリテラル扱い、
/// 終端文字まで揃っていて16進数字が不正な場合はエラーです。
pub(crate) fn scan_escape(word: &[u8], pos: usize) -> Escape {
    debug_assert_eq!(word[pos], ESCAPE_MARKER);

    if word.len() < pos + ESCAPE_LEN {
        return Escape::Literal;
    }
    if word[pos + ESCAPE_LEN - 1] != ESCAPE_TERMINATOR {
        return Escape::Literal;
    }

    let mut cp = 0u32;
    for &c in &word[pos + 1..pos + ESCAPE_LEN - 1] {
        match decode_hex_digit(c) {
            Some(d) => cp = cp * 16 + u32::from(d),
            None => return Escape::Invalid,
        }
    }
    // No surrogates.
    if (0xD800..=0xDFFF).contains(&cp) {
        return Escape::Invalid;
    }
    encode_codepoint(cp).map_or(Escape::Invalid, Escape::Char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_digit() {
        assert_eq!(decode_hex_digit(b'0'), Some(0));
        assert_eq!(decode_hex_digit(b'9'), Some(9));
        assert_eq!(decode_hex_digit(b'A'), Some(10));
        assert_eq!(decode_hex_digit(b'F'), Some(15));
        assert_eq!(decode_hex_digit(b'a'), None);
        assert_eq!(decode_hex_digit(b'G'), None);
        assert_eq!(decode_hex_digit(b':'), None);
        assert_eq!(decode_hex_digit(b'@'), None);
    }

    #[test]
    fn test_encode_codepoint_tiers() {
        for cp in [0x41u32, 0x7F, 0x80, 0xE9, 0x7FF, 0x800, 0x20AC, 0xFFFD] {
            let c = char::from_u32(cp).unwrap();
            let mut buf = [0; 4];
            let expected = c.encode_utf8(&mut buf).as_bytes();
            assert_eq!(encode_codepoint(cp).unwrap().as_bytes(), expected);
        }
        assert_eq!(encode_codepoint(0xFFFF).unwrap().as_bytes().len(), 3);
        assert!(encode_codepoint(0x10000).is_none());
    }

    #[test]
    fn test_scan_escape() {
        assert_eq!(
            scan_escape(b"&0041;", 0),
            Escape::Char(encode_codepoint(0x41).unwrap())
        );
        assert_eq!(
            scan_escape(b"x&00E9;y", 1),
            Escape::Char(encode_codepoint(0xE9).unwrap())
        );
    }

    #[test]
    fn test_scan_escape_short_tail_is_literal() {
        assert_eq!(scan_escape(b"&", 0), Escape::Literal);
        assert_eq!(scan_escape(b"a&004", 1), Escape::Literal);
        assert_eq!(scan_escape(b"&0041", 0), Escape::Literal);
        // No terminator in the expected column.
        assert_eq!(scan_escape(b"&00410", 0), Escape::Literal);
        assert_eq!(scan_escape(b"&amp;x", 0), Escape::Literal);
    }

    #[test]
    fn test_scan_escape_bad_digits() {
        assert_eq!(scan_escape(b"&00g1;", 0), Escape::Invalid);
        assert_eq!(scan_escape(b"&zzzz;", 0), Escape::Invalid);
        assert_eq!(scan_escape(b"&D800;", 0), Escape::Invalid);
    }
}
