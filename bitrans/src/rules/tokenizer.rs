//! ルール定義の1行を単語に分割します。

use std::ops::Range;

/// 1行から取り出す単語の最大数
pub const MAX_WORDS: usize = 8;

/// 1行を分割した結果
///
/// 各単語の開始・終了バイト位置を保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpans {
    spans: Vec<Range<usize>>,
    dropped: usize,
}

impl WordSpans {
    /// 取り出した単語の数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// 単語がなければ`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// `MAX_WORDS`を超えたために捨てた単語の数を返します。
    #[inline(always)]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 各単語のバイト範囲を返します。
    #[inline(always)]
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// `i`番目の単語を`line`から切り出します。
    #[inline(always)]
    pub fn word<'a>(&self, line: &'a [u8], i: usize) -> &'a [u8] {
        &line[self.spans[i].clone()]
    }
}

/// 空白文字(スペースのみ)の並びで行を分割します。
///
/// 先頭から最大[`MAX_WORDS`]個の単語を保持し、それ以降は数だけを記録します。
pub fn split_words(line: &[u8]) -> WordSpans {
    let mut spans = Vec::with_capacity(MAX_WORDS);
    let mut dropped = 0;
    let mut start = None;

    for (i, &c) in line.iter().enumerate() {
        match (c == b' ', start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                push_span(&mut spans, &mut dropped, s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_span(&mut spans, &mut dropped, s..line.len());
    }

    WordSpans { spans, dropped }
}

fn push_span(spans: &mut Vec<Range<usize>>, dropped: &mut usize, span: Range<usize>) {
    if spans.len() < MAX_WORDS {
        spans.push(span);
    } else {
        *dropped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        let line = b"  ch  x y ";
        let words = split_words(line);
        assert_eq!(words.len(), 3);
        assert_eq!(words.spans(), &[2..4, 6..7, 8..9]);
        assert_eq!(words.word(line, 0), b"ch");
        assert_eq!(words.word(line, 2), b"y");
        assert_eq!(words.dropped(), 0);
    }

    #[test]
    fn test_blank_line() {
        assert!(split_words(b"").is_empty());
        assert!(split_words(b"    ").is_empty());
    }

    #[test]
    fn test_tabs_are_not_separators() {
        let words = split_words(b"a\tb c");
        assert_eq!(words.len(), 2);
        assert_eq!(words.word(b"a\tb c", 0), b"a\tb");
    }

    #[test]
    fn test_truncated_at_max_words() {
        let line = b"a b c d e f g h i j";
        let words = split_words(line);
        assert_eq!(words.len(), MAX_WORDS);
        assert_eq!(words.word(line, 7), b"h");
        assert_eq!(words.dropped(), 2);
    }
}
