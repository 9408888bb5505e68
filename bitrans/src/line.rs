//! 処理中の1行の内部表現
//!
//! 行は、長さが常に等しい3本のバイト列として保持されます。
//!
//! * `text` - 現在の内容。区切り文字は区切り代替文字に置き換えられています。
//! * `free` - その位置がまだ置換の対象になり得るかどうか。
//!   置換済みの位置とコメントの内側は`false`です。
//! * `spacing` - 区切り代替文字の位置に、出力時に戻す元の区切り文字。
//!
//! 行の両端には、左右の文脈を持たせるための番兵として空白が1文字ずつ付加されます。

mod preprocess;
mod render;

use std::iter;
use std::ops::Range;

/// 区切り文字以外の空き位置に入れる`spacing`の値
pub(crate) const FILLER: u8 = b'+';

/// 挿入された位置に入れる仮の値
const INSERTED: u8 = b' ';

/// 処理中の1行
#[derive(Default, Clone, Debug)]
pub struct LineBuffer {
    text: Vec<u8>,
    free: Vec<bool>,
    spacing: Vec<u8>,
    max_len: usize,
}

impl LineBuffer {
    /// 番兵を含めて最大`max_len`バイトを保持できる空のバッファを作成します。
    pub fn new(max_len: usize) -> Self {
        Self {
            text: Vec::with_capacity(max_len),
            free: Vec::with_capacity(max_len),
            spacing: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// 内容をクリアします。
    #[inline(always)]
    pub fn clear(&mut self) {
        self.text.clear();
        self.free.clear();
        self.spacing.clear();
    }

    /// 番兵を含む現在の長さを返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// 内容がなければ`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 番兵を含めて保持できる最大の長さを返します。
    #[inline(always)]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// 現在の内容を返します。
    #[inline(always)]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// 位置`i`が置換の対象になり得れば`true`を返します。
    #[inline(always)]
    pub fn is_free(&self, i: usize) -> bool {
        self.free[i]
    }

    /// 位置`i`の`spacing`の値を返します。
    #[inline(always)]
    pub fn spacing(&self, i: usize) -> u8 {
        self.spacing[i]
    }

    /// 範囲内のすべての位置が置換の対象になり得れば`true`を返します。
    pub fn is_span_free(&self, span: Range<usize>) -> bool {
        self.free[span].iter().all(|&f| f)
    }

    /// 範囲内の区切り代替文字から、置換後に残すべき区切り文字を決めます。
    ///
    /// 範囲内に区切り代替文字があれば、その最後のものの`spacing`を返します。
    /// なければ`default`を返します。
    pub fn separator_to_keep(&self, span: Range<usize>, placeholder: u8, default: u8) -> u8 {
        let mut keep = default;
        for i in span {
            if self.text[i] == placeholder {
                keep = self.spacing[i];
            }
        }
        keep
    }

    /// 位置`at`から`len_in`バイトを`output`で置き換えます。
    ///
    /// 長さが変わる場合は、3本の列すべての残りの部分をずらします。
    /// 書き込まれた区切り代替文字は空き位置のまま`spacing`に`sep_keep`を受け取り、
    /// それ以外のバイトは置換済みになります。
    ///
    /// 呼び出し側は、置換後の長さが[`max_len`](Self::max_len)を超えないことを
    /// 確認しておく必要があります。
    pub(crate) fn replace(
        &mut self,
        at: usize,
        len_in: usize,
        output: &[u8],
        placeholder: u8,
        sep_keep: u8,
    ) {
        let len_out = output.len();
        debug_assert!(at + len_in <= self.len());
        debug_assert!(self.len() + len_out <= self.max_len + len_in);

        if len_out > len_in {
            let n = len_out - len_in;
            self.text.splice(at..at, iter::repeat(INSERTED).take(n));
            self.free.splice(at..at, iter::repeat(true).take(n));
            self.spacing.splice(at..at, iter::repeat(INSERTED).take(n));
        } else if len_out < len_in {
            let n = len_in - len_out;
            self.text.drain(at..at + n);
            self.free.drain(at..at + n);
            self.spacing.drain(at..at + n);
        }

        for (i, &c) in output.iter().enumerate() {
            let pos = at + i;
            self.text[pos] = c;
            if c == placeholder {
                self.spacing[pos] = sep_keep;
            } else {
                self.spacing[pos] = b' ';
                self.free[pos] = false;
            }
        }
    }

    fn push(&mut self, c: u8, free: bool, spacing: u8) {
        self.text.push(c);
        self.free.push(free);
        self.spacing.push(spacing);
    }
}
