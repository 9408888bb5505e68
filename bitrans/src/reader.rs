//! 行単位の読み込み
//!
//! ルール定義と入力テキストの両方で使う、改行を取り除いた行の読み込みを提供します。
//! CR文字は読み飛ばし、その存在だけを記録します。改行で終わらない最終行は
//! そのまま返し、途切れていたことを記録します。

use std::io::BufRead;

use crate::errors::Result;

/// 改行を取り除いた行を順に返すリーダー
pub struct LineReader<R> {
    rdr: R,
    buf: Vec<u8>,
    line_no: usize,
    saw_cr: bool,
    truncated: bool,
}

impl<R> LineReader<R>
where
    R: BufRead,
{
    /// 新しいリーダーを作成します。
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: vec![],
            line_no: 0,
            saw_cr: false,
            truncated: false,
        }
    }

    /// 次の行を読み込みます。
    ///
    /// # 戻り値
    ///
    /// 行があれば`Some`、入力の終わりに達していれば`None`
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合や、行がUTF-8として不正な場合にエラーを返します。
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.rdr.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else {
            self.truncated = true;
        }
        if self.buf.contains(&b'\r') {
            self.saw_cr = true;
            self.buf.retain(|&c| c != b'\r');
        }
        self.line_no += 1;

        Ok(Some(String::from_utf8(self.buf.clone())?))
    }

    /// これまでに読んだ行数を返します。
    #[inline(always)]
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// CR文字を読み飛ばしたことがあれば`true`を返します。
    #[inline(always)]
    pub fn saw_cr(&self) -> bool {
        self.saw_cr
    }

    /// 最終行が改行で終わっていなければ`true`を返します。
    #[inline(always)]
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl<R> Iterator for LineReader<R>
where
    R: BufRead,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
