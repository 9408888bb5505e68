use crate::line::{LineBuffer, FILLER};
use crate::rules::CommentDelimiter;

const PADDING: u8 = b' ';

#[inline(always)]
fn is_separator(c: u8) -> bool {
    matches!(c, b' ' | b'.' | b',')
}

impl LineBuffer {
    /// 入力行を置換の前処理済みの状態で読み込みます。
    ///
    /// 1. 行の両端に空白を1文字ずつ付加します。
    /// 2. 先頭の文字が行全体のコメントの開始文字であれば、そこで終了します。
    /// 3. コメントの範囲(区切り文字を含む)を置換済みとしてマークします。
    /// 4. コメントの外側の空白・ピリオド・カンマを区切り代替文字に置き換え、
    ///    元の文字を`spacing`に記録します。元から区切り代替文字だった位置は
    ///    置換済みとしてマークし、出力時にそのまま残るようにします。
    ///
    /// 呼び出し側は、付加後の長さが[`max_len`](Self::max_len)を超えないことを
    /// 確認しておく必要があります。
    ///
    /// # 引数
    ///
    /// * `line` - 入力行
    /// * `placeholder` - 区切り代替文字
    /// * `comments` - コメント区切りのリスト
    ///
    /// # 戻り値
    ///
    /// 行全体がコメントであれば`true`
    pub(crate) fn preprocess(
        &mut self,
        line: &str,
        placeholder: u8,
        comments: &[CommentDelimiter],
    ) -> bool {
        self.clear();
        debug_assert!(line.len() + 2 <= self.max_len);

        let mut padded = Vec::with_capacity(line.len() + 2);
        padded.push(PADDING);
        padded.extend_from_slice(line.as_bytes());
        padded.push(PADDING);

        let whole_line = comments
            .iter()
            .any(|d| d.is_whole_line() && d.start == padded[1]);
        if whole_line {
            self.text.extend_from_slice(&padded);
            self.free.resize(padded.len(), false);
            self.spacing.resize(padded.len(), FILLER);
            return true;
        }

        // Closing delimiter of the comment currently open, if any.
        let mut closing: Option<u8> = None;
        for &c in &padded {
            if let Some(end) = closing {
                if c == end {
                    closing = None;
                }
                self.push(c, false, FILLER);
                continue;
            }
            if let Some(end) = comments
                .iter()
                .filter(|d| !d.is_whole_line())
                .find(|d| d.start == c)
                .and_then(|d| d.end)
            {
                closing = Some(end);
                self.push(c, false, FILLER);
                continue;
            }

            if c == placeholder {
                self.push(c, false, placeholder);
            } else if is_separator(c) {
                self.push(placeholder, true, c);
            } else {
                self.push(c, true, FILLER);
            }
        }
        false
    }
}
