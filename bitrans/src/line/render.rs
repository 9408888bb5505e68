use crate::errors::Result;
use crate::line::LineBuffer;

impl LineBuffer {
    /// 番兵を取り除き、区切り代替文字を元の区切り文字に戻した文字列を作ります。
    ///
    /// 置換の対象になり得る区切り代替文字だけが`spacing`の値に戻されます。
    /// 元から区切り代替文字だった位置は置換済みなので、そのまま出力されます。
    ///
    /// # エラー
    ///
    /// 結果がUTF-8として不正な場合にエラーを返します。
    pub fn render(&self, placeholder: u8) -> Result<String> {
        let end = self.len().saturating_sub(1);
        let mut out = Vec::with_capacity(end);
        for i in 1..end {
            let c = self.text[i];
            if self.free[i] && c == placeholder {
                out.push(self.spacing[i]);
            } else {
                out.push(c);
            }
        }
        Ok(String::from_utf8(out)?)
    }
}
