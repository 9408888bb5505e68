//! ユーティリティ関数を提供するモジュール

/// `haystack`の`from`以降で最初に`needle`が現れる位置を探します。
///
/// # 引数
///
/// * `haystack` - 検索対象のバイト列
/// * `needle` - 探すバイト列
/// * `from` - 検索を開始する位置
///
/// # 戻り値
///
/// 見つかった位置(`haystack`の先頭からのオフセット)。
/// `needle`が空の場合や`from`が範囲外の場合は`None`
pub fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find(b"#the#path#", b"th", 0), Some(1));
        assert_eq!(find(b"#the#path#", b"th", 2), Some(7));
        assert_eq!(find(b"#the#path#", b"th", 8), None);
        assert_eq!(find(b"abc", b"abc", 0), Some(0));
        assert_eq!(find(b"abc", b"abcd", 0), None);
    }

    #[test]
    fn test_find_edge_cases() {
        assert_eq!(find(b"abc", b"", 0), None);
        assert_eq!(find(b"abc", b"c", 3), None);
        assert_eq!(find(b"abc", b"c", 10), None);
        assert_eq!(find(b"", b"a", 0), None);
    }
}
