//! 診断メッセージの収集
//!
//! コンパイルと行処理の途中で発生した情報・警告・エラーを、
//! 重要度付きのデータとして蓄積します。各メッセージは同時に`log`ファサードにも流れます。
//! 表示するかどうかは呼び出し側が[`Verbosity`]で決め、制御フローには影響しません。

use std::fmt;

/// 診断メッセージの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// 情報
    Info,
    /// 警告
    Warning,
    /// エラー
    Error,
}

/// 表示する診断メッセージのしきい値
///
/// 値はコマンドラインの`-m`オプションに対応します。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// すべて表示する (`-m0`)
    #[default]
    All,
    /// 情報と警告を抑制する (`-m1`)
    Quiet,
    /// すべて抑制する (`-m2`)
    Silent,
}

impl Verbosity {
    /// 指定された重要度のメッセージを表示するかどうかを返します。
    pub fn shows(self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::Quiet => severity == Severity::Error,
            Self::Silent => false,
        }
    }

    /// `-m`オプションの値からしきい値を得ます。
    ///
    /// 0〜2以外の値は`None`です。
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::All),
            1 => Some(Self::Quiet),
            2 => Some(Self::Silent),
            _ => None,
        }
    }
}

/// 1件の診断メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
}

impl Diagnostic {
    /// 重要度を返します。
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// メッセージ本文を返します。
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.severity {
            Severity::Info => write!(f, "{}", self.message),
            Severity::Warning => write!(f, "W: {}", self.message),
            Severity::Error => write!(f, "E: {}", self.message),
        }
    }
}

/// 診断メッセージのリスト
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// 空のリストを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// メッセージを追加し、同じ内容を`log`にも出力します。
    pub fn push<S>(&mut self, severity: Severity, message: S)
    where
        S: Into<String>,
    {
        let message = message.into();
        match severity {
            Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
        self.entries.push(Diagnostic { severity, message });
    }

    /// 情報メッセージを追加します。
    pub fn info<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Info, message);
    }

    /// 警告メッセージを追加します。
    pub fn warn<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Warning, message);
    }

    /// エラーメッセージを追加します。
    pub fn error<S: Into<String>>(&mut self, message: S) {
        self.push(Severity::Error, message);
    }

    /// 別のリストの内容を末尾に移します。
    pub fn append(&mut self, other: &mut Self) {
        self.entries.append(&mut other.entries);
    }

    /// 蓄積されたメッセージを取り出し、リストを空にします。
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// すべてのメッセージを返します。
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// しきい値で表示対象となるメッセージだけを返します。
    pub fn visible(&self, verbosity: Verbosity) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(move |d| verbosity.shows(d.severity))
    }

    /// 指定された重要度のメッセージの件数を返します。
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// メッセージの件数を返します。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// メッセージがなければ`true`を返します。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_filter() {
        let mut diags = Diagnostics::new();
        diags.info("reading rules");
        diags.warn("empty rules record ignored");
        diags.error("multiple rules for ab");

        assert_eq!(diags.visible(Verbosity::All).count(), 3);
        let quiet: Vec<_> = diags.visible(Verbosity::Quiet).collect();
        assert_eq!(quiet.len(), 1);
        assert_eq!(quiet[0].to_string(), "E: multiple rules for ab");
        assert_eq!(diags.visible(Verbosity::Silent).count(), 0);
        // Filtering never drops entries.
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn test_from_level() {
        assert_eq!(Verbosity::from_level(0), Some(Verbosity::All));
        assert_eq!(Verbosity::from_level(2), Some(Verbosity::Silent));
        assert_eq!(Verbosity::from_level(3), None);
    }

    #[test]
    fn test_take_and_append() {
        let mut a = Diagnostics::new();
        a.warn("first");
        let mut b = a.take();
        assert!(a.is_empty());
        b.info("second");
        a.append(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.count(Severity::Warning), 1);
        assert!(b.is_empty());
    }
}
