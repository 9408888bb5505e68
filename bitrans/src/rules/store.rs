//! コンパイル済みルールの格納領域

use crate::errors::{BitransError, Capacity, Result};
use crate::token::Token;

/// 1件の置換ルール
///
/// 入力トークン1個と、1個以上の出力候補を持ちます。
/// 出力候補が複数あるルールは同音異字(homophonic)ルールです。
#[derive(Debug, Clone)]
pub struct Rule {
    input: Token,
    outputs: Vec<Token>,
    reorderable: bool,
}

impl Rule {
    /// 入力トークンを返します。
    #[inline(always)]
    pub fn input(&self) -> &Token {
        &self.input
    }

    /// 出力候補を返します。
    #[inline(always)]
    pub fn outputs(&self) -> &[Token] {
        &self.outputs
    }

    /// 出力候補が複数あれば`true`を返します。
    #[inline(always)]
    pub fn is_homophonic(&self) -> bool {
        self.outputs.len() > 1
    }

    /// 並べ替えで次のルールと入れ替えてよければ`true`を返します。
    ///
    /// ソートブロック区切りの直前のルールは`false`です。
    #[inline(always)]
    pub fn reorderable(&self) -> bool {
        self.reorderable
    }
}

/// ルールの格納領域
///
/// ルールは作成順のインデックスで識別され、削除されることはありません。
/// ルール数とトークンの合計バイト数に上限があり、超えた時点でエラーになります。
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<Rule>,
    max_rules: usize,
    max_token_storage: usize,
    // Bytes used on the input and output side; each token costs its length + 1.
    storage: [usize; 2],
}

impl RuleStore {
    /// 上限を指定して空の格納領域を作成します。
    pub(crate) fn with_limits(max_rules: usize, max_token_storage: usize) -> Self {
        Self {
            rules: vec![],
            max_rules,
            max_token_storage,
            storage: [0, 0],
        }
    }

    /// ルールを追加します。
    ///
    /// # エラー
    ///
    /// ルール数またはトークン格納領域の上限を超える場合、
    /// [`BitransError::CapacityExceeded`]を返します。
    pub(crate) fn push(&mut self, input: Token, outputs: Vec<Token>) -> Result<()> {
        debug_assert!(!outputs.is_empty());

        if self.rules.len() >= self.max_rules {
            return Err(BitransError::capacity_exceeded(
                Capacity::Rules,
                self.max_rules,
            ));
        }

        let input_storage = self.storage[0] + input.real_len() + 1;
        let output_storage = self.storage[1]
            + outputs.iter().map(|t| t.real_len() + 1).sum::<usize>();
        if input_storage > self.max_token_storage || output_storage > self.max_token_storage {
            return Err(BitransError::capacity_exceeded(
                Capacity::TokenStorage,
                self.max_token_storage,
            ));
        }
        self.storage = [input_storage, output_storage];

        log::debug!(
            "adding rule {}: '{}' -> {} output(s)",
            self.rules.len(),
            input,
            outputs.len()
        );
        self.rules.push(Rule {
            input,
            outputs,
            reorderable: true,
        });
        Ok(())
    }

    /// 最後に追加したルールを、次のルールと入れ替え不可にします。
    ///
    /// ルールがまだなければ何もせず`false`を返します。
    pub(crate) fn block_last(&mut self) -> bool {
        match self.rules.last_mut() {
            Some(rule) => {
                rule.reorderable = false;
                true
            }
            None => false,
        }
    }

    /// ルール数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// ルールがなければ`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 作成順`i`番目のルールを返します。
    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<&Rule> {
        self.rules.get(i)
    }

    /// 作成順にルールを返します。
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

impl std::ops::Index<usize> for RuleStore {
    type Output = Rule;

    #[inline(always)]
    fn index(&self, i: usize) -> &Rule {
        &self.rules[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> Token {
        Token::decode(s.as_bytes(), b'#', 1).unwrap()
    }

    #[test]
    fn test_push_and_block() {
        let mut store = RuleStore::with_limits(4, 64);
        assert!(!store.block_last());

        store.push(token("a"), vec![token("x"), token("y")]).unwrap();
        store.push(token("b"), vec![token("z")]).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store[0].is_homophonic());
        assert!(!store[1].is_homophonic());

        assert!(store.block_last());
        assert!(store[0].reorderable());
        assert!(!store[1].reorderable());
    }

    #[test]
    fn test_rule_capacity() {
        let mut store = RuleStore::with_limits(1, 64);
        store.push(token("a"), vec![token("x")]).unwrap();
        let err = store.push(token("b"), vec![token("y")]).unwrap_err();
        match err {
            BitransError::CapacityExceeded(e) => {
                assert_eq!(e.kind(), Capacity::Rules);
                assert_eq!(e.limit(), 1);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_token_storage_capacity() {
        // "abc" costs 4 bytes on each side.
        let mut store = RuleStore::with_limits(10, 8);
        store.push(token("abc"), vec![token("abc")]).unwrap();
        store.push(token("abc"), vec![token("abc")]).unwrap();
        let err = store.push(token("a"), vec![token("b")]).unwrap_err();
        assert!(matches!(
            err,
            BitransError::CapacityExceeded(ref e) if e.kind() == Capacity::TokenStorage
        ));
        // A failed push leaves the store untouched.
        assert_eq!(store.len(), 2);
    }
}
