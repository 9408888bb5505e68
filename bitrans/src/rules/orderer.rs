//! ルールの重複検査と優先順位付け
//!
//! 長い(具体的な)トークンほど先に試されるように、入力トークンの優先度長の
//! 降順でルールを並べます。これにより、1回の貪欲な走査で後戻りなしに
//! 最長一致が実現されます。

use hashbrown::HashMap;

use crate::diagnostics::Diagnostics;
use crate::errors::{BitransError, Result};
use crate::rules::store::RuleStore;

/// ルールの適用順序
///
/// ルールのインデックスの順列です。一度確定すると行処理中は変化しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    indices: Vec<usize>,
}

impl Order {
    /// 優先度長の降順に安定なバブルソートで並べます。
    ///
    /// ソート前の位置`i`のルールが入れ替え不可の場合、位置`i`と`i + 1`の間の
    /// 入れ替えは行われません。つまり区切りの前後にあるルールの集合は固定され、
    /// それぞれの中でだけ並べ替えが行われます。
    pub(crate) fn sort(store: &RuleStore) -> Self {
        let mut indices: Vec<usize> = (0..store.len()).collect();
        let blocked: Vec<bool> = store.iter().map(|r| !r.reorderable()).collect();

        let mut end = indices.len().saturating_sub(1);
        let mut swapped = true;
        while swapped && end > 0 {
            swapped = false;
            for slot in 0..end {
                let lhs = store[indices[slot]].input().priority_len();
                let rhs = store[indices[slot + 1]].input().priority_len();
                if rhs > lhs {
                    if blocked[slot] {
                        log::debug!("swap blocked at position {slot}");
                    } else {
                        indices.swap(slot, slot + 1);
                        swapped = true;
                    }
                }
            }
            end -= 1;
        }

        Self { indices }
    }

    /// 適用順のルールインデックスを返します。
    #[inline(always)]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// 適用順にルールインデックスを返します。
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// ルール数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// ルールがなければ`true`を返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// 同じ入力トークンを持つルールを探します。
///
/// 重複しているトークンを、最初に現れたルールの順に1回ずつ返します。
pub(crate) fn find_duplicates(store: &RuleStore) -> Vec<String> {
    // (first index, occurrences) per input token
    let mut seen: HashMap<&[u8], (usize, usize)> = HashMap::with_capacity(store.len());
    for (i, rule) in store.iter().enumerate() {
        seen.entry(rule.input().as_bytes())
            .and_modify(|(_, n)| *n += 1)
            .or_insert((i, 1));
    }

    let mut duplicates: Vec<(usize, &[u8])> = seen
        .into_iter()
        .filter(|(_, (_, n))| *n > 1)
        .map(|(token, (first, _))| (first, token))
        .collect();
    duplicates.sort_unstable_by_key(|&(first, _)| first);
    duplicates
        .into_iter()
        .map(|(_, token)| String::from_utf8_lossy(token).into_owned())
        .collect()
}

/// 重複を検査し、適用順序を確定します。
///
/// # エラー
///
/// 重複が1件でもあれば、すべての重複トークンを含む
/// [`BitransError::DuplicateRule`]を返します。
pub(crate) fn order_rules(store: &RuleStore, diagnostics: &mut Diagnostics) -> Result<Order> {
    diagnostics.info(format!("Analysing {} substitution rules", store.len()));
    if store.len() < 2 {
        diagnostics.info("Only one rule, no analysis necessary");
        return Ok(Order::sort(store));
    }

    let duplicates = find_duplicates(store);
    if !duplicates.is_empty() {
        for token in &duplicates {
            diagnostics.error(format!("multiple rules for {token}"));
        }
        return Err(BitransError::DuplicateRule { tokens: duplicates });
    }

    Ok(Order::sort(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::token::Token;

    fn store_of(inputs: &[&str], blocked_after: &[usize]) -> RuleStore {
        let mut store = RuleStore::with_limits(64, 1024);
        for (i, input) in inputs.iter().enumerate() {
            let input = Token::decode(input.as_bytes(), b'#', 1).unwrap();
            let output = Token::decode(b"x", b'#', 1).unwrap();
            store.push(input, vec![output]).unwrap();
            if blocked_after.contains(&i) {
                store.block_last();
            }
        }
        store
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let store = store_of(&["a", "bcd", "e", "fg", "hij"], &[]);
        let order = Order::sort(&store);
        assert_eq!(order.as_slice(), &[1, 4, 3, 0, 2]);
    }

    #[test]
    fn test_sort_uses_priority_length() {
        // "#a" has priority 3, "ab" has 4, "a" has 2.
        let store = store_of(&["a", "#a", "ab"], &[]);
        let order = Order::sort(&store);
        assert_eq!(order.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_divider_freezes_boundary() {
        // Divider after rule 1: {0, 1} and {2, 3} never mix.
        let store = store_of(&["a", "bc", "def", "g"], &[1]);
        let order = Order::sort(&store);
        assert_eq!(order.as_slice(), &[1, 0, 2, 3]);

        let store = store_of(&["a", "bc", "def", "g"], &[]);
        let order = Order::sort(&store);
        assert_eq!(order.as_slice(), &[2, 1, 0, 3]);
    }

    #[test]
    fn test_divider_between_two_rules() {
        let store = store_of(&["a", "bc"], &[0]);
        assert_eq!(Order::sort(&store).as_slice(), &[0, 1]);
    }

    #[test]
    fn test_find_duplicates_reports_all() {
        let store = store_of(&["ab", "c", "d", "c", "ab", "ab"], &[]);
        assert_eq!(find_duplicates(&store), vec!["ab", "c"]);
    }

    #[test]
    fn test_order_rules_duplicate() {
        let store = store_of(&["x", "ab", "ab"], &[]);
        let mut diags = Diagnostics::new();
        let err = order_rules(&store, &mut diags).unwrap_err();
        match err {
            BitransError::DuplicateRule { tokens } => assert_eq!(tokens, vec!["ab"]),
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(diags.count(crate::diagnostics::Severity::Error), 1);
    }

    #[test]
    fn test_order_rules_single() {
        let store = store_of(&["x"], &[]);
        let mut diags = Diagnostics::new();
        let order = order_rules(&store, &mut diags).unwrap();
        assert_eq!(order.as_slice(), &[0]);
    }
}
