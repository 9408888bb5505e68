//! 同音異字ルールの出力候補を選ぶ乱数源

/// 出力候補の選択に使う乱数源
///
/// 同じ列を返す実装を使えば、同音異字ルールを含む変換も再現できます。
pub trait RandomSource {
    /// `0..n`の範囲の値を1つ返します。
    ///
    /// `n`は常に2以上です。
    fn pick(&mut self, n: usize) -> usize;
}

impl<R> RandomSource for &mut R
where
    R: RandomSource + ?Sized,
{
    #[inline(always)]
    fn pick(&mut self, n: usize) -> usize {
        (**self).pick(n)
    }
}

/// 線形合同法による決定的な乱数源
///
/// 従来のツールと同じ系列を生成します。
///
/// ```
/// use bitrans::engine::{LocalRand, RandomSource};
///
/// let mut rand = LocalRand::new();
/// assert_eq!(rand.pick(1000), 454);
/// ```
#[derive(Debug, Clone)]
pub struct LocalRand {
    state: u64,
}

impl LocalRand {
    /// 既定のシード値
    pub const DEFAULT_SEED: u64 = 1;

    /// 既定のシード値で作成します。
    pub const fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// シード値を指定して作成します。
    pub const fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_value(&mut self) -> u64 {
        let s = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        self.state = (s / 65536) % 2048;
        self.state
    }
}

impl Default for LocalRand {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for LocalRand {
    fn pick(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.next_value() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_from_default_seed() {
        let mut rand = LocalRand::new();
        let values: Vec<usize> = (0..4).map(|_| rand.pick(2048)).collect();
        assert_eq!(values, vec![454, 1455, 1559, 1703]);
    }

    #[test]
    fn test_pick_in_range() {
        let mut rand = LocalRand::with_seed(12345);
        for n in 2..10 {
            for _ in 0..100 {
                assert!(rand.pick(n) < n);
            }
        }
    }

    #[test]
    fn test_reproducible() {
        let mut a = LocalRand::with_seed(7);
        let mut b = LocalRand::with_seed(7);
        for _ in 0..32 {
            assert_eq!(a.pick(3), b.pick(3));
        }
    }

    #[test]
    fn test_by_mut_reference() {
        fn draw<R: RandomSource>(mut rand: R) -> usize {
            rand.pick(2)
        }

        let mut rand = LocalRand::new();
        assert_eq!(draw(&mut rand), 0);
        assert_eq!(rand.pick(2), 1);
    }
}
