//! ルール集合を入力行に適用する変換器。
//!
//! # 主要な構造体
//!
//! - [`Transliterator`]: コンパイル済みのルール集合と行処理の設定を保持する構造体
//! - [`Worker`]: 変換器のワーカー。行バッファと乱数源を保持し、実際の行処理を行う
//!
//! # 例
//!
//! ```
//! use bitrans::rules::{compile_rules, Direction};
//! use bitrans::Transliterator;
//!
//! let (rules, _) = compile_rules(["##BIT", "#=_", "ch C", "a A"], Direction::Forward)?;
//! let transliterator = Transliterator::new(rules);
//! let mut worker = transliterator.new_worker();
//!
//! assert_eq!(worker.process_line("chacha, cha")?, "CACA, CA");
//! # Ok::<(), bitrans::errors::BitransError>(())
//! ```
pub mod random;
mod substitution;
pub mod worker;

use std::sync::Arc;

use crate::rules::RuleSet;

pub use random::{LocalRand, RandomSource};
pub use worker::{process_line, EngineState, Worker};

/// 既定の行幅
pub const DEFAULT_MAX_LINE_WIDTH: usize = 2048;

/// ルール集合を入力行に適用する変換器。
///
/// ルール集合は`Arc`で保持されるため、複数のワーカーで共有できます。
/// 各ワーカーは自分の乱数源と行バッファを持ちます。
#[derive(Clone)]
pub struct Transliterator {
    rules: Arc<RuleSet>,
    pub(crate) strict: bool,
    pub(crate) max_line_width: usize,
}

impl Transliterator {
    /// 新しい変換器を作成します。
    ///
    /// # 引数
    ///
    /// * `rules` - コンパイル済みのルール集合
    pub fn new(rules: RuleSet) -> Self {
        Self::from_shared_rules(Arc::new(rules))
    }

    /// 共有されたルール集合から新しい変換器を作成します。
    ///
    /// # 引数
    ///
    /// * `rules` - 共有されるルール集合への`Arc`参照
    pub fn from_shared_rules(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            strict: false,
            max_line_width: DEFAULT_MAX_LINE_WIDTH,
        }
    }

    /// 厳格モードを設定します。
    ///
    /// 厳格モードでは、IVTFF形式の入力ファイルのアルファベットがルール定義と
    /// 一致しない場合に[`AlphabetMismatch`](crate::errors::BitransError::AlphabetMismatch)
    /// エラーになります。既定では警告だけが出ます。
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// 行幅を設定します。
    ///
    /// 入力行は幅-3バイトまでで、置換で行が伸びる場合も同じ上限が適用されます。
    ///
    /// # 引数
    ///
    /// * `width` - 行幅。既定値は[`DEFAULT_MAX_LINE_WIDTH`]
    pub fn max_line_width(mut self, width: usize) -> Self {
        self.max_line_width = width;
        self
    }

    /// ルール集合を返します。
    #[inline(always)]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 厳格モードであれば`true`を返します。
    #[inline(always)]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// 既定のシード値の[`LocalRand`]を使うワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        self.new_worker_with(LocalRand::new())
    }

    /// 指定された乱数源を使うワーカーを作成します。
    pub fn new_worker_with<R>(&self, rand: R) -> Worker<R>
    where
        R: RandomSource,
    {
        Worker::new(self.clone(), rand)
    }
}
