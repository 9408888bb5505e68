//! 行処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは行バッファと乱数源を保持し、それらを行をまたいで再利用します。
use std::borrow::Cow;

use crate::diagnostics::Diagnostics;
use crate::engine::random::{LocalRand, RandomSource};
use crate::engine::substitution::{self, LineContext};
use crate::engine::Transliterator;
use crate::errors::{BitransError, LineKind, Result};
use crate::line::LineBuffer;
use crate::rules::RuleSet;

/// 置換を`log::trace!`に出力する行数
pub const TRACE_LINES: usize = 10;

const IVTFF_MAGIC: &[u8] = b"#=IVTFF";
const IVTFF_CODE: std::ops::Range<usize> = 8..12;

/// 実行全体にわたる行処理の状態
///
/// 乱数源の状態は行をまたいで引き継がれます。
pub struct EngineState<R = LocalRand> {
    rand: R,
    buf: LineBuffer,
    strict: bool,
    ivtff: bool,
    lines_processed: usize,
    diagnostics: Diagnostics,
}

impl<R> EngineState<R>
where
    R: RandomSource,
{
    /// 新しい状態を作成します。
    ///
    /// # 引数
    ///
    /// * `rand` - 同音異字ルールの出力候補の選択に使う乱数源
    /// * `max_line_width` - 行幅。入力行は幅-3バイトまで保持できます。
    pub fn new(rand: R, max_line_width: usize) -> Self {
        Self {
            rand,
            buf: LineBuffer::new(max_line_width.saturating_sub(1)),
            strict: false,
            ivtff: false,
            lines_processed: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// 厳格モードを設定します。
    ///
    /// 厳格モードでは、入力ファイルのアルファベットがルール定義と一致しない場合に
    /// エラーになります。
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// 処理した行数を返します。
    #[inline(always)]
    pub fn lines_processed(&self) -> usize {
        self.lines_processed
    }

    /// 入力がIVTFF形式と判定されていれば`true`を返します。
    #[inline(always)]
    pub fn is_ivtff(&self) -> bool {
        self.ivtff
    }

    /// 蓄積された診断メッセージを返します。
    #[inline(always)]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// 蓄積された診断メッセージを取り出します。
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.diagnostics.take()
    }

    /// 1行目がIVTFFヘッダーであれば、アルファベット識別子を照合します。
    ///
    /// 識別子がルール定義の入力側と一致すれば出力側に書き換えた行を返します。
    fn check_header<'a>(&mut self, line: &'a str, rules: &RuleSet) -> Result<Cow<'a, str>> {
        let bytes = line.as_bytes();
        if !bytes.starts_with(IVTFF_MAGIC) {
            return Ok(Cow::Borrowed(line));
        }
        self.ivtff = true;
        self.diagnostics.info("Input file is in IVTFF format");

        let Some(code) = bytes.get(IVTFF_CODE) else {
            return Ok(Cow::Borrowed(line));
        };
        let alphabets = rules.alphabets();
        let found = String::from_utf8_lossy(code).into_owned();

        if code == alphabets.input.as_bytes() {
            let mut rewritten = bytes.to_vec();
            rewritten[IVTFF_CODE].copy_from_slice(alphabets.output.as_bytes());
            self.diagnostics.info(format!(
                "Alphabet in IVTFF file changed from {} to {}",
                alphabets.input, alphabets.output
            ));
            return Ok(Cow::Owned(String::from_utf8(rewritten)?));
        }

        let expected = alphabets.input.to_string();
        if self.strict {
            return Err(BitransError::AlphabetMismatch { found, expected });
        }
        self.diagnostics.warn(format!(
            "alphabet in IVTFF file: {found} does not match rules file: {expected}"
        ));
        Ok(Cow::Borrowed(line))
    }
}

/// コンパイル済みのルール集合を使って1行を処理します。
///
/// # 引数
///
/// * `line` - 改行を含まない入力行
/// * `rules` - コンパイル済みのルール集合
/// * `state` - 実行全体の状態
///
/// # 戻り値
///
/// 置換後の行。行全体がコメントの場合は入力行そのもの
///
/// # エラー
///
/// 行が長すぎる場合や、厳格モードでアルファベットが一致しない場合にエラーを返します。
pub fn process_line<R>(line: &str, rules: &RuleSet, state: &mut EngineState<R>) -> Result<String>
where
    R: RandomSource,
{
    let line_no = state.lines_processed + 1;
    let max = state.buf.max_len().saturating_sub(2);
    if line.len() > max {
        return Err(BitransError::LineTooLong {
            kind: LineKind::Input,
            line: line_no,
            len: line.len(),
            max,
        });
    }

    let line = if line_no == 1 {
        state.check_header(line, rules)?
    } else {
        Cow::Borrowed(line)
    };

    state.lines_processed = line_no;
    if line_no == TRACE_LINES + 1 {
        log::trace!("Substitution tracing stopped after {TRACE_LINES} lines");
    }

    if state
        .buf
        .preprocess(&line, rules.placeholder(), rules.comments())
    {
        log::debug!("line {line_no}: comment line");
        return Ok(line.into_owned());
    }

    let ctx = LineContext {
        line_no,
        default_separator: if state.ivtff { b'.' } else { b' ' },
        trace: line_no <= TRACE_LINES,
    };
    substitution::apply_rules(rules, &mut state.buf, &mut state.rand, &ctx)?;
    state.buf.render(rules.placeholder())
}

/// 行処理のためのルーチンを提供する構造体。
///
/// [`Transliterator`]と実行全体の状態を保持します。
///
/// # 例
///
/// ```
/// use bitrans::rules::{compile_rules, Direction};
/// use bitrans::Transliterator;
///
/// let (rules, _) = compile_rules(["##BIT", "th Z", "t T"], Direction::Forward)?;
/// let mut worker = Transliterator::new(rules).new_worker();
/// assert_eq!(worker.process_line("the path")?, "Ze paZ");
/// # Ok::<(), bitrans::errors::BitransError>(())
/// ```
pub struct Worker<R = LocalRand> {
    transliterator: Transliterator,
    state: EngineState<R>,
}

impl<R> Worker<R>
where
    R: RandomSource,
{
    /// 新しいインスタンスを作成します。
    pub(crate) fn new(transliterator: Transliterator, rand: R) -> Self {
        let state = EngineState::new(rand, transliterator.max_line_width)
            .strict(transliterator.strict);
        Self {
            transliterator,
            state,
        }
    }

    /// 1行を処理します。
    ///
    /// 詳細は[`process_line`]を参照してください。
    ///
    /// # エラー
    ///
    /// 行が長すぎる場合や、厳格モードでアルファベットが一致しない場合にエラーを返します。
    pub fn process_line(&mut self, line: &str) -> Result<String> {
        process_line(line, self.transliterator.rules(), &mut self.state)
    }

    /// 処理した行数を返します。
    #[inline(always)]
    pub fn lines_processed(&self) -> usize {
        self.state.lines_processed()
    }

    /// 入力がIVTFF形式と判定されていれば`true`を返します。
    #[inline(always)]
    pub fn is_ivtff(&self) -> bool {
        self.state.is_ivtff()
    }

    /// 蓄積された診断メッセージを返します。
    #[inline(always)]
    pub fn diagnostics(&self) -> &Diagnostics {
        self.state.diagnostics()
    }

    /// 蓄積された診断メッセージを取り出します。
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.state.take_diagnostics()
    }

    /// 使用している[`Transliterator`]を返します。
    #[inline(always)]
    pub fn transliterator(&self) -> &Transliterator {
        &self.transliterator
    }
}
