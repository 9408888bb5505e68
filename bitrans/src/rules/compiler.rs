use std::io::BufRead;

use crate::diagnostics::Diagnostics;
use crate::errors::{BitransError, Capacity, LineKind, Result};
use crate::reader::LineReader;
use crate::rules::orderer;
use crate::rules::store::RuleStore;
use crate::rules::tokenizer::{self, WordSpans};
use crate::rules::{
    AlphabetCode, Alphabets, CommentDelimiter, CompileOptions, Direction, RuleSet,
    DEFAULT_PLACEHOLDER,
};
use crate::token::Token;

const HEADER_MAGIC: &[u8] = b"##BIT";
const SEPARATOR_PREFIX: &[u8] = b"#=";
const COMMENT_MARKER: &[u8] = b"(comment)";
const BLOCK_DIVIDER: &[u8] = b"------";

/// ルール定義を1行ずつ受け取り、[`RuleSet`]を組み立てるコンパイラ
///
/// 1行目は必ずヘッダーとして解釈されます。2行目以降は単語数によって
/// 次のように振り分けられます。
///
/// * 0語: 警告を出して無視します。
/// * 1語: 区切り代替文字の再定義(`#=c`、2行目のみ)、コメント区切りの宣言
///   (`(comment)`を含む)、ソートブロック区切り(`------`)のいずれかです。
///   それ以外は致命的なエラーになります。
/// * 2語以上: 置換ルールです。向きは[`Direction`]に従います。
///
/// # 例
///
/// ```
/// use bitrans::rules::{CompileOptions, Direction, RuleCompiler};
///
/// let mut compiler = RuleCompiler::new(CompileOptions::new(Direction::Reverse));
/// compiler.add_line("##BIT")?;
/// compiler.add_line("a x y")?;
/// let (rules, _) = compiler.finish()?;
///
/// // x -> a, y -> a
/// assert_eq!(rules.num_rules(), 2);
/// # Ok::<(), bitrans::errors::BitransError>(())
/// ```
pub struct RuleCompiler {
    options: CompileOptions,
    line_no: usize,
    placeholder: u8,
    comments: Vec<CommentDelimiter>,
    store: RuleStore,
    alphabets: Alphabets,
    ambiguity: Option<Direction>,
    diagnostics: Diagnostics,
}

impl RuleCompiler {
    /// 新しいコンパイラを作成します。
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            line_no: 0,
            placeholder: DEFAULT_PLACEHOLDER,
            comments: vec![],
            store: RuleStore::with_limits(options.max_rules, options.max_token_storage),
            alphabets: Alphabets::default(),
            ambiguity: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// リーダーからルール定義を読み込み、コンパイルします。
    ///
    /// # 引数
    ///
    /// * `rdr` - ルール定義のリーダー
    /// * `options` - コンパイルの設定
    ///
    /// # 戻り値
    ///
    /// コンパイル済みのルール集合と、途中で発生した診断メッセージ
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合や、ルール定義が不正な場合にエラーを返します。
    pub fn from_reader<R>(rdr: R, options: CompileOptions) -> Result<(RuleSet, Diagnostics)>
    where
        R: BufRead,
    {
        let mut compiler = Self::new(options);
        compiler.read(rdr)?;
        compiler.finish()
    }

    /// リーダーの残りの行をすべて処理します。
    ///
    /// エラーで中断した場合も、それまでの診断メッセージは
    /// [`diagnostics`](Self::diagnostics)から取得できます。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合や、行が不正な場合にエラーを返します。
    pub fn read<R>(&mut self, rdr: R) -> Result<()>
    where
        R: BufRead,
    {
        let mut lines = LineReader::new(rdr);
        while let Some(line) = lines.next_line()? {
            self.add_line(&line)?;
        }
        if lines.saw_cr() {
            self.diagnostics.warn("rules definition has CR characters");
        }
        if lines.truncated() {
            self.diagnostics.warn("last line of rules definition truncated");
        }
        Ok(())
    }

    /// 次の1行を処理します。
    ///
    /// # エラー
    ///
    /// 行が長すぎる場合、ヘッダーやレコードが不正な場合、
    /// 容量を超えた場合にエラーを返します。
    pub fn add_line(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;
        let line = line.as_bytes();

        let max = self.options.max_rule_line_width.saturating_sub(3);
        if line.len() > max {
            return Err(BitransError::LineTooLong {
                kind: LineKind::Rules,
                line: self.line_no,
                len: line.len(),
                max,
            });
        }

        if self.line_no == 1 {
            return self.read_header(line);
        }

        let words = tokenizer::split_words(line);
        if words.dropped() != 0 {
            self.diagnostics.warn(format!(
                "line {}: more than {} words, {} ignored",
                self.line_no,
                tokenizer::MAX_WORDS,
                words.dropped()
            ));
        }
        match words.len() {
            0 => {
                self.diagnostics
                    .warn(format!("line {}: empty rules record ignored", self.line_no));
                Ok(())
            }
            1 => self.read_special(line, words.word(line, 0)),
            _ => self.read_substitution(line, &words),
        }
    }

    /// これまでに発生した診断メッセージを返します。
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// これまでに発生した診断メッセージを取り出します。
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        self.diagnostics.take()
    }

    /// 重複を検査して適用順序を確定し、ルール集合を返します。
    ///
    /// # エラー
    ///
    /// 1行も処理していない場合は[`BitransError::MalformedHeader`]を、
    /// 入力トークンが重複している場合は[`BitransError::DuplicateRule`]を返します。
    pub fn finish(mut self) -> Result<(RuleSet, Diagnostics)> {
        if self.line_no == 0 {
            return Err(BitransError::malformed_header(1, "rules definition is empty"));
        }
        if self.store.is_empty() {
            self.diagnostics.warn("no substitution rules defined");
        }

        let order = orderer::order_rules(&self.store, &mut self.diagnostics)?;
        let rules = RuleSet {
            store: self.store,
            order,
            direction: self.options.direction,
            placeholder: self.placeholder,
            comments: self.comments,
            alphabets: self.alphabets,
            ambiguity: self.ambiguity,
        };
        Ok((rules, self.diagnostics))
    }

    fn read_header(&mut self, line: &[u8]) -> Result<()> {
        if !line.starts_with(HEADER_MAGIC) {
            return Err(BitransError::malformed_header(
                self.line_no,
                format!(
                    "expected '{}', found '{}'",
                    String::from_utf8_lossy(HEADER_MAGIC),
                    String::from_utf8_lossy(line)
                ),
            ));
        }

        let requested = self.options.direction;
        match line.get(5).and_then(|&c| Direction::from_digit(char::from(c))) {
            Some(enforced) if enforced != requested => {
                return Err(BitransError::DirectionConflict {
                    requested,
                    enforced,
                });
            }
            Some(enforced) => {
                self.diagnostics
                    .info(format!("Rules file enforces direction {enforced}"));
            }
            None => self.diagnostics.info("Rules file is bi-directional"),
        }

        if line.len() >= 16 {
            let first = alphabet_at(line, 7);
            let second = alphabet_at(line, 12);
            self.alphabets = match requested {
                Direction::Forward => Alphabets {
                    input: first,
                    output: second,
                },
                Direction::Reverse => Alphabets {
                    input: second,
                    output: first,
                },
            };
            log::debug!(
                "alphabets: input '{}', output '{}'",
                self.alphabets.input,
                self.alphabets.output
            );
        }
        Ok(())
    }

    fn read_special(&mut self, line: &[u8], word: &[u8]) -> Result<()> {
        if word.starts_with(SEPARATOR_PREFIX) {
            return self.redefine_separator(word);
        }
        if let Some(i0) = find_marker(line, COMMENT_MARKER) {
            return self.add_comment(line, i0);
        }
        if word == BLOCK_DIVIDER {
            if self.store.block_last() {
                log::debug!("sort block divider after rule {}", self.store.len() - 1);
            } else {
                self.diagnostics.warn(format!(
                    "line {}: sort block divider before any rule ignored",
                    self.line_no
                ));
            }
            return Ok(());
        }
        Err(BitransError::unrecognized(
            self.line_no,
            String::from_utf8_lossy(line),
        ))
    }

    fn redefine_separator(&mut self, word: &[u8]) -> Result<()> {
        if self.line_no != 2 {
            return Err(BitransError::invalid_separator(
                self.line_no,
                "separator may only be redefined on line 2",
            ));
        }
        let c = match word {
            [_, _, c] => *c,
            _ => {
                return Err(BitransError::invalid_separator(
                    self.line_no,
                    "expected '#=' followed by a single character",
                ));
            }
        };
        if !c.is_ascii_graphic() || c == crate::codec::ESCAPE_MARKER {
            return Err(BitransError::invalid_separator(
                self.line_no,
                format!("'{}' cannot be used as separator", char::from(c)),
            ));
        }
        self.placeholder = c;
        self.diagnostics
            .info(format!("Separator redefined as {}", char::from(c)));
        Ok(())
    }

    fn add_comment(&mut self, line: &[u8], i0: usize) -> Result<()> {
        if i0 == 0 {
            return Err(BitransError::unrecognized(
                self.line_no,
                String::from_utf8_lossy(line),
            ));
        }
        let start = line[i0 - 1];
        let end = match line.get(i0 + COMMENT_MARKER.len()) {
            Some(b' ') => None,
            Some(&c) => Some(c),
            None => {
                self.diagnostics.warn(format!(
                    "line {}: comment record short - space added",
                    self.line_no
                ));
                None
            }
        };
        if !start.is_ascii() || end.is_some_and(|c| !c.is_ascii()) {
            return Err(BitransError::unrecognized(
                self.line_no,
                String::from_utf8_lossy(line),
            ));
        }

        if self.comments.len() >= self.options.max_comments {
            return Err(BitransError::capacity_exceeded(
                Capacity::Comments,
                self.options.max_comments,
            ));
        }
        log::debug!(
            "comment delimiters '{}' ... '{}'",
            char::from(start),
            end.map_or(' ', char::from)
        );
        self.comments.push(CommentDelimiter { start, end });
        Ok(())
    }

    fn read_substitution(&mut self, line: &[u8], words: &WordSpans) -> Result<()> {
        let direction = self.options.direction;
        if words.len() > 2 {
            self.ambiguity = Some(direction);
        }

        let tokens = (0..words.len())
            .map(|i| Token::decode(words.word(line, i), self.placeholder, self.line_no))
            .collect::<Result<Vec<_>>>()?;

        match direction {
            Direction::Forward => {
                let mut tokens = tokens.into_iter();
                // split_words returned at least two words.
                if let Some(input) = tokens.next() {
                    self.store.push(input, tokens.collect())?;
                }
            }
            Direction::Reverse => {
                let output = &tokens[0];
                for input in &tokens[1..] {
                    self.store.push(input.clone(), vec![output.clone()])?;
                }
            }
        }
        Ok(())
    }
}

/// 行のリストからルール集合をコンパイルします。
///
/// 上限値には既定の[`CompileOptions`]が使われます。
///
/// # 引数
///
/// * `lines` - ルール定義の各行(改行を含まない)
/// * `direction` - 変換の方向
///
/// # 戻り値
///
/// コンパイル済みのルール集合と、途中で発生した診断メッセージ
///
/// # エラー
///
/// ルール定義が不正な場合にエラーを返します。
pub fn compile_rules<I, S>(lines: I, direction: Direction) -> Result<(RuleSet, Diagnostics)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut compiler = RuleCompiler::new(CompileOptions::new(direction));
    for line in lines {
        compiler.add_line(line.as_ref())?;
    }
    compiler.finish()
}

fn alphabet_at(line: &[u8], pos: usize) -> AlphabetCode {
    let mut code = [b' '; 4];
    code.copy_from_slice(&line[pos..pos + 4]);
    AlphabetCode::new(code)
}

fn find_marker(line: &[u8], marker: &[u8]) -> Option<usize> {
    line.windows(marker.len()).position(|w| w == marker)
}
