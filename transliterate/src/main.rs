//! ルール定義に基づいてテキストを変換するユーティリティ
//!
//! このバイナリは、ルール定義ファイルをコンパイルし、入力ファイル(または標準入力)の
//! 各行を変換して出力ファイル(または標準出力)に書き出します。
//! 診断メッセージは標準エラー出力に出力されます。

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bitrans::diagnostics::{Diagnostics, Severity, Verbosity};
use bitrans::engine::LocalRand;
use bitrans::errors::BitransError;
use bitrans::reader::LineReader;
use bitrans::rules::{CompileOptions, Direction, RuleCompiler, RuleSet};
use bitrans::Transliterator;

use clap::Parser;
use thiserror::Error;

/// 引数エラーの終了コード
const EXIT_ARGS: u8 = 8;
/// ルール定義・ファイル・行処理のエラーの終了コード
const EXIT_FAILURE: u8 = 2;
/// 入力の読み込みエラーの終了コード
const EXIT_READ: u8 = 4;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(
    name = "transliterate",
    version,
    about = "Bi-directional translation / substitution tool"
)]
struct Args {
    /// Applies the rules from left to right (default).
    #[clap(short = '1', conflicts_with = "reverse")]
    forward: bool,

    /// Applies the rules from right to left.
    #[clap(short = '2')]
    reverse: bool,

    /// Treats an alphabet mismatch in an IVTFF input file as an error.
    #[clap(short = 's', long)]
    strict: bool,

    /// Mute level: 0 shows everything, 1 only errors, 2 nothing.
    #[clap(
        short = 'm',
        long = "mute",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    mute: u8,

    /// Rules definition file.
    #[clap(short = 'f', long = "rules", default_value = "bit_rules.txt")]
    rules: PathBuf,

    /// Seed of the random source used for homophonic rules.
    #[clap(long, default_value_t = LocalRand::DEFAULT_SEED)]
    seed: u64,

    /// Input file. Reads from stdin if omitted.
    input: Option<PathBuf>,

    /// Output file. Writes to stdout if omitted.
    output: Option<PathBuf>,
}

impl Args {
    fn direction(&self) -> Direction {
        if self.reverse && !self.forward {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// 実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
enum CliError {
    /// ファイルを開けない
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// ルール定義のエラー
    #[error("error in rules definition {}: {source}", .path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: BitransError,
    },
    /// 入力の読み込みエラー
    #[error("error reading input: {0}")]
    Read(#[source] BitransError),
    /// 行処理のエラー
    #[error("error processing line: {0}")]
    Process(#[source] BitransError),
    /// 出力の書き込みエラー
    #[error("error writing output: {0}")]
    Write(#[from] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Read(_) => EXIT_READ,
            _ => EXIT_FAILURE,
        }
    }
}

/// 診断メッセージをしきい値に従って標準エラー出力に表示する
struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    fn report(&self, diagnostics: &Diagnostics) {
        for d in diagnostics.visible(self.verbosity) {
            eprintln!("{d}");
        }
    }

    fn note<S>(&self, severity: Severity, message: S)
    where
        S: Into<String>,
    {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(severity, message);
        self.report(&diagnostics);
    }
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// ルール定義をコンパイルします。
///
/// 失敗した場合も、それまでに発生した診断メッセージを返します。
fn compile<R>(rdr: R, options: CompileOptions) -> (Result<RuleSet, BitransError>, Diagnostics)
where
    R: BufRead,
{
    let mut compiler = RuleCompiler::new(options);
    if let Err(e) = compiler.read(rdr) {
        return (Err(e), compiler.take_diagnostics());
    }
    let mut diagnostics = compiler.take_diagnostics();
    match compiler.finish() {
        Ok((rules, mut rest)) => {
            diagnostics.append(&mut rest);
            (Ok(rules), diagnostics)
        }
        Err(e) => (Err(e), diagnostics),
    }
}

/// コンパイル済みのルール集合の概要
fn summarize(rules: &RuleSet) -> Diagnostics {
    let mut summary = Diagnostics::new();
    let alphabets = rules.alphabets();
    summary.info(format!(
        "Alphabet codes in rules file: {} {}",
        alphabets.input, alphabets.output
    ));
    summary.info(format!("Separator placeholder: {}", char::from(rules.placeholder())));
    summary.info(format!("{} substitution rules defined", rules.num_rules()));
    summary.info(format!("{} comments defined", rules.comments().len()));
    match rules.ambiguity() {
        Some(Direction::Forward) => summary.info("Rules file encodes ambiguous definitions"),
        Some(Direction::Reverse) => summary.info("Rules file decodes ambiguous definitions"),
        None => {}
    }
    summary
}

/// ルール定義をコンパイルし、入力の各行を変換して出力します。
fn run(args: &Args, reporter: &Reporter) -> Result<(), CliError> {
    reporter.note(
        Severity::Info,
        format!("Bi-directional translation / substitution tool (v {})", bitrans::VERSION),
    );

    reporter.note(
        Severity::Info,
        format!("Reading rules from {}", args.rules.display()),
    );
    let rdr = BufReader::new(open(&args.rules)?);
    let (compiled, diagnostics) = compile(rdr, CompileOptions::new(args.direction()));
    reporter.report(&diagnostics);
    let rules = compiled.map_err(|source| CliError::Rules {
        path: args.rules.clone(),
        source,
    })?;
    reporter.report(&summarize(&rules));

    let transliterator = Transliterator::new(rules).strict(args.strict);
    let mut worker = transliterator.new_worker_with(LocalRand::with_seed(args.seed));

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(|source| CliError::Open {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let is_tty = args.output.is_none() && atty::is(atty::Stream::Stdout);
    let mut out = BufWriter::new(output);

    let mut lines = LineReader::new(input);
    while let Some(line) = lines.next_line().map_err(CliError::Read)? {
        let processed = worker.process_line(&line);
        reporter.report(&worker.take_diagnostics());
        out.write_all(processed.map_err(CliError::Process)?.as_bytes())?;
        out.write_all(b"\n")?;
        if is_tty {
            out.flush()?;
        }
    }
    out.flush()?;

    if lines.saw_cr() {
        reporter.note(Severity::Warning, "input file has CR characters");
    }
    if lines.truncated() {
        reporter.note(Severity::Warning, "last line of input file truncated");
    }
    reporter.note(
        Severity::Info,
        format!("{} lines processed", worker.lines_processed()),
    );

    Ok(())
}

/// メイン関数
///
/// 引数のエラーは終了コード8、入力の読み込みエラーは4、
/// それ以外のエラーは2で終了します。
fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_ARGS } else { 0 };
            // Nothing more can be reported if stderr is gone.
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let reporter = Reporter {
        verbosity: Verbosity::from_level(args.mute).unwrap_or_default(),
    };
    match run(&args, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.note(Severity::Error, e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message()).collect()
    }

    #[test]
    fn test_summary() {
        let rdr = "##BIT  Eva- Cuva\n#=_\na x y\n".as_bytes();
        let (rules, _) = compile(rdr, CompileOptions::new(Direction::Forward));
        let summary = summarize(&rules.unwrap());
        assert_eq!(
            messages(&summary),
            vec![
                "Alphabet codes in rules file: Eva- Cuva",
                "Separator placeholder: _",
                "1 substitution rules defined",
                "0 comments defined",
                "Rules file encodes ambiguous definitions",
            ]
        );
    }

    #[test]
    fn test_compile_failure_keeps_diagnostics() {
        let rdr = "##BIT\n\na b\nc\n".as_bytes();
        let (rules, diagnostics) = compile(rdr, CompileOptions::new(Direction::Forward));
        assert!(matches!(rules, Err(BitransError::UnrecognizedRecord { line: 4, .. })));
        assert_eq!(diagnostics.count(Severity::Warning), 1);
    }

    #[test]
    fn test_compile_duplicates_keeps_earlier_diagnostics() {
        let rdr = "##BIT\r\na x\r\na y\r\n".as_bytes();
        let (rules, diagnostics) = compile(rdr, CompileOptions::new(Direction::Forward));
        assert!(matches!(rules, Err(BitransError::DuplicateRule { .. })));
        assert!(messages(&diagnostics).contains(&"rules definition has CR characters"));
    }
}
