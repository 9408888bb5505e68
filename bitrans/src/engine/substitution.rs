//! ルールの適用

use crate::engine::random::RandomSource;
use crate::errors::{BitransError, LineKind, Result};
use crate::line::LineBuffer;
use crate::rules::RuleSet;
use crate::token::Token;
use crate::utils;

/// 1行の処理に関わる設定
pub(crate) struct LineContext {
    /// 行番号(1始まり)
    pub line_no: usize,
    /// 置換範囲に区切り代替文字がない場合に残す区切り文字
    pub default_separator: u8,
    /// 各置換を`log::trace!`に出力するかどうか
    pub trace: bool,
}

/// 前処理済みの行に、確定した順序ですべてのルールを適用します。
///
/// 各ルールについて行頭から入力トークンを探し、見つかった範囲がすべて
/// 空き位置であれば置き換えます。置き換えた場合は出力の直後から、
/// 置き換えなかった場合は入力の直後から検索を続けます。
///
/// # エラー
///
/// 置換によって行がバッファの上限を超える場合、[`BitransError::LineTooLong`]を返します。
pub(crate) fn apply_rules<R>(
    rules: &RuleSet,
    buf: &mut LineBuffer,
    rand: &mut R,
    ctx: &LineContext,
) -> Result<()>
where
    R: RandomSource,
{
    let placeholder = rules.placeholder();

    for idx in rules.order().iter() {
        let rule = &rules.store()[idx];
        let input = rule.input().as_bytes();
        let len_in = input.len();

        let mut cursor = 0;
        while let Some(p) = utils::find(buf.text(), input, cursor) {
            let span = p..p + len_in;
            if !buf.is_span_free(span.clone()) {
                if ctx.trace {
                    log::trace!(
                        "line {}: '{}' found at {p}, cannot replace",
                        ctx.line_no,
                        rule.input()
                    );
                }
                cursor = p + len_in;
                continue;
            }

            let sep_keep = buf.separator_to_keep(span, placeholder, ctx.default_separator);
            let output = choose_output(rule.outputs(), rand);
            let len_out = output.real_len();

            let new_len = buf.len() - len_in + len_out;
            if new_len > buf.max_len() {
                return Err(BitransError::LineTooLong {
                    kind: LineKind::Input,
                    line: ctx.line_no,
                    len: new_len - 2,
                    max: buf.max_len() - 2,
                });
            }
            buf.replace(p, len_in, output.as_bytes(), placeholder, sep_keep);

            if ctx.trace {
                log::trace!(
                    "line {}: '{}' found at {p}, replaced by '{}'",
                    ctx.line_no,
                    rule.input(),
                    output
                );
            }
            cursor = p + len_out;
        }
    }
    Ok(())
}

fn choose_output<'a, R>(outputs: &'a [Token], rand: &mut R) -> &'a Token
where
    R: RandomSource,
{
    match outputs {
        [only] => only,
        _ => &outputs[rand.pick(outputs.len())],
    }
}
