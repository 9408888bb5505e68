use crate::engine::{RandomSource, Transliterator};
use crate::errors::BitransError;
use crate::rules::{compile_rules, Direction, RuleSet};

/// 与えられた値を順に返す乱数源
struct Sequence {
    values: Vec<usize>,
    pos: usize,
    calls: Vec<usize>,
}

impl Sequence {
    fn new(values: &[usize]) -> Self {
        Self {
            values: values.to_vec(),
            pos: 0,
            calls: vec![],
        }
    }
}

impl RandomSource for Sequence {
    fn pick(&mut self, n: usize) -> usize {
        self.calls.push(n);
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % n
    }
}

fn rules(lines: &[&str]) -> RuleSet {
    compile_rules(lines.iter().copied(), Direction::Forward)
        .unwrap()
        .0
}

fn transliterate(lines: &[&str], input: &str) -> String {
    Transliterator::new(rules(lines))
        .new_worker()
        .process_line(input)
        .unwrap()
}

/// 2ルール1行の固定例
///
/// "th"(優先度4)が"t"(優先度2)より先に適用され、残った"t"だけが"T"になる。
#[test]
fn test_two_rule_fixture() {
    let rules = ["##BIT", "t T", "th Z"];
    assert_eq!(transliterate(&rules, "the path"), "Ze paZ");
    assert_eq!(transliterate(&rules, "that tooth"), "ZaT TooZ");
}

#[test]
fn test_longest_match_wins() {
    let rules = ["##BIT", "a Y", "ab X"];
    assert_eq!(transliterate(&rules, "ab"), "X");
    assert_eq!(transliterate(&rules, "ab a"), "X Y");
}

#[test]
fn test_substituted_span_is_not_rematched() {
    let rules = ["##BIT", "X ab", "a Z"];
    assert_eq!(transliterate(&rules, "X"), "ab");
    assert_eq!(transliterate(&rules, "aX"), "Zab");
}

#[test]
fn test_comma_preserved() {
    // Output longer and shorter than the input.
    assert_eq!(transliterate(&["##BIT", "ab xyz"], "ab, ab,ab"), "xyz, xyz,xyz");
    assert_eq!(transliterate(&["##BIT", "abc q"], "x,abc,y"), "x,q,y");
}

#[test]
fn test_separator_inside_token_is_kept() {
    // The comma swallowed by "a#" comes back through the output placeholder.
    assert_eq!(transliterate(&["##BIT", "a# b#"], "a, a. a c"), "b, b. b c");
}

#[test]
fn test_sort_block_divider() {
    let with_divider = rules(&["##BIT", "x 1", "------", "yy 2", "zzz 3"]);
    assert_eq!(with_divider.order().as_slice(), &[0, 2, 1]);

    let without = rules(&["##BIT", "x 1", "yy 2", "zzz 3"]);
    assert_eq!(without.order().as_slice(), &[2, 1, 0]);
}

#[test]
fn test_order_is_stable_permutation() {
    let rules = rules(&["##BIT", "b 1", "cc 2", "d 3", "ee 4", "f 5"]);
    assert_eq!(rules.order().as_slice(), &[1, 3, 0, 2, 4]);
}

#[test]
fn test_duplicate_regardless_of_position() {
    for lines in [
        ["##BIT", "ab 1", "ab 2", "c 3"],
        ["##BIT", "ab 1", "c 3", "ab 2"],
        ["##BIT", "c 3", "ab 1", "ab 2"],
    ] {
        let err = compile_rules(lines, Direction::Forward).unwrap_err();
        assert!(matches!(err, BitransError::DuplicateRule { ref tokens } if tokens == &["ab"]));
    }
}

#[test]
fn test_whole_line_comment() {
    let rules = ["##BIT", ";(comment)", "a b"];
    assert_eq!(transliterate(&rules, ";a a, a"), ";a a, a");
    assert_eq!(transliterate(&rules, "a ;a"), "b ;b");
}

#[test]
fn test_inline_comment() {
    let rules = ["##BIT", "<(comment)>", "a b"];
    assert_eq!(transliterate(&rules, "a <a a> a"), "b <a a> b");
}

#[test]
fn test_escape_round_trip() {
    let escaped = rules(&["##BIT", "&0041; &00E9;"]);
    let literal = rules(&["##BIT", "A é"]);
    assert_eq!(escaped.store()[0].input(), literal.store()[0].input());
    assert_eq!(escaped.store()[0].outputs(), literal.store()[0].outputs());
    assert_eq!(transliterate(&["##BIT", "&0041; &00E9;"], "BAD"), "BéD");
}

#[test]
fn test_homophonic_with_fixed_sequence() {
    let transliterator = Transliterator::new(rules(&["##BIT", "o 0 1 2", "x y"]));
    let mut worker = transliterator.new_worker_with(Sequence::new(&[2, 0, 1]));
    assert_eq!(worker.process_line("ooxo").unwrap(), "20y1");
    assert_eq!(worker.process_line("o").unwrap(), "2");
}

#[test]
fn test_random_drawn_only_for_eligible_matches() {
    // The "a" produced by the first rule is found but not eligible.
    let transliterator = Transliterator::new(rules(&["##BIT", "ab aX", "a 1 2"]));
    let mut seq = Sequence::new(&[1]);
    let mut worker = transliterator.new_worker_with(&mut seq);
    assert_eq!(worker.process_line("ab a").unwrap(), "aX 2");
    drop(worker);
    assert_eq!(seq.calls, vec![2]);
}

#[test]
fn test_local_rand_homophonic() {
    // LocalRand from seed 1 yields 454, 1455, 1559, 1703, ... (mod 3: 1, 0, 2, 2).
    let transliterator = Transliterator::new(rules(&["##BIT", "o a b c"]));
    let mut worker = transliterator.new_worker();
    assert_eq!(worker.process_line("oo oo").unwrap(), "ba cc");
}

#[test]
fn test_placeholder_in_text_is_literal() {
    let rules = ["##BIT", "#a A"];
    // Only a separator before "a" is matched, not a literal '#'.
    assert_eq!(transliterate(&rules, "x a #a"), "xA #a");
}

#[test]
fn test_period_placeholder_in_text_is_literal() {
    let rules = ["##BIT", "#=.", "a. X"];
    assert_eq!(transliterate(&rules, "a.b a c"), "a.b Xc");
}

#[test]
fn test_inline_comment_after_whole_line_declaration() {
    let rules = ["##BIT", "#(comment)", "#(comment)#", "a b"];
    assert_eq!(transliterate(&rules, "x #a# a"), "x #a# b");
    assert_eq!(transliterate(&rules, "#a a"), "#a a");
}
