use dfraw_txt_rs_lib::{tokenize, Token};
use proptest::prelude::*;

fn pairs(text: &str) -> Vec<(&str, &str)> {
    tokenize(text).map(|token| (token.key, token.value)).collect()
}

#[test]
fn value_is_left_unsplit() {
    assert_eq!(
        tokenize("[NAME:dog:dogs:canine]").collect::<Vec<_>>(),
        vec![Token {
            key: "NAME",
            value: "dog:dogs:canine",
            line: 1
        }]
    );
}

#[test]
fn valueless_tag_has_empty_value() {
    assert_eq!(pairs("[LARGE_ROAMING]"), vec![("LARGE_ROAMING", "")]);
}

#[test]
fn nearest_bracket_pair_wins() {
    assert_eq!(pairs("[A:[B:C]]"), vec![("B", "C")]);
    assert_eq!(pairs("[A:B[C:D]"), vec![("C", "D")]);
}

#[test]
fn text_between_tags_is_skipped() {
    assert_eq!(
        pairs("creature_standard\n\nsome notes [OBJECT:CREATURE] more\n"),
        vec![("OBJECT", "CREATURE")]
    );
}

#[test]
fn tags_do_not_span_lines() {
    assert_eq!(pairs("[NAME:dog\n[PETVALUE:50]"), vec![("PETVALUE", "50")]);
}

#[test]
fn tokens_carry_line_numbers() {
    let lines: Vec<usize> = tokenize("header\n[A]\n\n[B:1][C]\r\n[D]")
        .map(|token| token.line)
        .collect();

    assert_eq!(lines, vec![2, 4, 4, 5]);
}

#[test]
fn tokenizing_again_restarts() {
    let text = "[A][B]";

    assert_eq!(tokenize(text).count(), 2);
    assert_eq!(tokenize(text).count(), 2);
}

proptest! {
    #[test]
    fn never_panics_and_keys_are_never_empty(text in any::<String>()) {
        for token in tokenize(&text) {
            prop_assert!(!token.key.is_empty());
            prop_assert!(!token.key.contains(['[', ']', ':']));
            prop_assert!(!token.value.contains(['[', ']']));
        }
    }
}
