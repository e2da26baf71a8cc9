//! Token streams for the stock strategies over small hand-picked inputs.

use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;
use rstest::rstest;

use super::util::{SlowSource, collect};
use crate::{Scanner, SliceSource, SplitStrategy, utf8};

const SCAN_TESTS: &[&[u8]] = &[
    b"",
    b"a",
    "¼".as_bytes(),
    "☹".as_bytes(),
    b"\x81",
    "\u{FFFD}".as_bytes(),
    b"abcdefgh",
    b"abc def\n\t\tgh    ",
    b"abc\xC2\xBC\xE2\x98\xB9\x81\xEF\xBF\xBD\xE6\x97\xA5\xE6\x9C\xAC\xE8\xAA\x9E\x82abc",
];

const WORD_SCAN_TESTS: &[&str] = &[
    "",
    " ",
    "\n",
    "a",
    " a ",
    "abc def",
    " abc def ",
    " abc\tdef\nghi\rjkl\u{0C}mno\u{0B}pqr\u{85}stu\u{A0}\n",
];

/// Left-to-right decoding where every byte that does not start a valid
/// encoding stands for one U+FFFD.
fn decode_all(mut input: &[u8]) -> Vec<char> {
    let mut out = Vec::new();
    while !input.is_empty() {
        let valid = (1..=input.len().min(4))
            .find_map(|w| core::str::from_utf8(&input[..w]).ok().map(|s| (s, w)));
        match valid {
            Some((s, w)) => {
                out.extend(s.chars());
                input = &input[w..];
            }
            None => {
                out.push(char::REPLACEMENT_CHARACTER);
                input = &input[1..];
            }
        }
    }
    out
}

#[test]
fn scan_bytes() {
    for (n, test) in SCAN_TESTS.iter().enumerate() {
        let mut scanner = Scanner::with_strategy(SliceSource::new(test), SplitStrategy::Bytes);
        let tokens = collect(&mut scanner);
        assert_eq!(tokens.len(), test.len(), "#{n}");
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.as_slice(), &test[i..=i], "#{n}: {i}");
        }
        assert!(scanner.last_error().is_none(), "#{n}");
    }
}

#[test]
fn scan_code_points() {
    for (n, test) in SCAN_TESTS.iter().enumerate() {
        let mut scanner =
            Scanner::with_strategy(SliceSource::new(test), SplitStrategy::CodePoints);
        let decoded: Vec<char> = collect(&mut scanner)
            .iter()
            .map(|token| utf8::decode(token).0)
            .collect();
        assert_eq!(decoded, decode_all(test), "#{n}");
        assert!(scanner.last_error().is_none(), "#{n}");
    }
}

#[test]
fn scan_code_points_one_byte_at_a_time() {
    for (n, test) in SCAN_TESTS.iter().enumerate() {
        let mut scanner =
            Scanner::with_strategy(SlowSource::new(test, 1), SplitStrategy::CodePoints);
        let tokens = collect(&mut scanner);
        assert_eq!(tokens.concat(), *test, "#{n}");
        let decoded: Vec<char> = tokens.iter().map(|token| utf8::decode(token).0).collect();
        assert_eq!(decoded, decode_all(test), "#{n}");
    }
}

#[test]
fn scan_words() {
    for (n, test) in WORD_SCAN_TESTS.iter().enumerate() {
        let mut scanner = Scanner::with_strategy(
            SlowSource::new(test.as_bytes(), 3),
            SplitStrategy::Words,
        );
        let mut words = Vec::new();
        while scanner.advance() {
            words.push(scanner.token_text());
        }
        let expected: Vec<String> = test.split_whitespace().map(String::from).collect();
        assert_eq!(words, expected, "#{n}");
        assert!(scanner.last_error().is_none(), "#{n}");
    }
}

#[test]
fn scan_words_after_excessive_white_space() {
    let mut input = alloc::vec![b' '; 4 * 256];
    input.extend_from_slice(b"ipsum");
    let mut scanner = Scanner::with_strategy(SliceSource::new(&input), SplitStrategy::Words);
    scanner.set_max_token_size(256);
    assert!(scanner.advance(), "{:?}", scanner.last_error());
    assert_eq!(scanner.token_str(), Some("ipsum"));
    assert!(!scanner.advance());
    assert!(scanner.last_error().is_none());
}

#[rstest]
#[case::no_newline("abcdefghijklmn\nopqrstuvwxyz", &["abcdefghijklmn", "opqrstuvwxyz"])]
#[case::return_but_no_newline("abcdefghijklmn\nopqrstuvwxyz\r", &["abcdefghijklmn", "opqrstuvwxyz"])]
#[case::empty_final_line("abcdefghijklmn\nopqrstuvwxyz\n\n", &["abcdefghijklmn", "opqrstuvwxyz", ""])]
#[case::empty_final_line_with_cr("abcdefghijklmn\nopqrstuvwxyz\n\r", &["abcdefghijklmn", "opqrstuvwxyz", ""])]
#[case::crlf("a\r\nb\r\n", &["a", "b"])]
#[case::inner_cr_kept("a\rb\nc", &["a\rb", "c"])]
#[case::only_newlines("\n\n", &["", ""])]
fn scan_lines_without_final_newline(#[case] text: &str, #[case] lines: &[&str]) {
    let mut scanner = Scanner::new(SlowSource::new(text.as_bytes(), 7));
    let mut got = Vec::new();
    while let Some(line) = scanner.next_token() {
        got.push(String::from(line.to_str().unwrap()));
    }
    assert_eq!(got, lines);
    assert!(scanner.last_error().is_none());
}

#[test]
fn token_text_replaces_invalid_utf8() {
    let mut scanner = Scanner::new(SliceSource::new(b"ok\nb\xFFd\n"));
    assert!(scanner.advance());
    assert_eq!(scanner.token_str(), Some("ok"));
    assert!(scanner.advance());
    assert_eq!(scanner.token_str(), None);
    assert_eq!(scanner.token_text(), "b\u{FFFD}d");
}
