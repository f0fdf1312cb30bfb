//! Tests for chop.

use crate::chop;

#[test]
fn chop_removes_trailing_newline() {
    assert_eq!(chop("abc\n"), "abc");
}

#[test]
fn chop_removes_content_without_delimiter() {
    assert_eq!(chop("abc"), "ab");
}

#[test]
fn chop_keeps_other_whitespace() {
    assert_eq!(chop("  a b \n"), "  a b ");
    assert_eq!(chop("x\r\n"), "x\r");
}

#[test]
fn chop_edge_cases() {
    assert_eq!(chop(""), "");
    assert_eq!(chop("\n"), "");
    assert_eq!(chop("naïve é"), "naïve ");
}
