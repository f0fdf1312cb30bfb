//! Tests for the stderr diagnostic helpers.

use crate::io::diag::{eprint_to, ewrite_to};

#[test]
fn eprint_appends_newline() {
    let mut buf = Vec::new();
    eprint_to(&mut buf, "ERROR:").unwrap();
    assert_eq!(buf, b"ERROR:\n");
}

#[test]
fn ewrite_writes_raw() {
    let mut buf = Vec::new();
    ewrite_to(&mut buf, "progress...").unwrap();
    ewrite_to(&mut buf, String::from("done")).unwrap();
    assert_eq!(buf, b"progress...done");
}
