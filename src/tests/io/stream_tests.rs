//! Tests for the stderr tail reader.

use std::io::Cursor;

use crate::io::stream::read_tail;

#[test]
fn short_input_is_kept_whole() {
    let tail = read_tail(&mut Cursor::new(b"warning: x\n".to_vec()), 64).unwrap();
    assert_eq!(tail, b"warning: x\n");
}

#[test]
fn long_input_keeps_only_the_last_bytes() {
    let mut input = vec![b'a'; 20_000];
    input.extend_from_slice(b"last line\n");

    let tail = read_tail(&mut Cursor::new(input), 10).unwrap();
    assert_eq!(tail, b"last line\n");
}
