//! Tests for the run_loop protocol.

use std::io::Cursor;

use crate::{Flow, LineSource, LoopOutcome, ReadError, SourceKind};

fn numbered(n: usize) -> LineSource {
    let text: String = (1..=n).map(|i| format!("{i}\n")).collect();
    LineSource::from_stdin_reader(Cursor::new(text))
}

#[derive(Debug)]
enum AppError {
    Read(ReadError),
    Rejected(String),
}

impl From<ReadError> for AppError {
    fn from(e: ReadError) -> Self {
        AppError::Read(e)
    }
}

#[test]
fn stop_after_n_lines_interrupts() {
    let mut src = numbered(10);
    let mut calls = 0;

    let outcome = src
        .run_loop(true, |_, _| {
            calls += 1;
            Ok::<_, ReadError>(calls < 3)
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Interrupted);
    assert!(!outcome.is_completed());
    assert_eq!(calls, 3);
    assert_eq!(src.lines_read(), 3);

    // The stream was not drained; the rest is still there.
    assert_eq!(src.next_line().unwrap().as_deref(), Some("4\n"));
}

#[test]
fn always_continue_visits_every_line() {
    let mut src = numbered(7);
    let mut calls = 0;

    let outcome = src
        .run_loop(false, |_, _| {
            calls += 1;
            Ok::<_, ReadError>(Flow::Continue)
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(calls, 7);
}

#[test]
fn unit_return_means_continue() {
    let mut src = numbered(4);
    let mut seen = Vec::new();

    let outcome = src
        .run_loop(true, |_, line| {
            seen.push(line);
            Ok::<_, ReadError>(())
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(seen, vec!["1", "2", "3", "4"]);
}

#[test]
fn exhausted_source_does_not_rewind() {
    let mut src = numbered(2);
    assert_eq!(src.lines(false).unwrap().len(), 2);

    let mut calls = 0;
    let outcome = src
        .run_loop(false, |_, _| {
            calls += 1;
            Ok::<_, ReadError>(true)
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Completed);
    assert_eq!(calls, 0);
}

#[test]
fn context_is_forwarded_to_every_call() {
    let mut src = numbered(5);
    let mut total: u32 = 0;

    src.run_loop_with(true, &mut total, |info, line, sum| {
        assert_eq!(info.kind(), SourceKind::Stdin);
        assert_eq!(info.spec(), "-");
        *sum += line.parse::<u32>().unwrap();
        Ok::<_, ReadError>(true)
    })
    .unwrap();

    assert_eq!(total, 15);
}

#[test]
fn callback_error_propagates_and_source_stays_usable() {
    let mut src = numbered(5);
    let mut calls = 0;

    let err = src
        .run_loop(true, |_, line| {
            calls += 1;
            if line == "2" {
                return Err(AppError::Rejected(line));
            }
            Ok(true)
        })
        .unwrap_err();

    assert!(matches!(err, AppError::Rejected(ref l) if l == "2"));
    assert_eq!(calls, 2);
    assert!(src.is_open());
    assert_eq!(src.lines(true).unwrap(), vec!["3", "4", "5"]);
}

#[test]
fn read_errors_convert_into_callback_error_type() {
    let mut src = LineSource::from_stdin_reader(Cursor::new(b"\xfe\n".to_vec()));

    let err = src
        .run_loop(false, |_, _| Ok::<_, AppError>(true))
        .unwrap_err();

    assert!(matches!(err, AppError::Read(ReadError::Decode { line: 1, .. })));
}
