//! Tests for pipe command parsing.

use crate::error::CommandError;
use crate::io::command::{CommandLine, needs_shell};

#[test]
fn plain_command_is_split_into_argv() {
    let cmd = CommandLine::parse("ls -l /etc", "sh").unwrap();

    assert_eq!(cmd.program, "ls");
    assert_eq!(cmd.args, vec!["-l", "/etc"]);
    assert!(!cmd.via_shell);
}

#[test]
fn quoting_is_honored() {
    let cmd = CommandLine::parse(r#"printf 'a\nb\n' "two words""#, "sh").unwrap();

    assert_eq!(cmd.program, "printf");
    assert_eq!(cmd.args, vec![r"a\nb\n", "two words"]);
}

#[test]
fn each_metacharacter_routes_through_shell() {
    for cmd in [
        "cat a.txt | grep x",
        "sort < in.txt",
        "echo hi > out.txt",
        "echo `date`",
        "true; echo done",
    ] {
        assert!(needs_shell(cmd), "{cmd}");
        let parsed = CommandLine::parse(cmd, "sh").unwrap();
        assert!(parsed.via_shell);
        assert_eq!(parsed.program, "sh");
        assert_eq!(parsed.args, vec!["-c".to_string(), cmd.to_string()]);
    }
}

#[test]
fn shell_command_keeps_single_quotes_intact() {
    let parsed = CommandLine::parse("echo 'a b' | tr a-z A-Z ", "bash").unwrap();

    assert_eq!(parsed.program, "bash");
    assert_eq!(parsed.args[1], "echo 'a b' | tr a-z A-Z");
}

#[test]
fn other_characters_do_not_need_shell() {
    assert!(!needs_shell("grep -E 'a(b)*' file.txt"));
    assert!(!needs_shell("echo $HOME & x"));
}

#[test]
fn empty_command_is_rejected() {
    assert!(matches!(CommandLine::parse("   ", "sh"), Err(CommandError::Empty)));
}

#[test]
fn unbalanced_quote_is_rejected() {
    assert!(matches!(
        CommandLine::parse("echo 'oops", "sh"),
        Err(CommandError::Quoting(_))
    ));
}

#[test]
fn display_requotes_arguments() {
    let cmd = CommandLine::parse("echo 'two words'", "sh").unwrap();
    assert_eq!(cmd.display(), "echo 'two words'");

    let bare = CommandLine::parse("true", "sh").unwrap();
    assert_eq!(bare.display(), "true");
}
