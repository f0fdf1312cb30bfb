//! Diagnostic helpers writing to stderr.

use std::io::{self, Write};

/// Print `msg` to stderr followed by a newline.
pub fn eprint(msg: impl AsRef<str>) {
    // Nothing sensible to do if stderr itself is gone.
    let _ = eprint_to(&mut io::stderr().lock(), msg);
}

/// Write `msg` to stderr as is and flush immediately.
pub fn ewrite(msg: impl AsRef<str>) {
    let _ = ewrite_to(&mut io::stderr().lock(), msg);
}

/// Writer-generic form of [`eprint`].
pub fn eprint_to<W: Write + ?Sized>(writer: &mut W, msg: impl AsRef<str>) -> io::Result<()> {
    writeln!(writer, "{}", msg.as_ref())
}

/// Writer-generic form of [`ewrite`].
pub fn ewrite_to<W: Write + ?Sized>(writer: &mut W, msg: impl AsRef<str>) -> io::Result<()> {
    writer.write_all(msg.as_ref().as_bytes())?;
    writer.flush()
}
