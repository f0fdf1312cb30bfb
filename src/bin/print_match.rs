use std::env;
use std::error::Error;

use linesource::{LineSource, ReadError, STDIN_MARKER, chop, eprint};
use regex::Regex;
use tracing_subscriber::EnvFilter;

fn print_usage_and_exit() -> ! {
    eprint("Usage: print_match <pattern> [source]");
    eprint("  <pattern>: regular expression searched in each line");
    eprint("  [source]:  file path, '-' for stdin (default), or '<command> |'");
    std::process::exit(1);
}

/// Lines containing a pattern, each prefixed with the matched text.
struct MatchCollector {
    re: Regex,
    lines: Vec<String>,
}

impl MatchCollector {
    fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            re: Regex::new(pattern)?,
            lines: Vec::new(),
        })
    }

    fn collect(&mut self, source: &mut LineSource) -> Result<(), ReadError> {
        source.run_loop_with(false, self, |_, line, this| {
            let line = chop(&line);
            if let Some(m) = this.re.find(line) {
                this.lines.push(format!("{:<10} {}", m.as_str(), line));
            }
            Ok::<_, ReadError>(true)
        })?;
        Ok(())
    }

    fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let pattern = match args.next() {
        Some(p) => p,
        None => print_usage_and_exit(),
    };
    let spec = args.next().unwrap_or_else(|| STDIN_MARKER.to_string());

    if args.next().is_some() {
        return Err("too many arguments".into());
    }

    let mut collector = MatchCollector::new(&pattern)?;
    let mut source = LineSource::open(spec)?;
    collector.collect(&mut source)?;
    source.close();

    for line in collector.lines() {
        println!("{line}");
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprint(format!("print_match error: {e}"));
        std::process::exit(1);
    }
}
