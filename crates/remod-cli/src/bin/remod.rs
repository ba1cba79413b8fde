#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;

use remod_cli::args::CliArgs;
use remod_cli::driver::{self, EXIT_FAILURE, Io};
use remod_cli::reporter::Reporter;

fn main() {
    // REMOD_LOG / RUST_LOG enable tracing on stderr; REMOD_LOG_FORMAT picks
    // text, tree or json.
    remod::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let reporter = Reporter::new(std::io::stderr().is_terminal());

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    let mut io = Io {
        stdin: &mut stdin,
        stdout: &mut stdout,
        stderr: &mut stderr,
    };

    let status = match driver::run(&args, &reporter, &mut io) {
        Ok(status) => status,
        Err(err) => {
            eprint!("{}", reporter.render_failure(None, &err));
            EXIT_FAILURE
        }
    };
    std::process::exit(status);
}
