//! `gst` binary: runs one allocation and exits with the error's code on failure.

use std::process::ExitCode;

fn main() -> ExitCode {
    match gst_alloc::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
