use std::process::ExitCode;

fn main() -> ExitCode {
    match td_cycles::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
