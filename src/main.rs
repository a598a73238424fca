use std::process::ExitCode;

fn main() -> ExitCode {
    match autoplaylist::cli::run() {
        Ok(code) => code,
        Err(e) => {
            autoplaylist::cli::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
