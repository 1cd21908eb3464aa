use std::process::ExitCode;

fn main() -> ExitCode {
    traffic_dsl::run()
}
