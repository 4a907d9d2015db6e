use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match klinika_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Klinika stopped: {e}");
            eprintln!("klinika: {e}");
            ExitCode::FAILURE
        }
    }
}
