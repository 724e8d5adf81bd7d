use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use pipevisor::{Config, Coordinator, run_role};

mod cli;
use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!("{}", cli::usage());
            return ExitCode::FAILURE;
        }
    };
    let cfg = cli.config();

    if let Some(role) = cli.worker {
        return run_role(role, &cfg);
    }
    let (Some(first), Some(second)) = (cli.first, cli.second) else {
        eprintln!("{}", cli::usage());
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("pipevisor: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let code = runtime.block_on(coordinate(cfg, first, second));
    // A blocked FIFO open must not keep the process alive.
    runtime.shutdown_timeout(Duration::from_secs(1));
    code
}

async fn coordinate(cfg: Config, first: i32, second: i32) -> ExitCode {
    let coordinator = match Coordinator::from_current_exe(cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pipevisor: cannot locate own executable: {e}");
            return ExitCode::FAILURE;
        }
    };
    match coordinator.run(first, second).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pipevisor: {e} [{}]", e.as_label());
            ExitCode::FAILURE
        }
    }
}
