use clap::Parser;
use hhhl::cli::{Cli, init_tracing, run};

fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
