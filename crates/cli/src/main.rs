use std::io;

use clap::Parser;
use stockcast_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    stockcast_observability::init(cli.log_format);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(cli, stdin.lock(), &mut stdout.lock())
}
