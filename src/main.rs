// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, install logging, run the command.
// - Errors bubble up as `anyhow::Error` and end the process with a non-zero
//   exit code.

use clap::Parser;
use linkedin_posts::cli::{run, Cli};
use linkedin_posts::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
