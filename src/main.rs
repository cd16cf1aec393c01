use std::io::{self, Write};

use astkit::cli::{self, Cli};
use astkit::logging::init_logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logger(cli.no_color, cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let output = cli::run(&cli)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
