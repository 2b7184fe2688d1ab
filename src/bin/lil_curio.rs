//! lil-curio command-line entry point

use std::io;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let code = lil_curio::cli::execute(std::env::args_os(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
