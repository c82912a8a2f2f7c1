use std::io::{self, BufWriter};

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout());
    alien_invasion::script::run(stdin.lock(), &mut out).context("failed to run twenty_div")?;
    Ok(())
}
