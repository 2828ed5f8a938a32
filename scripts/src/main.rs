use anyhow::Context;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    dotenv::dotenv().ok(); // Used to load the `.env` file if any
    pretty_env_logger::init();

    let path = args
        .get(1)
        .cloned()
        .or_else(|| env::var("TOURNAMENT_CONFIG").ok())
        .context("pass a tournament file or set TOURNAMENT_CONFIG")?;

    let file = simulate::load(&path)?;
    let report = simulate::run(&file)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

mod simulate;
#[cfg(test)]
mod tests;
