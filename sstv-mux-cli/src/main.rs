pub mod args;

use clap::Parser;
use color_eyre::eyre::Error;
use sstv_mux::{
    modem::sstv::{
        ProtocolConfig,
        image::{
            load_cover,
            load_flag,
        },
        transmission::encode_transmission,
    },
    sink::file::write_wav,
};
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting SSTV signal generation");
    let args = Args::parse();
    tracing::debug!(?args);

    // errors are reported by color-eyre
    run(&args, &ProtocolConfig::DEFAULT)?;
    tracing::info!("Done");

    Ok(())
}

fn run(args: &Args, config: &ProtocolConfig) -> Result<(), Error> {
    let cover = load_cover(&args.cover, config)?;
    let flag = load_flag(&args.flag, config)?;

    let pcm = encode_transmission(&cover, &flag, config)?;

    write_wav(&args.output, &pcm)?;

    Ok(())
}
