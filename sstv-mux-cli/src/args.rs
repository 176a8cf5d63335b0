use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(about = "Encode a cover image with an embedded flag image as a color SSTV transmission")]
pub struct Args {
    /// Cover image. Expected to be 320x256 with at least 3 channels.
    #[clap(short, long, default_value = "input1.png")]
    pub cover: PathBuf,

    /// Flag image. Expected to be 16x16; it is converted to grayscale.
    #[clap(short, long, default_value = "input2.png")]
    pub flag: PathBuf,

    /// Output WAV file.
    #[clap(short, long, default_value = "output_aprimorado.wav")]
    pub output: PathBuf,
}
