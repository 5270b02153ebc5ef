use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "pairplot",
    version,
    about = "Render pairplots and scatter/box plots from delimited data files"
)]
pub struct Cli {
    #[arg(long, help = "Directory holding the input .csv files [default: ./data]")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Directory receiving the .png files [default: ./output]")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Name of the grouping column [default: z]")]
    pub group_column: Option<String>,

    #[arg(long, help = "JSON config file [default: ./pairplot.json if present]")]
    pub config: Option<PathBuf>,
}
