use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the remod binary.
#[derive(Parser, Debug)]
#[command(
    name = "remod",
    version,
    about = "Turns legacy JavaScript into modern JavaScript",
    after_help = "Transforms: class, let, arrow, arrow-return, obj-method, obj-shorthand, no-strict, exponent, multi-var, arg-spread"
)]
pub struct CliArgs {
    /// Input file. Standard input is read when omitted.
    pub file: Option<PathBuf>,

    /// Transforms to apply, comma-separated (e.g. `let,arrow`). May be repeated.
    #[arg(short = 't', long = "transform", value_name = "NAMES", required = true)]
    pub transforms: Vec<String>,

    /// Write the result to this file instead of standard output.
    #[arg(short = 'o', long = "out-file", value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Rewrite files in place: a directory (every `.js` file below it), a
    /// single file or a glob pattern such as `src/**/*.js`.
    #[arg(long, value_name = "DIR_OR_GLOB", conflicts_with_all = ["file", "out_file"])]
    pub replace: Option<String>,
}

impl CliArgs {
    /// All `-t` values as one comma-separated list.
    pub fn transform_list(&self) -> String {
        self.transforms.join(",")
    }
}
