use argh::FromArgs;
use depth_gas_scaling::analysis::DuplicatePolicy;
use depth_gas_scaling::common::plots::BitmapRenderer;
use depth_gas_scaling::config::{
    AnalyzerConfig, FieldNames, DEFAULT_COST_FIELD, DEFAULT_DEPTH_FIELD, DEFAULT_DPI,
    DEFAULT_FIGURE_SIZE_INCHES, DEFAULT_INPUT_PATH, DEFAULT_LINEAR_OUTPUT, DEFAULT_LOGLOG_OUTPUT,
};
use depth_gas_scaling::run_analysis;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

/// Plots how market-like limit-buy gas scales with orderbook depth
#[derive(FromArgs, Debug)]
pub struct Args {
    /// benchmark log to read, plain or .zst (default: logs/depth_gas.log)
    #[argh(option, short = 'i', default = "PathBuf::from(DEFAULT_INPUT_PATH)")]
    input: PathBuf,

    /// linear-scale chart output (default: logs/scalability_depth.png)
    #[argh(option, default = "PathBuf::from(DEFAULT_LINEAR_OUTPUT)")]
    linear_output: PathBuf,

    /// log-log chart output (default: logs/scalability_depth_loglog.png)
    #[argh(option, default = "PathBuf::from(DEFAULT_LOGLOG_OUTPUT)")]
    loglog_output: PathBuf,

    /// output resolution in dots per inch (default: 300)
    #[argh(option, default = "DEFAULT_DPI")]
    dpi: u32,

    /// JSON key holding the orderbook depth (default: depth)
    #[argh(option, default = "DEFAULT_DEPTH_FIELD.to_string()")]
    depth_field: String,

    /// JSON key holding the gas used (default: gas_placeLimitBuy_market_like)
    #[argh(option, default = "DEFAULT_COST_FIELD.to_string()")]
    cost_field: String,

    /// average the gas of samples sharing a depth instead of plotting each one
    #[argh(switch, short = 'm')]
    merge_duplicates: bool,

    /// also print the samples as a table
    #[argh(switch, short = 't')]
    table: bool,
}

impl Args {
    fn into_config(self) -> AnalyzerConfig {
        AnalyzerConfig {
            input_path: self.input,
            linear_output: self.linear_output,
            loglog_output: self.loglog_output,
            fields: FieldNames {
                depth: self.depth_field,
                cost: self.cost_field,
            },
            dpi: self.dpi,
            figure_size_inches: DEFAULT_FIGURE_SIZE_INCHES,
            duplicates: if self.merge_duplicates {
                DuplicatePolicy::MergeMean
            } else {
                DuplicatePolicy::Keep
            },
            print_table: self.table,
        }
    }
}

fn main() {
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("depth_gas_scaling"), LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Args = argh::from_env();
    let config = args.into_config();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run_analysis(&config, &mut BitmapRenderer::new(), &mut out) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
