use crate::chart::ChartData;
use crate::cli::DataArgs;
use crate::fs::{FileSystem, default_fs};
use crate::output::{JsonOutput, OutputFormatter};
use crate::style;
use std::io::{self, Write};

use super::CommandContext;

pub fn cmd_data(args: DataArgs) -> i32 {
    cmd_data_with_fs(args, default_fs())
}

pub fn cmd_data_with_fs(args: DataArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new_with_fs(&args.input, args.config.as_deref(), fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let chart = match ChartData::build(&ctx.dataset, &ctx.config) {
        Ok(chart) => chart,
        Err(e) => {
            style::error(&format!("{}", e));
            return 1;
        }
    };

    let mut buffer = Vec::new();
    if let Err(e) = JsonOutput::new().format(&chart, &mut buffer) {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }
    let json = String::from_utf8_lossy(&buffer);

    match &args.output {
        Some(path) => {
            if let Err(e) = fs.write(path, &json) {
                style::error(&format!("Failed to write output file: {}", e));
                return 1;
            }
            style::success(&format!("Chart data written to: {}", style::path(path)));
        }
        None => {
            if let Err(e) = write!(io::stdout(), "{}", json) {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
    }

    0
}
