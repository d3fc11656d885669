use crate::chart::ChartData;
use crate::cli::{OutputFormat, SummaryArgs};
use crate::fs::{FileSystem, default_fs};
use crate::output::{JsonOutput, OutputFormatter, SummaryOutput};
use crate::style;
use std::io::{self, Write};

use super::CommandContext;

pub fn cmd_summary(args: SummaryArgs) -> i32 {
    cmd_summary_with_fs(args, default_fs())
}

pub fn cmd_summary_with_fs(args: SummaryArgs, fs: &dyn FileSystem) -> i32 {
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
    let format_result = match args.format {
        OutputFormat::Markdown => SummaryOutput::new(args.rows).format(&chart, &mut buffer),
        OutputFormat::Json => JsonOutput::new().format(&chart, &mut buffer),
    };
    if let Err(e) = format_result {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }
    let output_str = String::from_utf8_lossy(&buffer);

    match &args.output {
        Some(path) => {
            if let Err(e) = fs.write(path, &output_str) {
                style::error(&format!("Failed to write output file: {}", e));
                return 1;
            }
            style::success(&format!("Summary written to: {}", style::path(path)));
        }
        None => {
            // Markdown gets the terminal skin; JSON goes out plain.
            let write_result = if args.format == OutputFormat::Markdown {
                style::render_markdown(&output_str, &mut io::stdout())
            } else {
                write!(io::stdout(), "{}", output_str)
            };
            if let Err(e) = write_result {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
    }

    0
}
