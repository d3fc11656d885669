use crate::chart::{self, ChartData, WatchContext};
use crate::cli::ServeArgs;
use crate::style;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.input, args.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let chart_data = match ChartData::build(&ctx.dataset, &ctx.config) {
        Ok(data) => data,
        Err(e) => {
            style::error(&format!("{}", e));
            return 1;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to create tokio runtime: {}", e));
            return 1;
        }
    };

    let result = if args.watch {
        let watch_ctx = WatchContext {
            input: ctx.input.clone(),
            config: ctx.config,
        };
        rt.block_on(chart::serve_with_watch(
            chart_data, args.port, args.open, watch_ctx,
        ))
    } else {
        rt.block_on(chart::serve(chart_data, args.port, args.open))
    };

    if let Err(e) = result {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
