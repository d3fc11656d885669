use crate::chart::{ChartData, generate_static_html};
use crate::cli::RenderArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::CommandContext;

pub fn cmd_render(args: RenderArgs) -> i32 {
    cmd_render_with_fs(args, default_fs())
}

pub fn cmd_render_with_fs(args: RenderArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new_with_fs(&args.input, args.config.as_deref(), fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let html = match ChartData::build(&ctx.dataset, &ctx.config)
        .map_err(crate::api::BundlemapError::from)
        .and_then(|data| generate_static_html(&data).map_err(crate::api::BundlemapError::Serialize))
    {
        Ok(html) => html,
        Err(e) => {
            style::error(&format!("{}", e));
            return 1;
        }
    };

    if let Err(e) = fs.write(&args.output, &html) {
        style::error(&format!("Failed to write output file: {}", e));
        return 1;
    }

    style::success(&format!("Chart exported to: {}", style::path(&args.output)));
    0
}
