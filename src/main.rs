use bundlemap::cli::{Cli, Command};
use bundlemap::{cmd_data, cmd_init, cmd_render, cmd_serve, cmd_summary};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Data(args) => cmd_data(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
