use colored::Colorize;
use lookout::command_argument_builder;
use lookout::handlers::{
    handle_discover, handle_export, handle_inspect, handle_scrape, init_tracing,
};
use lookout_core::print_banner;

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbosity = chosen_command.get_count("verbose");

    init_tracing(verbosity, quiet);

    // Inspect prints JSON only so its output can be piped
    let inspecting = matches!(chosen_command.subcommand(), Some(("inspect", _)));
    if !quiet && !inspecting {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("discover", args)) => handle_discover(args, quiet).await,
        Some(("scrape", args)) => handle_scrape(args, quiet).await,
        Some(("export", args)) => handle_export(args, quiet),
        Some(("inspect", args)) => handle_inspect(args).await,
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
