use clap::{arg, command};
use lookout_core::blueprint::DEFAULT_BLUEPRINT_FILE;
use lookout_core::dataset::DEFAULT_DATASET_FILE;
use lookout_core::viewer::DEFAULT_VIEWER_FILE;
use lookout_scanner::profile::DEFAULT_BASE_URL;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn timeout_arg() -> clap::Arg {
    arg!(--"timeout" <SECONDS>)
        .required(false)
        .help("Per-request timeout in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
        .default_value("10")
}

/// Overrides for the site markup conventions and the client identity.
fn site_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"user-agent" <AGENT>)
            .required(false)
            .help("User-Agent header sent with every request"),
        arg!(--"button-text" <TEXT>)
            .required(false)
            .help("Label of the buttons that lead to a camera listing"),
        arg!(--"placeholder-path" <PATH>)
            .required(false)
            .help("Path of the generic thumbnail shown for cameras without a snapshot"),
        arg!(--"video-host" <HOST>)
            .required(false)
            .help("Host fragment identifying embedded-video thumbnails"),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("lookout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("lookout")
        .about("Discover and catalogue the live cameras of a public camera directory")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and reports")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("discover")
                .about(
                    "Walk the site navigation and write a blueprint of every page that lists \
                cameras.",
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Root of the camera directory")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_BASE_URL),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the blueprint")
                        .default_value(DEFAULT_BLUEPRINT_FILE),
                )
                .arg(
                    arg!(--"max-depth" <N>)
                        .required(false)
                        .help("Navigation levels to follow below the root (1-3)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    arg!(--"branch-limit" <N>)
                        .required(false)
                        .help("Sub-sub-categories checked per sub-category")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    arg!(--"delay-ms" <MS>)
                        .required(false)
                        .help("Pause before each top-level and sub-level page fetch")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(timeout_arg())
                .args(site_args()),
        )
        .subcommand(
            command!("scrape")
                .about("Replay a blueprint and write the deduplicated camera dataset.")
                .arg(
                    arg!(-b --"blueprint" <PATH>)
                        .required(false)
                        .help("Blueprint produced by `lookout discover`")
                        .default_value(DEFAULT_BLUEPRINT_FILE),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the camera dataset")
                        .default_value(DEFAULT_DATASET_FILE),
                )
                .arg(
                    arg!(--"limit" <N>)
                        .required(false)
                        .help("Only process the first N endpoints")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"delay-ms" <MS>)
                        .required(false)
                        .help("Pause between endpoints")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"block-delay-ms" <MS>)
                        .required(false)
                        .help("Pause after each new camera")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("100"),
                )
                .arg(
                    arg!(--"deep")
                        .required(false)
                        .help("Classify every non-embedded camera from its detail page")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(timeout_arg())
                .args(site_args()),
        )
        .subcommand(
            command!("export")
                .about("Convert a camera dataset into the viewer configuration format.")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Camera dataset to convert")
                        .default_value(DEFAULT_DATASET_FILE),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the viewer configuration")
                        .default_value(DEFAULT_VIEWER_FILE),
                ),
        )
        .subcommand(
            command!("inspect")
                .about("Extract the cameras of a single listing page and print them as JSON.")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("Listing page to extract")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"name" <NAME>)
                        .required(false)
                        .help("Category name given to the extracted cameras")
                        .default_value("inspect"),
                )
                .arg(
                    arg!(--"deep")
                        .required(false)
                        .help("Classify every non-embedded camera from its detail page")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(timeout_arg())
                .args(site_args()),
        )
}
