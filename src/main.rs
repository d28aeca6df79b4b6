use adrsite::build::pre_process_site;
use adrsite::config::Config;
use adrsite::env::Environment;
use adrsite::validate::RfcPolicy;
use clap::{crate_version, App, Arg};
use std::path::Path;
use std::process::exit;

fn main() {
    env_logger::init();

    let matches = App::new("adrsite")
        .version(crate_version!())
        .about("Validates ADR/RFC front-matter and derives page slugs")
        .arg(
            Arg::with_name("project-directory")
                .help("Directory in which to look for `adrsite.yaml` (searches parents)")
                .index(1),
        )
        .arg(
            Arg::with_name("rfc-policy")
                .long("rfc-policy")
                .takes_value(true)
                .possible_values(&["deprecated", "unchecked"])
                .help("Overrides the project file's policy for RFC pages"),
        )
        .get_matches();

    let directory = matches.value_of("project-directory").unwrap_or(".");
    let env = Environment::capture();
    let mut config = match Config::from_directory(Path::new(directory), &env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Loading configuration: {}", e);
            exit(1);
        }
    };

    if let Some(policy) = matches.value_of("rfc-policy") {
        config.rfc_policy = match policy {
            "deprecated" => RfcPolicy::Deprecated,
            _ => RfcPolicy::Unchecked,
        };
    }

    match pre_process_site(&config) {
        Ok(pages) => {
            if config.draft {
                println!("draft build: base URL is {}", config.base_url);
            }
            println!("pre-processed {} pages", pages.len());
        }
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    }
}
