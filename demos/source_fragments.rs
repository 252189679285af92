use error_strata::{Config, ErrorBuilder, ErrorRecord};

fn load(config: &Config) -> ErrorRecord {
    ErrorBuilder::new().with_config(config.clone()).build("cannot open database")
}

fn start(config: &Config) -> ErrorRecord {
    let err = load(config);
    ErrorBuilder::new().with_config(config.clone()).wrap_with(err, "startup aborted")
}

fn main() {
    let config = Config::from_env().with_workspace_root(env!("CARGO_MANIFEST_DIR")).show_sources(true);
    let err = start(&config);

    println!("{}", err.stacktrace());
    println!();
    println!("{}", err.sources());
}
