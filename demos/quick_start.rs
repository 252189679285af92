use error_strata::prelude::*;

fn read_config(path: &str) -> RecordResult<String> {
    let builder = ErrorBuilder::new()
        .code("config_unreadable")
        .in_domain("startup")
        .hint("check that the file exists and is readable")
        .with("path", path);
    std::fs::read_to_string(path).wrap_err_with(&builder, || format!("reading {}", path))
}

fn parse_port(raw: &str) -> RecordResult<u16> {
    ensure!(!raw.is_empty(), "port must not be empty");
    raw.trim().parse::<u16>().ctx_with(|| format!("parsing port {:?}", raw))
}

fn main() {
    println!("1. Wrapping an I/O error:");
    if let Err(err) = read_config("missing-config.toml") {
        println!("   summary: {}", err);
        println!("   code:    {:?}", err.code());
        println!("   hint:    {:?}", err.hint());
    }

    println!("\n2. Verbose report:");
    if let Err(err) = parse_port("http") {
        println!("{:#}", err);
    }

    println!("3. Structured output:");
    let err = record!(ErrorBuilder::new().code("E42").tags(["demo"]) => "answer {} rejected", 42);
    match serde_json::to_string_pretty(&err) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("serialization failed: {}", e),
    }
}
