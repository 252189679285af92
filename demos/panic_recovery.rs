use error_strata::{recover, ErrorBuilder};

fn divide(a: i32, b: i32) -> i32 {
    let _ = ErrorBuilder::new().code("division_by_zero").with("dividend", a).assert_with(b != 0, "divisor is zero");
    a / b
}

fn main() {
    // Silence the default hook; recovered panics are reported below.
    std::panic::set_hook(Box::new(|_| {}));

    match recover(|| divide(10, 2)) {
        Ok(value) => println!("10 / 2 = {}", value),
        Err(err) => println!("unexpected: {}", err),
    }

    match ErrorBuilder::new().in_domain("math").recover(|| divide(1, 0)) {
        Ok(value) => println!("1 / 0 = {}", value),
        Err(err) => {
            println!("recovered: {}", err);
            println!("code: {:?}, domain: {:?}", err.code(), err.domain());
            println!("context: {}", serde_json::Value::Object(err.context()));
        },
    }

    let err = ErrorBuilder::new()
        .recover_with(|| -> Vec<u8> { panic!("index {} out of range", 12) }, "batch job crashed")
        .unwrap_err();
    println!("{:#}", err);
}
