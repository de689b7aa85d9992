fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let peripheral = args.next().unwrap_or_else(|| "i2c".to_string());

    match peripheral.as_str() {
        "i2c" | "I2C" => {}
        other => {
            eprintln!("Unknown peripheral '{}'. Supported: i2c", other);
            std::process::exit(1);
        }
    }

    let address = match args.next() {
        None => 0x50,
        Some(text) => parse_byte(&text).unwrap_or_else(|| {
            eprintln!("Invalid device address '{}'. Expected a hex byte, e.g. 0x3c", text);
            std::process::exit(1);
        }),
    };

    let mut payload = Vec::new();
    for text in args {
        match parse_byte(&text) {
            Some(byte) => payload.push(byte),
            None => {
                eprintln!("Invalid payload byte '{}'. Expected a hex byte, e.g. 7f", text);
                std::process::exit(1);
            }
        }
    }
    if payload.is_empty() {
        log::info!("No payload given, using the default test pattern");
        payload = vec![0xDE, 0xAD, 0xBE, 0xEF];
    }

    match espboy::run_i2c_demo(address, &payload) {
        Ok(readback) => {
            println!(
                "wrote {:02x?} to device {:#04x} and read back {:02x?}",
                payload, address, readback
            );
        }
        Err(err) => {
            eprintln!("i2c demo failed: {:#}", err);
            std::process::exit(1);
        }
    }
}

fn parse_byte(text: &str) -> Option<u8> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u8::from_str_radix(digits, 16).ok()
}
