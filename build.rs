fn main() {
    // The host build only compiles the library and its tests
    if std::env::var_os("CARGO_FEATURE_ESP32").is_none() {
        return;
    }

    // Load .env file for WiFi credentials
    load_dotenv();

    linker_be_nice();
    // make sure linkall.x is the last linker script (otherwise might cause problems with flip-link)
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

fn load_dotenv() {
    // Re-run build script if .env changes
    println!("cargo:rerun-if-changed=.env");

    let env_path = std::path::Path::new(".env");
    if !env_path.exists() {
        panic!(
            "\n\n\
            Missing .env file!\n\
            \n\
            Please create a .env file with your WiFi credentials:\n\
            \n\
            cp .env.example .env\n\
            \n\
            Then set WIFI_SSID and WIFI_PASSWORD (and optionally WIFI_CONNECT_TIMEOUT_MS).\n\
            \n"
        );
    }

    let contents = match std::fs::read_to_string(env_path) {
        Ok(contents) => contents,
        Err(e) => panic!("Failed to read .env file: {}", e),
    };

    let mut has_ssid = false;
    let mut has_password = false;
    for line in contents.lines() {
        let line = line.trim();
        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Parse KEY=VALUE, values may be quoted
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            has_ssid |= key == "WIFI_SSID";
            has_password |= key == "WIFI_PASSWORD";
            println!("cargo:rustc-env={}={}", key, value);
        }
    }

    if !has_ssid {
        panic!("\n\n.env is missing WIFI_SSID\n\n");
    }
    if !has_password {
        panic!("\n\n.env is missing WIFI_PASSWORD (leave it empty for an open network)\n\n");
    }
}

fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        let kind = &args[1];
        let what = &args[2];

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                "esp_wifi_preempt_enable"
                | "esp_wifi_preempt_yield_task"
                | "esp_wifi_preempt_task_create" => {
                    eprintln!();
                    eprintln!(
                        "💡 `esp-wifi` has no scheduler enabled. Make sure you have the `builtin-scheduler` feature enabled, or that you provide an external scheduler."
                    );
                    eprintln!();
                }
                _ => (),
            },
            // we don't have anything helpful for "missing-lib" yet
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=-Wl,--error-handling-script={}",
            exe.display()
        );
    }
}
