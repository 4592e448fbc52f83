//! Loads WiFi credentials and webhook URLs from `.env` into compile-time
//! environment variables read with `env!` / `option_env!`.

const REQUIRED: &[&str] = &["WIFI_SSID", "WIFI_PASSWORD", "EVENT_URL", "PRIVACY_URL"];

const OPTIONAL: &[&str] = &[
    "WIFI_SSID_2",
    "WIFI_PASSWORD_2",
    "WIFI_SSID_3",
    "WIFI_PASSWORD_3",
    "WIFI_SSID_4",
    "WIFI_PASSWORD_4",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    match dotenvy::dotenv() {
        Ok(path) => println!("cargo:warning=Loaded {}", path.display()),
        Err(e) => println!("cargo:warning=No .env file loaded ({e}), using the environment"),
    }

    for key in REQUIRED.iter().chain(OPTIONAL) {
        println!("cargo:rerun-if-env-changed={key}");
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        } else if REQUIRED.contains(key) {
            panic!("{key} must be set in .env or the environment (see .env.example)");
        }
    }
}
