use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Variables de .env disponibles vía option_env! (ver src/config.rs)
    let env_file = Path::new(".env");

    if let Ok(contents) = fs::read_to_string(env_file) {
        println!("cargo:rerun-if-changed=.env");

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            // El entorno real tiene prioridad sobre .env
            if env::var(key).is_err() {
                println!("cargo:rustc-env={}={}", key, value);
            }
        }
    } else {
        println!("cargo:warning=Sin .env: GEMINI_API_KEY no definido, el cliente IA responderá con error.");
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GEMINI_API_KEY");
    println!("cargo:rerun-if-env-changed=AI_BASE_URL");
}
