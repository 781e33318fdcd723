use std::{env, fs, io::Write, path::Path, path::PathBuf};

const DEFAULT_LEAFLET_VERSION: &str = "1.9.4";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LEAFLET_VERSION");
    // Read by the crate through option_env!
    println!("cargo:rerun-if-env-changed=TRACKER_IP_ENDPOINT");
    println!("cargo:rerun-if-env-changed=TRACKER_BACKEND_URL");
    println!("cargo:rerun-if-env-changed=TRACKER_MAP_TILE_URL");
    println!("cargo:rerun-if-env-changed=TRACKER_MAP_API_KEY");
    println!("cargo:rerun-if-env-changed=TRACKER_MAP_ATTRIBUTION");

    let version =
        env::var("LEAFLET_VERSION").unwrap_or_else(|_| DEFAULT_LEAFLET_VERSION.to_string());

    // The backend serves dist/public, so Leaflet lands at /vendor/leaflet/*
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let leaflet_dir = PathBuf::from(manifest_dir)
        .join("dist")
        .join("public")
        .join("vendor")
        .join("leaflet");

    if let Err(e) = fs::create_dir_all(&leaflet_dir) {
        println!("cargo:warning=failed to create Leaflet vendor dir {leaflet_dir:?}: {e}");
        return;
    }

    for kind in ["css", "js"] {
        if let Err(e) = vendor_leaflet_file(&leaflet_dir, &version, kind) {
            println!("cargo:warning=failed to vendor leaflet.{kind}: {e}");
        }
    }
}

fn vendor_leaflet_file(
    leaflet_dir: &Path,
    version: &str,
    kind: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_path = leaflet_dir.join(format!("leaflet.{kind}"));
    if out_path.exists() {
        return Ok(());
    }

    let url = format!("https://unpkg.com/leaflet@{version}/dist/leaflet.{kind}");
    let resp = reqwest::blocking::get(&url)?;
    if !resp.status().is_success() {
        return Err(format!("GET {url}: HTTP {}", resp.status()).into());
    }

    let bytes = resp.bytes()?;
    let mut file = fs::File::create(&out_path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}
