use std::{env, fs, io::Write, path::Path, path::PathBuf};

const DEFAULT_LEAFLET_VERSION: &str = "1.9.4";
const VERSION_STAMP: &str = "VERSION";

// Vendors Leaflet into public/vendor/leaflet and exports the version as
// CIVIX_LEAFLET_VERSION so the map bridge's CDN fallback asks for the same
// release. Network failures only warn; the bridge falls back to the CDN.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LEAFLET_VERSION");
    println!("cargo:rerun-if-env-changed=CIVIX_SKIP_VENDOR");

    let version = leaflet_version(env::var("LEAFLET_VERSION").ok().as_deref());
    println!("cargo:rustc-env=CIVIX_LEAFLET_VERSION={version}");

    if env::var_os("CIVIX_SKIP_VENDOR").is_some() {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        eprintln!("CARGO_MANIFEST_DIR not set; skipping Leaflet vendoring");
        return;
    };
    let leaflet_dir = manifest_dir.join("public").join("vendor").join("leaflet");

    if let Err(e) = fs::create_dir_all(&leaflet_dir) {
        eprintln!("Failed to create Leaflet vendor dir {leaflet_dir:?}: {e}");
        return;
    }

    // A different version on disk is replaced, not reused.
    let stamp = leaflet_dir.join(VERSION_STAMP);
    let stale = fs::read_to_string(&stamp)
        .map(|s| s.trim() != version)
        .unwrap_or(true);

    let mut ok = true;
    for kind in ["css", "js"] {
        if let Err(e) = vendor_file(&leaflet_dir, &version, kind, stale) {
            eprintln!("Failed to vendor Leaflet {version} {kind}: {e}");
            ok = false;
        }
    }

    if ok && stale {
        if let Err(e) = fs::write(&stamp, &version) {
            eprintln!("Failed to write {stamp:?}: {e}");
        }
    }
}

/// `LEAFLET_VERSION` when it looks like a semver triple, else the pinned default.
fn leaflet_version(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(v) if v.split('.').count() == 3 && v.split('.').all(|p| p.parse::<u32>().is_ok()) => {
            v.to_string()
        }
        Some(v) => {
            eprintln!("Ignoring LEAFLET_VERSION={v:?}; using {DEFAULT_LEAFLET_VERSION}");
            DEFAULT_LEAFLET_VERSION.to_string()
        }
        None => DEFAULT_LEAFLET_VERSION.to_string(),
    }
}

fn vendor_file(
    leaflet_dir: &Path,
    version: &str,
    kind: &str,
    replace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_path = leaflet_dir.join(format!("leaflet.{kind}"));
    if out_path.exists() && !replace {
        return Ok(());
    }

    let url = format!("https://unpkg.com/leaflet@{version}/dist/leaflet.{kind}");
    println!("Downloading {url} -> {}", out_path.display());

    let resp = reqwest::blocking::get(&url)?;
    if !resp.status().is_success() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }

    let bytes = resp.bytes()?;
    // unpkg answers unknown versions with an HTML page on some mirrors.
    if bytes.is_empty() || bytes.starts_with(b"<!DOCTYPE") || bytes.starts_with(b"<html") {
        return Err(format!("{url} did not return a Leaflet {kind} file").into());
    }

    let tmp = out_path.with_extension(format!("{kind}.part"));
    let mut file = fs::File::create(&tmp)?;
    file.write_all(&bytes)?;
    file.flush()?;
    fs::rename(&tmp, &out_path)?;

    Ok(())
}
