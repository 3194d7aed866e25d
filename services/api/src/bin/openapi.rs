//! services/api/src/bin/openapi.rs
//!
//! Prints the OpenAPI document of the REST API.
//!
//! Usage: `openapi [OUTPUT]`. Without an argument the document goes to
//! `openapi.json`; `-` writes it to stdout instead.

use api_lib::web::rest::ApiDoc;
use std::io::Write;
use std::path::Path;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    let document = ApiDoc::openapi().to_pretty_json()?;

    if target == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    let path = Path::new(&target);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)?;
    eprintln!(
        "Wrote {} paths to {}",
        ApiDoc::openapi().paths.paths.len(),
        path.display()
    );
    Ok(())
}
