//! Manifest descriptor emission.
//!
//! After the write phase, the distinct set of discovered schemas plus the
//! connection parameters are rendered into a small descriptor file so
//! later tooling knows what the output tree contains. The rendering
//! mechanism itself is a collaborator behind [`TemplateRenderer`]; the
//! default implementation produces a `system-config.xml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RevengError;
use crate::model::Destination;

/// File name of the descriptor written into the output directory.
pub const MANIFEST_FILE_NAME: &str = "system-config.xml";

/// Connection hints forwarded verbatim into the manifest.
#[derive(Debug, Clone, Default)]
pub struct ConnectionHints {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub server_name: Option<String>,
}

/// Parameter map handed to the renderer.
#[derive(Debug, Clone)]
pub struct ManifestParams {
    pub platform: String,
    /// Distinct schema names, post-exclusion, sorted for determinism.
    pub schemas: Vec<String>,
    pub connection: ConnectionHints,
}

impl ManifestParams {
    /// Collect the schema set from the surviving destinations. Using the
    /// post-exclusion set keeps suppressed schemas out of the manifest.
    pub fn from_destinations(
        platform: impl Into<String>,
        destinations: &[Destination],
        connection: ConnectionHints,
    ) -> Self {
        let mut schemas: Vec<String> = Vec::new();
        for dest in destinations {
            if dest.schema.is_empty() {
                continue;
            }
            if !schemas.iter().any(|s| s.eq_ignore_ascii_case(&dest.schema)) {
                schemas.push(dest.schema.clone());
            }
        }
        schemas.sort_by_key(|s| s.to_uppercase());

        ManifestParams {
            platform: platform.into(),
            schemas,
            connection,
        }
    }
}

/// External rendering collaborator.
pub trait TemplateRenderer {
    fn render(&self, params: &ManifestParams) -> Result<String, RevengError>;
}

/// Default renderer producing the `system-config.xml` descriptor.
#[derive(Debug, Default)]
pub struct XmlTemplateRenderer;

impl TemplateRenderer for XmlTemplateRenderer {
    fn render(&self, params: &ManifestParams) -> Result<String, RevengError> {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str(&format!("<dbSystemConfig type=\"{}\"", params.platform));
        let conn = &params.connection;
        if let Some(url) = &conn.url {
            xml.push_str(&format!(" url=\"{}\"", url));
        }
        if let Some(host) = &conn.host {
            xml.push_str(&format!(" dbHost=\"{}\"", host));
        }
        if let Some(port) = conn.port {
            xml.push_str(&format!(" dbPort=\"{}\"", port));
        }
        if let Some(server) = &conn.server_name {
            xml.push_str(&format!(" dbServer=\"{}\"", server));
        }
        xml.push_str(">\n  <schemas>\n");
        for schema in &params.schemas {
            xml.push_str(&format!("    <schema name=\"{}\" />\n", schema));
        }
        xml.push_str("  </schemas>\n</dbSystemConfig>\n");
        Ok(xml)
    }
}

/// Render and write the manifest into the output directory. Failure is
/// fatal to the run.
pub fn write_manifest(
    output_dir: &Path,
    params: &ManifestParams,
    renderer: &dyn TemplateRenderer,
) -> Result<PathBuf, RevengError> {
    let body = renderer.render(params)?;
    let path = output_dir.join(MANIFEST_FILE_NAME);
    fs::create_dir_all(output_dir).map_err(|e| RevengError::ManifestWriteError {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, body).map_err(|e| RevengError::ManifestWriteError {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}
