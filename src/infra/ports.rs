//! Port directory: name → coordinates, restricted items and required documents.
//!
//! The default directory is embedded from `assets/ports.json`; a JSON file with
//! the same shape can replace it at runtime.

use std::{collections::HashMap, fs, path::Path};

use rust_embed::RustEmbed;
use thiserror::Error;

use crate::domain::Port;

const PORTS_ASSET: &str = "ports.json";

#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("embedded asset {0} is missing")]
    MissingAsset(&'static str),
    #[error("failed to read port directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse port directory: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("port {name} has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinates { name: String, lat: f64, lon: f64 },
    #[error("port {0} is listed more than once")]
    Duplicate(String),
}

#[derive(Clone, Debug, Default)]
pub struct PortDirectory {
    ports: Vec<Port>,
    by_name: HashMap<String, usize>,
}

impl PortDirectory {
    /// Directory bundled with the binary.
    pub fn embedded() -> Result<Self, DirectoryError> {
        let asset =
            EmbeddedAssets::get(PORTS_ASSET).ok_or(DirectoryError::MissingAsset(PORTS_ASSET))?;
        let ports: Vec<Port> = serde_json::from_slice(asset.data.as_ref())?;
        tracing::debug!(count = ports.len(), "loaded embedded port directory");
        Self::from_ports(ports)
    }

    pub fn from_file(path: &Path) -> Result<Self, DirectoryError> {
        let content = fs::read_to_string(path)?;
        let ports: Vec<Port> = serde_json::from_str(&content)?;
        tracing::info!(
            count = ports.len(),
            path = %path.display(),
            "loaded port directory from file"
        );
        Self::from_ports(ports)
    }

    /// Build a directory, rejecting duplicate names and invalid coordinates.
    pub fn from_ports(ports: Vec<Port>) -> Result<Self, DirectoryError> {
        let mut by_name = HashMap::with_capacity(ports.len());
        for (idx, port) in ports.iter().enumerate() {
            if !port.coordinates().is_valid() {
                return Err(DirectoryError::InvalidCoordinates {
                    name: port.name.clone(),
                    lat: port.lat,
                    lon: port.lon,
                });
            }
            if by_name.insert(port.name.clone(), idx).is_some() {
                return Err(DirectoryError::Duplicate(port.name.clone()));
            }
        }
        Ok(Self { ports, by_name })
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> Option<&Port> {
        self.by_name.get(name).map(|&idx| &self.ports[idx])
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }
}
