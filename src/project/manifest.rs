//! app.json reading and version increments

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::deploy::error::{DeployError, DeployResult};

/// File name of the AL package manifest, relative to the project root
pub const MANIFEST_FILE: &str = "app.json";

/// Largest value of a single version component (AL stores them as int32)
pub const MAX_VERSION_COMPONENT: u32 = i32::MAX as u32;

/// A four-part AL version number (`major.minor.build.revision`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AppVersion(pub [u32; 4]);

impl AppVersion {
    /// Increment the targeted component and reset everything to its right.
    ///
    /// Fails with `VersionFormatInvalid` when the component is already at
    /// [`MAX_VERSION_COMPONENT`].
    pub fn bump(self, kind: IncrementKind) -> DeployResult<Self> {
        let target = match kind {
            IncrementKind::Major => 0,
            IncrementKind::Minor => 1,
            IncrementKind::Build => 2,
            IncrementKind::Revision => 3,
        };

        let mut next = self.0;
        next[target] = next[target]
            .checked_add(1)
            .filter(|value| *value <= MAX_VERSION_COMPONENT)
            .ok_or_else(|| DeployError::VersionFormatInvalid(self.to_string()))?;
        for component in next.iter_mut().skip(target + 1) {
            *component = 0;
        }
        Ok(Self(next))
    }
}

impl FromStr for AppVersion {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeployError::VersionFormatInvalid(s.to_string());

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut components = [0u32; 4];
        for (slot, part) in components.iter_mut().zip(parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part
                .parse::<u32>()
                .ok()
                .filter(|value| *value <= MAX_VERSION_COMPONENT)
                .ok_or_else(invalid)?;
        }

        Ok(Self(components))
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Which version component `deploy-with-increment` bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Major,
    Minor,
    Build,
    Revision,
}

impl FromStr for IncrementKind {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "build" => Ok(Self::Build),
            "revision" => Ok(Self::Revision),
            other => Err(DeployError::InvalidIncrementConfig(other.to_string())),
        }
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Build => "build",
            Self::Revision => "revision",
        };
        f.write_str(name)
    }
}

/// The subset of app.json this tool cares about.
///
/// `version` is kept exactly as written in app.json; the compiler names the
/// package and the platform reports status with that spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub publisher: String,
}

impl Manifest {
    pub fn app_version(&self) -> DeployResult<AppVersion> {
        self.version.parse()
    }
}

impl Manifest {
    /// File name the AL compiler gives the packaged app
    pub fn artifact_file_name(&self) -> String {
        format!("{}_{}_{}.app", self.publisher, self.name, self.version)
    }
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: String,
    version: Option<String>,
    #[serde(default)]
    publisher: String,
}

pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

/// True when the directory looks like an AL project
pub fn manifest_exists(project_dir: &Path) -> bool {
    manifest_path(project_dir).is_file()
}

pub fn read_manifest(project_dir: &Path) -> DeployResult<Manifest> {
    let path = manifest_path(project_dir);
    let content = read_manifest_text(&path)?;

    let raw: RawManifest = serde_json::from_str(&content)
        .map_err(|e| DeployError::ManifestInvalid(e.to_string()))?;
    let version = raw
        .version
        .ok_or_else(|| DeployError::ManifestInvalid("version not found".to_string()))?;

    version.parse::<AppVersion>()?;

    let manifest = Manifest {
        name: raw.name,
        version,
        publisher: raw.publisher,
    };
    debug!(
        "Read manifest {} {} by {}",
        manifest.name, manifest.version, manifest.publisher
    );
    Ok(manifest)
}

/// Bump the version in app.json and write it back.
///
/// Every other field is preserved in its original order; the file is
/// rewritten with 4-space indentation. Nothing is written if the current
/// version cannot be parsed.
pub fn bump_manifest(project_dir: &Path, kind: IncrementKind) -> DeployResult<Manifest> {
    let path = manifest_path(project_dir);
    let content = read_manifest_text(&path)?;

    let mut document: Value = serde_json::from_str(&content)
        .map_err(|e| DeployError::ManifestInvalid(e.to_string()))?;
    let object = document
        .as_object_mut()
        .ok_or_else(|| DeployError::ManifestInvalid("expected a JSON object".to_string()))?;

    let current: AppVersion = object
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| DeployError::ManifestInvalid("version not found".to_string()))?
        .parse()?;
    let next = current.bump(kind)?;
    object.insert("version".to_string(), Value::String(next.to_string()));

    let name = string_field(object.get("name"));
    let publisher = string_field(object.get("publisher"));

    fs::write(&path, to_four_space_json(&document)?)
        .map_err(|e| DeployError::io(format!("Failed to write {}", path.display()), e))?;
    info!("Incremented {} version: {} -> {}", kind, current, next);

    Ok(Manifest {
        name,
        version: next.to_string(),
        publisher,
    })
}

fn read_manifest_text(path: &Path) -> DeployResult<String> {
    if !path.is_file() {
        return Err(DeployError::ManifestMissing(path.to_path_buf()));
    }
    fs::read_to_string(path)
        .map_err(|e| DeployError::io(format!("Failed to read {}", path.display()), e))
}

fn string_field(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn to_four_space_json(value: &Value) -> DeployResult<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(value, &mut serializer)
        .map_err(|e| DeployError::ManifestInvalid(e.to_string()))?;
    Ok(out)
}
