use crate::common::{HarnessError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// The slice of an interpolated deployment manifest the scenarios look at.
/// Everything else in the document is ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub instance_groups: Vec<InstanceGroup>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub releases: Vec<Release>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceGroup {
    pub name: String,

    /// `None` when the key is absent, which is not the same as zero.
    #[serde(default)]
    pub instances: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub azs: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub networks: Vec<NetworkRef>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub properties: Option<JobProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProperties {
    #[serde(default)]
    pub doppler: Option<DopplerProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DopplerProperties {
    #[serde(default)]
    pub port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// An explicit `~` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(bytes).map_err(|e| {
            HarnessError::Decode(format!("failed to unmarshal interpolate output: {}", e))
        })
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Self::from_slice(content.as_bytes())
    }
}

impl Job {
    pub fn doppler_port(&self) -> Option<i64> {
        self.properties
            .as_ref()
            .and_then(|p| p.doppler.as_ref())
            .and_then(|d| d.port)
    }
}
