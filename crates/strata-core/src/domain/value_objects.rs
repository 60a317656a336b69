//! Small enumerations attached to layers and providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Kind of module a template generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    App,
    Backend,
    Frontend,
    Library,
}

impl LayerType {
    pub const fn id(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Library => "library",
        }
    }

    pub const ALL: [LayerType; 4] = [Self::App, Self::Backend, Self::Frontend, Self::Library];
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LayerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "app" | "application" => Ok(Self::App),
            "backend" | "service" => Ok(Self::Backend),
            "frontend" | "ui" => Ok(Self::Frontend),
            "library" | "lib" => Ok(Self::Library),
            _ => Err(DomainError::UnknownLayerType(s.to_string())),
        }
    }
}

/// Category of a feature provider.
///
/// The order is used to group providers when listing a catalog; it has no
/// effect on the order features are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Foundation,
    Platform,
    DevTools,
    DataLayer,
    UiLayer,
    Feature,
    Guides,
    #[default]
    Unspecified,
}

impl FeatureType {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Platform => "platform",
            Self::DevTools => "dev",
            Self::DataLayer => "data",
            Self::UiLayer => "ui",
            Self::Feature => "feature",
            Self::Guides => "guides",
            Self::Unspecified => "unspecified",
        }
    }

    pub const fn order(self) -> i32 {
        match self {
            Self::Foundation => i32::MIN,
            Self::Platform => 0,
            Self::DevTools => 1,
            Self::DataLayer => 2,
            Self::UiLayer => 3,
            Self::Feature => 4,
            Self::Guides => 5,
            Self::Unspecified => i32::MAX,
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
