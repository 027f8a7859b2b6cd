use serde::Deserialize;
use std::path::Path;

use crate::enemy::EnemyKind;
use crate::entity::ItemKind;

#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Duplicate(u32),
    Empty,
    Unknown(u32),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Yaml(err) => write!(f, "yaml error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Duplicate(number) => write!(f, "level {number} defined twice"),
            Self::Empty => write!(f, "no level files found"),
            Self::Unknown(number) => write!(f, "unknown level: {number}"),
        }
    }
}

impl std::error::Error for LevelError {}

impl From<std::io::Error> for LevelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for LevelError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Immutable layout bundle for one level, straight from a data file.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelDef {
    pub number: u32,
    pub width: f32,
    pub player_start: SpawnPoint,
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub npcs: Vec<NpcSpec>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    #[serde(default)]
    pub portals: Vec<PortalSpec>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NpcSpec {
    pub x: f32,
    pub y: f32,
    pub name: String,
    #[serde(default)]
    pub dialog: Vec<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ItemSpec {
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PortalSpec {
    pub x: f32,
    pub y: f32,
}

/// Read-only registry of authored levels, loaded once from a directory of
/// YAML or JSON files. Lookup by level number is pure; asking for a number
/// outside the authored set is the caller's configuration error.
pub struct LevelLibrary {
    levels: Vec<LevelDef>,
}

impl LevelLibrary {
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
                continue;
            };
            let def = if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
                serde_yaml::from_str(&std::fs::read_to_string(&path)?)?
            } else if ext.eq_ignore_ascii_case("json") {
                serde_json::from_str(&std::fs::read_to_string(&path)?)?
            } else {
                continue;
            };
            levels.push(def);
        }
        Self::from_defs(levels)
    }

    pub fn from_defs(mut levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        levels.sort_by_key(|level| level.number);
        for pair in levels.windows(2) {
            if pair[0].number == pair[1].number {
                return Err(LevelError::Duplicate(pair[0].number));
            }
        }
        Ok(Self { levels })
    }

    pub fn level(&self, number: u32) -> Option<&LevelDef> {
        self.levels.iter().find(|level| level.number == number)
    }

    /// Lowest authored level number, the entry point of a fresh run.
    pub fn first(&self) -> u32 {
        self.levels[0].number
    }

    pub fn last(&self) -> u32 {
        self.levels[self.levels.len() - 1].number
    }
}
