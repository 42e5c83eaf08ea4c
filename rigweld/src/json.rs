use crate::config::{ConflictSettings, ExclusionRules, MergeConfig, OutfitConfig};
use crate::conflict::ResolutionPolicy;
use crate::error::Error;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct MergeConfigDef {
    #[serde(default)]
    name_table: HashMap<String, String>,
    #[serde(default)]
    fuzzy_matching: bool,
    #[serde(default = "default_max_edit_distance")]
    max_edit_distance: usize,
    conflict: Option<ConflictDef>,
}

#[derive(Debug, Deserialize)]
struct ConflictDef {
    #[serde(default = "default_position_threshold")]
    position_threshold: f32,
    #[serde(default = "default_rotation_threshold")]
    rotation_threshold_deg: f32,
    #[serde(default = "default_scale_threshold")]
    scale_threshold: f32,
    #[serde(default)]
    check_scale: bool,
    #[serde(default = "default_resolution")]
    default_resolution: String,
}

#[derive(Debug, Deserialize)]
struct OutfitConfigDef {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    suffix: String,
    #[serde(default)]
    unique_prefix: String,
    #[serde(default)]
    name_table: HashMap<String, String>,
    #[serde(default)]
    exclude_patterns: Vec<String>,
}

fn default_max_edit_distance() -> usize {
    2
}

fn default_position_threshold() -> f32 {
    0.001
}

fn default_rotation_threshold() -> f32 {
    0.1
}

fn default_scale_threshold() -> f32 {
    0.01
}

fn default_resolution() -> String {
    "force_merge".to_owned()
}

/// Parses batch-wide merge options from JSON. Node handles are runtime
/// state, so only the string-keyed parts of the configuration are
/// serializable.
pub fn parse_merge_config(input: &str) -> Result<MergeConfig, Error> {
    let def: MergeConfigDef = serde_json::from_str(input).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
    })?;
    let conflict = match def.conflict {
        Some(c) => ConflictSettings {
            position_threshold: c.position_threshold,
            rotation_threshold_deg: c.rotation_threshold_deg,
            scale_threshold: c.scale_threshold,
            check_scale: c.check_scale,
            default_resolution: parse_policy(&c.default_resolution)?,
        },
        None => ConflictSettings::default(),
    };
    Ok(MergeConfig {
        name_table: def.name_table,
        fuzzy_matching: def.fuzzy_matching,
        max_edit_distance: def.max_edit_distance,
        conflict,
    })
}

/// Parses per-outfit options from JSON. Exclusions come in as name patterns
/// only; explicit node exclusions are added by the host at runtime.
pub fn parse_outfit_config(input: &str) -> Result<OutfitConfig, Error> {
    let def: OutfitConfigDef = serde_json::from_str(input).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
    })?;
    Ok(OutfitConfig {
        prefix: def.prefix,
        suffix: def.suffix,
        unique_prefix: def.unique_prefix,
        name_table: def.name_table,
        exclusions: ExclusionRules {
            nodes: Vec::new(),
            patterns: def.exclude_patterns,
        },
    })
}

fn parse_policy(value: &str) -> Result<ResolutionPolicy, Error> {
    match value {
        "force_merge" => Ok(ResolutionPolicy::ForceMerge),
        "rename" => Ok(ResolutionPolicy::Rename),
        "skip" => Ok(ResolutionPolicy::Skip),
        other => Err(Error::ConfigUnknownPolicy {
            value: other.to_owned(),
        }),
    }
}
