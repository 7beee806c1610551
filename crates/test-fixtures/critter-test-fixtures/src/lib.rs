use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const MANIFEST_PATH: &str = "fixtures/manifest.json";

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    parse_manifest(include_str!("../../../../fixtures/manifest.json"))
        .unwrap_or_else(|err| panic!("{err:#}"))
});

fn parse_manifest(raw: &str) -> Result<Manifest> {
    serde_json::from_str(raw).with_context(|| format!("failed to parse {MANIFEST_PATH}"))
}

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
    clips: HashMap<String, String>,
    motion: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
    #[serde(default)]
    bundles: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

macro_rules! fixture_kind {
    ($module:ident, $field:ident, $label:literal) => {
        pub mod $module {
            use super::*;

            pub fn keys() -> Vec<String> {
                let mut keys: Vec<String> = MANIFEST.$field.keys().cloned().collect();
                keys.sort();
                keys
            }

            pub fn json(name: &str) -> Result<String> {
                read_to_string(lookup(&MANIFEST.$field, $label, name)?)
            }

            pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
                super::load_json(lookup(&MANIFEST.$field, $label, name)?)
            }

            pub fn path(name: &str) -> Result<PathBuf> {
                Ok(resolve_path(lookup(&MANIFEST.$field, $label, name)?))
            }
        }
    };
}

fixture_kind!(rigs, rigs, "rig");
fixture_kind!(clips, clips, "clip");
fixture_kind!(motion, motion, "motion");
fixture_kind!(configs, configs, "config");
fixture_kind!(bundles, bundles, "bundle");
