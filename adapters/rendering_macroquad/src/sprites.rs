use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::texture::Texture2D;
use reelspin_core::SymbolId;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of symbol textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SymbolAtlas {
    textures: HashMap<SymbolId, Texture2D>,
}

impl SymbolAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    /// Retrieves the texture drawn for the provided symbol.
    #[must_use]
    pub(crate) fn texture(&self, symbol: SymbolId) -> Option<Texture2D> {
        self.textures.get(&symbol).copied()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SymbolId, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SymbolId, PathBuf)>,
        loader: &mut impl FnMut(SymbolId, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (symbol, path) in entries {
            let texture = loader(symbol, &path).with_context(|| {
                format!(
                    "failed to load sprite for symbol {} from {}",
                    symbol.get(),
                    path.display()
                )
            })?;
            if textures.insert(symbol, texture).is_some() {
                bail!("duplicate sprite entry for symbol {}", symbol.get());
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_symbol: SymbolId, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    symbols: HashMap<String, String>,
}

/// Parses the manifest into `(symbol, path)` pairs ordered by symbol id.
fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SymbolId, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::with_capacity(manifest.symbols.len());
    for (name, relative_path) in manifest.symbols {
        let symbol = name
            .trim()
            .parse::<u32>()
            .map(SymbolId::new)
            .with_context(|| format!("sprite key `{name}` is not a symbol id"))?;
        if resolved.insert(symbol, base_path.join(relative_path)).is_some() {
            bail!(
                "sprite manifest contains duplicate entry for symbol {}",
                symbol.get()
            );
        }
    }

    let mut ordered: Vec<_> = resolved.into_iter().collect();
    ordered.sort_by_key(|(symbol, _)| *symbol);
    Ok(ordered)
}
