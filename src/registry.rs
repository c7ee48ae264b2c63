use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    assets,
    color::ClassifierParams,
    detect,
    error::{PrintmockError, PrintmockResult},
    geom::PrintArea,
};

/// Purchasable product variant and its mockup template.
///
/// Created and updated by catalog-management tooling; the cached print area
/// is populated lazily by running detection against the template image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProductVariant {
    pub id: u64,
    pub name: String,
    pub product_id: u64,
    pub template_url: String,
    /// Cached detection result. Detection is deterministic for identical
    /// template pixels, so this only needs refreshing when the template
    /// image changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_area: Option<PrintArea>,
    pub active: bool,
}

/// Catalog storage seam. Any persistent key/value or relational store can
/// sit behind this; writes of the cached print area must be idempotent
/// (last-writer-wins is fine since detection is deterministic).
pub trait VariantStore {
    fn get(&self, id: u64) -> PrintmockResult<Option<ProductVariant>>;
    fn put(&mut self, variant: ProductVariant) -> PrintmockResult<()>;
    fn list(&self) -> PrintmockResult<Vec<ProductVariant>>;
}

/// In-memory store for tests and short-lived tooling.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    variants: BTreeMap<u64, ProductVariant>,
}

impl VariantStore for MemoryStore {
    fn get(&self, id: u64) -> PrintmockResult<Option<ProductVariant>> {
        Ok(self.variants.get(&id).cloned())
    }

    fn put(&mut self, variant: ProductVariant) -> PrintmockResult<()> {
        self.variants.insert(variant.id, variant);
        Ok(())
    }

    fn list(&self) -> PrintmockResult<Vec<ProductVariant>> {
        Ok(self.variants.values().cloned().collect())
    }
}

/// JSON-file-backed store: the whole catalog is read and rewritten per
/// operation. Fine for CLI tooling and small catalogs.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> PrintmockResult<BTreeMap<u64, ProductVariant>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| {
            PrintmockError::validation(format!("read store '{}': {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PrintmockError::serde(format!("parse store '{}': {e}", self.path.display())))
    }

    fn save(&self, variants: &BTreeMap<u64, ProductVariant>) -> PrintmockResult<()> {
        let bytes = serde_json::to_vec_pretty(variants)
            .map_err(|e| PrintmockError::serde(format!("serialize store: {e}")))?;
        std::fs::write(&self.path, bytes).map_err(|e| {
            PrintmockError::validation(format!("write store '{}': {e}", self.path.display()))
        })
    }
}

impl VariantStore for JsonFileStore {
    fn get(&self, id: u64) -> PrintmockResult<Option<ProductVariant>> {
        Ok(self.load()?.remove(&id))
    }

    fn put(&mut self, variant: ProductVariant) -> PrintmockResult<()> {
        let mut variants = self.load()?;
        variants.insert(variant.id, variant);
        self.save(&variants)
    }

    fn list(&self) -> PrintmockResult<Vec<ProductVariant>> {
        Ok(self.load()?.into_values().collect())
    }
}

/// Return the variant's cached print area, detecting and caching it on the
/// first call.
///
/// Re-running against unchanged template pixels overwrites the cache with an
/// equal value, so concurrent populations are safe.
#[tracing::instrument(skip(store, client, params))]
pub async fn ensure_print_area(
    store: &mut dyn VariantStore,
    client: &reqwest::Client,
    variant_id: u64,
    params: &ClassifierParams,
) -> PrintmockResult<PrintArea> {
    let mut variant = store
        .get(variant_id)?
        .ok_or_else(|| PrintmockError::validation(format!("unknown variant {variant_id}")))?;

    if let Some(area) = variant.print_area {
        return Ok(area);
    }

    let bytes = assets::fetch_image_bytes(client, &variant.template_url).await?;
    let template = assets::decode_rgba(&bytes)?;
    let area = detect::detect_print_area(&template, params)?;
    tracing::info!(variant_id, ?area, "cached detected print area");

    variant.print_area = Some(area);
    store.put(variant)?;
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: u64, print_area: Option<PrintArea>) -> ProductVariant {
        ProductVariant {
            id,
            name: format!("variant {id}"),
            product_id: 1,
            template_url: "http://invalid.test/template.png".to_string(),
            print_area,
            active: true,
        }
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::default();
        store.put(variant(7, None)).unwrap();
        assert_eq!(store.get(7).unwrap().unwrap().id, 7);
        assert!(store.get(8).unwrap().is_none());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_returns_cached_area_without_fetching() {
        let cached = PrintArea::new(0.1, 0.2, 0.3, 0.4).unwrap();
        let mut store = MemoryStore::default();
        store.put(variant(1, Some(cached))).unwrap();

        // The template URL is unreachable; a cache hit must not touch it.
        let client = reqwest::Client::new();
        let area = ensure_print_area(&mut store, &client, 1, &ClassifierParams::default())
            .await
            .unwrap();
        assert_eq!(area, cached);
    }

    #[tokio::test]
    async fn ensure_unknown_variant_is_validation_error() {
        let mut store = MemoryStore::default();
        let client = reqwest::Client::new();
        let err = ensure_print_area(&mut store, &client, 42, &ClassifierParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PrintmockError::Validation(_)));
    }
}
