//! Node-type catalog: the static registry behind the palette and the
//! parameter panel.
//!
//! The catalog is fetched once per session from the metadata service and
//! immutable afterwards. Each entry is a [`NodeTypeDescriptor`]: display
//! metadata, typed input/output ports, and the ordered parameter schema the
//! editor renders as sliders and selects.
//!
//! Fetching goes through the [`CatalogSource`] seam so the transport can be
//! swapped out (HTTP in production, fixtures in tests). A session that
//! cannot reach the metadata service degrades to [`NodeTypeCatalog::empty`]
//! instead of failing outright: the palette shows no types, nothing
//! crashes.
//!
//! ```
//! use pipewright::catalog::{NodeTypeCatalog, NodeTypeDescriptor};
//!
//! let catalog = NodeTypeCatalog::empty();
//! assert!(catalog.lookup("data_source").is_none());
//! assert!(catalog.is_empty());
//! ```

mod descriptor;
mod source;


pub use descriptor::{
    NodeCategory, NodeTypeDescriptor, ParamControl, ParamDef, PortDef, SchemaError,
};
pub use source::{CatalogError, CatalogSource, HttpCatalogSource};

use rustc_hash::FxHashMap;
use tracing::instrument;

/// Immutable, load-once lookup table of node types for the session.
///
/// Order of descriptors is preserved from the metadata service so the
/// palette renders types in the order the service declares them.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeCatalog {
    types: Vec<NodeTypeDescriptor>,
    index: FxHashMap<String, usize>,
}

impl NodeTypeCatalog {
    /// An empty catalog, used when the metadata service is unreachable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from descriptors already in hand.
    ///
    /// Descriptors whose parameter defaults violate their own constraints
    /// are dropped with a warning; one bad registry entry must not blank
    /// the whole palette. Duplicate type keys keep the first occurrence.
    #[must_use]
    pub fn from_descriptors(descriptors: Vec<NodeTypeDescriptor>) -> Self {
        let mut types: Vec<NodeTypeDescriptor> = Vec::with_capacity(descriptors.len());
        let mut index = FxHashMap::default();
        for descriptor in descriptors {
            if let Err(err) = descriptor.validate() {
                tracing::warn!(
                    node_type = %descriptor.node_type,
                    error = %err,
                    "dropping descriptor with invalid parameter schema"
                );
                continue;
            }
            if index.contains_key(&descriptor.node_type) {
                tracing::warn!(
                    node_type = %descriptor.node_type,
                    "dropping duplicate descriptor"
                );
                continue;
            }
            index.insert(descriptor.node_type.clone(), types.len());
            types.push(descriptor);
        }
        Self { types, index }
    }

    /// Fetch the catalog through the given source and cache it.
    ///
    /// Callers that want the degrade-to-empty behavior match on the error
    /// and substitute [`NodeTypeCatalog::empty`]:
    ///
    /// ```no_run
    /// # use pipewright::catalog::{CatalogSource, NodeTypeCatalog};
    /// # async fn example(source: impl CatalogSource) {
    /// let catalog = NodeTypeCatalog::load(&source)
    ///     .await
    ///     .unwrap_or_else(|_| NodeTypeCatalog::empty());
    /// # }
    /// ```
    #[instrument(skip(source), err)]
    pub async fn load<S: CatalogSource>(source: &S) -> Result<Self, CatalogError> {
        let descriptors = source.fetch().await?;
        let catalog = Self::from_descriptors(descriptors);
        tracing::info!(types = catalog.len(), "node-type catalog loaded");
        Ok(catalog)
    }

    /// Look up a descriptor by its unique type key.
    #[must_use]
    pub fn lookup(&self, node_type: &str) -> Option<&NodeTypeDescriptor> {
        self.index.get(node_type).map(|&i| &self.types[i])
    }

    /// Iterate descriptors in service-declared order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeTypeDescriptor> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
