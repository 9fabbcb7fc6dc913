//! Asset resolution.
//!
//! [`resolve`] computes a requested set of assets together with everything
//! they transitively depend on:
//!
//! 1. **Graph construction**: walk declared dependencies breadth-first from
//!    the requested kinds into a [`DependencyGraph`]
//! 2. **Validation**: reject cycles before anything is computed
//! 3. **Ordering**: topological order, dependencies first
//! 4. **Computation**: each kind exactly once, in order; in load mode an
//!    asset found on disk is used as is and only missing ones are generated
//!
//! The first failing asset aborts the whole resolution. Its error carries the
//! asset's name; nothing computed so far is returned.
//!
//! Resolution is single-threaded and state lives only for the duration of
//! one call: two calls never share computed assets.

pub mod dependency_graph;

pub use dependency_graph::DependencyGraph;

use std::collections::{HashMap, HashSet, VecDeque};

use crate::asset::{Asset, AssetContext, AssetKind, Generate, Parents, registry};
use crate::core::ManifestError;
use crate::store::FileFetcher;

/// How assets are obtained.
#[derive(Clone, Copy)]
pub enum ResolveMode<'a> {
    /// Generate every asset from its dependencies.
    Generate,
    /// Load assets from previously written files, generating those that are
    /// not present.
    Load(&'a dyn FileFetcher),
}

impl std::fmt::Debug for ResolveMode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveMode::Generate => f.write_str("Generate"),
            ResolveMode::Load(_) => f.write_str("Load"),
        }
    }
}

/// The outcome of one resolution.
#[derive(Debug)]
pub struct Resolved {
    assets: HashMap<AssetKind, Box<dyn Asset>>,
    computed: Vec<AssetKind>,
    loaded: HashSet<AssetKind>,
}

impl Resolved {
    /// The resolved asset of type `T`.
    pub fn get<T: Generate>(&self) -> Option<&T> {
        self.assets.get(&T::KIND)?.as_any().downcast_ref::<T>()
    }

    /// The resolved asset `kind` as a trait object.
    pub fn get_kind(&self, kind: AssetKind) -> Option<&dyn Asset> {
        self.assets.get(&kind).map(|asset| &**asset)
    }

    /// Remove and return the resolved asset of type `T`.
    pub fn take<T: Generate>(&mut self) -> Option<T> {
        let asset = self.assets.remove(&T::KIND)?;
        asset.into_any().downcast::<T>().ok().map(|asset| *asset)
    }

    /// Every kind in the order it was computed. Each appears once.
    pub fn computed(&self) -> &[AssetKind] {
        &self.computed
    }

    /// Whether `kind` came from disk rather than being generated.
    pub fn was_loaded(&self, kind: AssetKind) -> bool {
        self.loaded.contains(&kind)
    }
}

/// Build the dependency graph reachable from `requested`.
pub fn build_graph(requested: &[AssetKind]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let mut queue: VecDeque<AssetKind> = requested.iter().copied().collect();
    let mut seen = HashSet::new();

    while let Some(kind) = queue.pop_front() {
        if !seen.insert(kind) {
            continue;
        }
        graph.add_node(kind);
        for dep in registry::dependencies(kind) {
            graph.add_dependency(kind, dep);
            queue.push_back(dep);
        }
    }

    graph
}

/// Resolve `requested` and all of its transitive dependencies.
pub fn resolve(
    requested: &[AssetKind],
    ctx: &AssetContext,
    mode: ResolveMode<'_>,
) -> Result<Resolved, ManifestError> {
    let graph = build_graph(requested);
    let order = graph.topological_order()?;
    tracing::debug!(
        "Resolving {} assets with {} dependency edges ({:?} mode)",
        graph.node_count(),
        graph.edge_count(),
        mode
    );

    let mut assets: HashMap<AssetKind, Box<dyn Asset>> = HashMap::with_capacity(order.len());
    let mut computed = Vec::with_capacity(order.len());
    let mut loaded = HashSet::new();

    for kind in order {
        let from_disk = match mode {
            ResolveMode::Generate => None,
            ResolveMode::Load(fetcher) => registry::load(kind, fetcher, ctx)
                .map_err(|e| ManifestError::from_asset_error(kind.name(), e))?,
        };

        let asset = match from_disk {
            Some(asset) => {
                tracing::debug!("Loaded {} from disk", kind);
                loaded.insert(kind);
                asset
            }
            None => {
                let declared = registry::dependencies(kind);
                let parents = Parents::new(&assets, kind, &declared);
                let asset = registry::generate(kind, &parents, ctx)
                    .map_err(|e| ManifestError::from_asset_error(kind.name(), e))?;
                tracing::debug!("Generated {}", kind);
                asset
            }
        };

        assets.insert(kind, asset);
        computed.push(kind);
    }

    Ok(Resolved {
        assets,
        computed,
        loaded,
    })
}
