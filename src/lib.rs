//! kubeboot: asset graph and manifest rendering for cluster bootstrap.
//!
//! kubeboot assembles a cluster's bootstrap manifests from many small,
//! independently computed assets: the install config, the cluster identity,
//! certificates, cluster-scoped configuration resources and the bundled
//! bootkube templates. Each asset declares what it depends on; the resolver
//! computes every asset once, dependencies first, and the manifest assembler
//! renders the templates and collects every file into one sorted set.
//!
//! # Architecture
//!
//! - [`asset`] - the asset model ([`Asset`](asset::Asset),
//!   [`Generate`](asset::Generate), [`Load`](asset::Load)) and kind dispatch
//! - [`resolver`] - dependency graph construction, ordering and computation
//! - [`manifests`] - the top-level assembler and its Load path
//! - [`templating`] - Tera rendering with the `indent` and `add` helpers
//! - [`installconfig`] - the install config, its redaction and cluster identity
//! - [`cluster`] - cluster-scoped `config.openshift.io` resources
//! - [`tls`] - certificate assets backed by a [`CertificateSource`](tls::CertificateSource)
//! - [`bootkube`] - the bundled templates
//! - [`aro`] - ARO values exposed to the templates
//! - [`store`] - reading and writing asset directories
//! - [`engine`] - the library entry point
//!
//! # Generate and Load
//!
//! Generate computes everything from the install config and certificate
//! material. Load reconstructs the manifests from a directory written by an
//! earlier Generate; a directory without the control manifest is reported as
//! not present so callers can fall back to Generate.

// Core functionality modules
pub mod asset;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod resolver;

// Assets
pub mod aro;
pub mod bootkube;
pub mod cluster;
pub mod installconfig;
pub mod manifests;
pub mod tls;

// Supporting modules
pub mod pattern;
pub mod store;
pub mod templating;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
