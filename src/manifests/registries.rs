//! Worker node `registries.conf`, delivered as a data URL.

use crate::installconfig::ImageContentSource;
use crate::utils::dataurl;

const SEARCH_REGISTRIES: &str =
    "unqualified-search-registries = [\"registry.access.redhat.com\", \"docker.io\"]\n";

/// The `registries.conf` text for `sources`.
pub fn registries_conf(sources: &[ImageContentSource]) -> String {
    let mut conf = String::from(SEARCH_REGISTRIES);
    for source in sources {
        conf.push_str(&format!(
            "\n[[registry]]\n  prefix = \"\"\n  location = \"{}\"\n  mirror-by-digest-only = true\n",
            source.source
        ));
        for mirror in &source.mirrors {
            conf.push_str(&format!("\n  [[registry.mirror]]\n    location = \"{mirror}\"\n"));
        }
    }
    conf
}

/// [`registries_conf`] encoded as a single-line `data:` URL.
pub fn aro_worker_registries(sources: &[ImageContentSource]) -> String {
    dataurl::encode_text(registries_conf(sources).as_bytes())
}
