use std::path::Path;

use crate::config::GraphConfig;
use crate::core::discovery::{parse_services, read_manifests};
use crate::core::service::Service;
use crate::error::Result;
use crate::graph::builder::{build_graph, BuildPolicy};
use crate::graph::ServiceGraph;
use crate::manifest::GoModParser;

/// One batch run: discovered services and the graph folded from them.
#[derive(Debug)]
pub struct Workspace {
    pub config: GraphConfig,
    pub services: Vec<Service>,
    pub graph: ServiceGraph,
}

impl Workspace {
    pub fn load(root: impl AsRef<Path>, config: GraphConfig) -> Result<Self> {
        let root = root.as_ref();
        let excluded = config.excluded_names();
        let parser = GoModParser::new(config.manifest_pattern())?;

        let manifests = read_manifests(root, &config.scan, &excluded)?;
        let services = parse_services(manifests, &parser)?;
        let policy = BuildPolicy {
            excluded,
            tag_directions: true,
        };
        let graph = build_graph(&services, &policy);

        Ok(Self {
            config,
            services,
            graph,
        })
    }
}
