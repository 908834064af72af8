//! On-disk store of random graph instances.
//!
//! Layout: `<root>/n_{n}/c_{c}/n_{n}_c_{c}_{index}.json`, each file holding
//! `{"n": .., "c": .., "edges": [[u, v], ..]}`.

use super::generator::GraphGenerator;
use qubo_core::{Graph, QuboError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// A stored instance: the graph plus the color bound it was generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInstance {
    pub n: usize,
    pub c: usize,
    pub edges: Vec<(usize, usize)>,
}

impl GraphInstance {
    pub fn to_graph(&self) -> Result<Graph> {
        Graph::new(self.n, &self.edges)
    }
}

pub struct GraphInstanceStore {
    root: PathBuf,
    generator: GraphGenerator,
}

impl GraphInstanceStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P, edge_probability: f64, seed: u64) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            generator: GraphGenerator::new(edge_probability, seed)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn instance_path(&self, n: usize, c: usize, index: usize) -> PathBuf {
        self.root
            .join(format!("n_{}", n))
            .join(format!("c_{}", c))
            .join(format!("n_{}_c_{}_{}.json", n, c, index))
    }

    /// True when the root directory has any entry.
    pub fn is_populated(&self) -> bool {
        fs::read_dir(&self.root)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Generate `instances` graphs for every `n` in `n_range` and every `c`
    /// in `c_range` (default `2..=n`). Returns the number of files written.
    pub fn generate_and_store(
        &mut self,
        n_range: RangeInclusive<usize>,
        c_range: Option<RangeInclusive<usize>>,
        instances: usize,
    ) -> Result<usize> {
        let mut written = 0;
        for n in n_range {
            let colors = c_range.clone().unwrap_or(2..=n);
            for c in colors {
                let dir = self.root.join(format!("n_{}", n)).join(format!("c_{}", c));
                fs::create_dir_all(&dir)?;
                for index in 0..instances {
                    let instance = GraphInstance {
                        n,
                        c,
                        edges: self.generator.erdos_renyi(n),
                    };
                    let path = self.instance_path(n, c, index);
                    fs::write(&path, serde_json::to_string(&instance)?)?;
                    written += 1;
                }
            }
            log::debug!("[STORE] n={} done ({} files so far)", n, written);
        }
        log::info!(
            "[STORE] Generated {} instances under {} (p={})",
            written,
            self.root.display(),
            self.generator.edge_probability()
        );
        Ok(written)
    }

    /// Load one instance.
    ///
    /// # Errors
    /// [`QuboError::InstanceNotFound`] when the file is absent,
    /// [`QuboError::InvalidInstance`] when it cannot be parsed or its
    /// contents disagree with the key.
    pub fn load(&self, n: usize, c: usize, index: usize) -> Result<GraphInstance> {
        let path = self.instance_path(n, c, index);
        if !path.exists() {
            return Err(QuboError::InstanceNotFound {
                n,
                c,
                instance: index,
                path,
            });
        }

        let contents = fs::read_to_string(&path)?;
        let instance: GraphInstance = serde_json::from_str(&contents).map_err(|e| {
            QuboError::InvalidInstance(format!("{}: {}", path.display(), e))
        })?;

        if instance.n != n || instance.c != c {
            return Err(QuboError::InvalidInstance(format!(
                "{} holds n={} c={}, expected n={} c={}",
                path.display(),
                instance.n,
                instance.c,
                n,
                c
            )));
        }
        Ok(instance)
    }

    /// Load every `(n, c, index)` combination, skipping missing instances.
    pub fn load_many(
        &self,
        n_values: &[usize],
        c_values: &[usize],
        indices: &[usize],
    ) -> Result<Vec<GraphInstance>> {
        let mut loaded = Vec::new();
        for &n in n_values {
            for &c in c_values {
                for &index in indices {
                    match self.load(n, c, index) {
                        Ok(instance) => loaded.push(instance),
                        Err(e) if e.is_recoverable() => {
                            log::warn!("[STORE] Skipping missing file: n_{}_c_{}_{}.json", n, c, index);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        Ok(loaded)
    }
}
