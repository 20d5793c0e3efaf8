//! The root/serial hierarchy and the environment that owns it.
//!
//! # Architecture
//!
//! ```text
//! Environment
//! ├── roots: name -> Root
//! │             └── serials: name -> Serial (local membership sets)
//! └── functions / failures / articles / causes (canonical registries)
//! ```
//!
//! Serials never own entities. They record which canonical entities were
//! observed for them, by handle.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::index::CodeIndex;
use crate::registry::Registry;
use crate::types::{
    Article, ArticleId, Cause, CauseId, Failure, FailureId, Function, FunctionId,
};

/// A unit scoped under a root, with the entities observed for it.
#[derive(Debug)]
pub struct Serial {
    name: String,
    articles: CodeIndex<ArticleId>,
    causes: CodeIndex<CauseId>,
    functions: CodeIndex<FunctionId>,
    failures: CodeIndex<FailureId>,
}

impl Serial {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            articles: CodeIndex::new(),
            causes: CodeIndex::new(),
            functions: CodeIndex::new(),
            failures: CodeIndex::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Membership is keyed by the entity's own code, so callers pass the code
    // read back from the registry.

    pub(crate) fn add_function(&mut self, handle: FunctionId, code: &str) -> bool {
        self.functions.insert(code, handle)
    }

    pub(crate) fn add_failure(&mut self, handle: FailureId, code: &str) -> bool {
        self.failures.insert(code, handle)
    }

    pub(crate) fn add_article(&mut self, handle: ArticleId, code: &str) -> bool {
        self.articles.insert(code, handle)
    }

    pub(crate) fn add_cause(&mut self, handle: CauseId, code: &str) -> bool {
        self.causes.insert(code, handle)
    }

    pub fn functions(&self) -> &CodeIndex<FunctionId> {
        &self.functions
    }

    pub fn failures(&self) -> &CodeIndex<FailureId> {
        &self.failures
    }

    pub fn articles(&self) -> &CodeIndex<ArticleId> {
        &self.articles
    }

    pub fn causes(&self) -> &CodeIndex<CauseId> {
        &self.causes
    }
}

/// Top-level grouping identifier owning its serials.
#[derive(Debug)]
pub struct Root {
    name: String,
    serials: BTreeMap<String, Serial>,
}

impl Root {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            serials: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_or_create_serial(&mut self, name: &str) -> &mut Serial {
        let root = &self.name;
        self.serials.entry(name.to_string()).or_insert_with(|| {
            debug!(root = %root, serial = name, "New serial");
            Serial::new(name)
        })
    }

    pub fn serial(&self, name: &str) -> Option<&Serial> {
        self.serials.get(name)
    }

    /// Serials ordered by name.
    pub fn serials(&self) -> impl Iterator<Item = &Serial> + '_ {
        self.serials.values()
    }

    pub fn serial_count(&self) -> usize {
        self.serials.len()
    }
}

/// Counts describing a populated environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub roots: usize,
    pub serials: usize,
    pub functions: usize,
    pub failures: usize,
    pub articles: usize,
    pub causes: usize,
    /// Undirected function/failure pairs.
    pub function_failure_links: usize,
    /// Undirected article/cause pairs.
    pub article_cause_links: usize,
}

/// Per-serial membership counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialSummary {
    pub name: String,
    pub functions: usize,
    pub failures: usize,
    pub articles: usize,
    pub causes: usize,
}

/// A root with the summaries of its serials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootSummary {
    pub name: String,
    pub serials: Vec<SerialSummary>,
}

/// The single mutable state container for a load run.
#[derive(Debug, Default)]
pub struct Environment {
    pub(crate) roots: BTreeMap<String, Root>,
    pub(crate) functions: Registry<Function>,
    pub(crate) failures: Registry<Failure>,
    pub(crate) articles: Registry<Article>,
    pub(crate) causes: Registry<Cause>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_root(&mut self, name: &str) -> &mut Root {
        Self::root_entry(&mut self.roots, name)
    }

    /// Root lookup that borrows only the root map, leaving the registries
    /// free for the caller.
    pub(crate) fn root_entry<'a>(roots: &'a mut BTreeMap<String, Root>, name: &str) -> &'a mut Root {
        roots.entry(name.to_string()).or_insert_with(|| {
            debug!(root = name, "New root");
            Root::new(name)
        })
    }

    pub fn root(&self, name: &str) -> Option<&Root> {
        self.roots.get(name)
    }

    /// Roots ordered by name.
    pub fn roots(&self) -> impl Iterator<Item = &Root> + '_ {
        self.roots.values()
    }

    pub fn functions(&self) -> &Registry<Function> {
        &self.functions
    }

    pub fn failures(&self) -> &Registry<Failure> {
        &self.failures
    }

    pub fn articles(&self) -> &Registry<Article> {
        &self.articles
    }

    pub fn causes(&self) -> &Registry<Cause> {
        &self.causes
    }

    pub fn get_or_create_function(&mut self, code: &str, label: &str) -> FunctionId {
        self.functions.get_or_create(code, label)
    }

    pub fn get_or_create_failure(&mut self, code: &str, label: &str) -> FailureId {
        self.failures.get_or_create(code, label)
    }

    pub fn get_or_create_article(&mut self, code: &str, label: &str) -> ArticleId {
        self.articles.get_or_create(code, label)
    }

    pub fn get_or_create_cause(&mut self, code: &str, label: &str) -> CauseId {
        self.causes.get_or_create(code, label)
    }

    /// Record that `function` and `failure` were observed together.
    ///
    /// Both directions are written here; there is no way to write only one.
    /// Returns `true` if the pair was not linked before.
    pub fn link_function_failure(&mut self, function: FunctionId, failure: FailureId) -> bool {
        let function_code = self.functions[function].ident.code.clone();
        let failure_code = self.failures[failure].ident.code.clone();

        let forward = self
            .functions
            .get_mut(function)
            .failures
            .insert(&failure_code, failure);
        let backward = self
            .failures
            .get_mut(failure)
            .functions
            .insert(&function_code, function);
        debug_assert_eq!(forward, backward, "function/failure link out of sync");
        forward
    }

    /// Record that `article` and `cause` were observed together.
    pub fn link_article_cause(&mut self, article: ArticleId, cause: CauseId) -> bool {
        let article_code = self.articles[article].ident.code.clone();
        let cause_code = self.causes[cause].ident.code.clone();

        let forward = self
            .articles
            .get_mut(article)
            .causes
            .insert(&cause_code, cause);
        let backward = self
            .causes
            .get_mut(cause)
            .articles
            .insert(&article_code, article);
        debug_assert_eq!(forward, backward, "article/cause link out of sync");
        forward
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            roots: self.roots.len(),
            serials: self.roots.values().map(Root::serial_count).sum(),
            functions: self.functions.len(),
            failures: self.failures.len(),
            articles: self.articles.len(),
            causes: self.causes.len(),
            function_failure_links: self
                .functions
                .iter()
                .map(|(_, f)| f.failures.len())
                .sum(),
            article_cause_links: self.articles.iter().map(|(_, a)| a.causes.len()).sum(),
        }
    }

    pub fn root_summaries(&self) -> Vec<RootSummary> {
        self.roots()
            .map(|root| RootSummary {
                name: root.name().to_string(),
                serials: root
                    .serials()
                    .map(|serial| SerialSummary {
                        name: serial.name().to_string(),
                        functions: serial.functions().len(),
                        failures: serial.failures().len(),
                        articles: serial.articles().len(),
                        causes: serial.causes().len(),
                    })
                    .collect(),
            })
            .collect()
    }
}
