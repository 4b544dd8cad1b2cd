//! Failure propagation for fluent call trees.
//!
//! Every public assertion call enters a child [`Chain`] node. The node keeps
//! its own `failed` flag, seeded from the parent at branch time, so a
//! failure poisons everything created below it afterwards without touching
//! branches that were already handed out.
//!
//! ```text
//! root ── Request("GET") ── Expect() ─┬─ Status(200)          (ok)
//!                                     └─ JSON() ── Object() ── Value("id")  (failed)
//!                                                                └─ Number()   (starts failed, silent)
//! ```
//!
//! Reporting happens inside [`Chain::fail`], once per node. A node that was
//! born failed never reports.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::failure::{AssertionFailure, Severity};
use crate::reporter::Reporter;

struct Node {
    parent:            Option<Arc<Node>>,
    segment:           String,
    alias:             Option<String>,
    severity:          Severity,
    // Shared with the node this one replaces on `set_alias`/`set_severity`,
    // so children entered before the rename still mark it.
    failed:            Arc<AtomicBool>,
    failed_descendant: Arc<AtomicBool>,
    reporter:          Arc<dyn Reporter>,
}

impl Node {
    fn child(parent: &Arc<Node>, segment: String) -> Node {
        Node {
            parent: Some(Arc::clone(parent)),
            segment,
            alias: None,
            severity: parent.severity,
            failed: Arc::new(AtomicBool::new(parent.failed.load(Ordering::Acquire))),
            failed_descendant: Arc::new(AtomicBool::new(false)),
            reporter: Arc::clone(&parent.reporter),
        }
    }

    /// Same node identity with a different alias or severity.
    fn renamed(&self, alias: Option<String>, severity: Severity) -> Node {
        Node {
            parent: self.parent.clone(),
            segment: self.segment.clone(),
            alias,
            severity,
            failed: Arc::clone(&self.failed),
            failed_descendant: Arc::clone(&self.failed_descendant),
            reporter: Arc::clone(&self.reporter),
        }
    }

    fn ancestors(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }
}

/// One node of the assertion tree.
///
/// `Clone` produces an independent sibling-like node: it shares the reporter
/// and the path lineage, but owns its failed flag.
pub struct Chain {
    node: Arc<Node>,
}

impl Chain {
    /// Create a root node that reports into `reporter`.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self { Self::root("", reporter) }

    /// Create a root node whose path starts with `label`.
    pub fn root(label: impl Into<String>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            node: Arc::new(Node {
                parent: None,
                segment: label.into(),
                alias: None,
                severity: Severity::Fatal,
                failed: Arc::new(AtomicBool::new(false)),
                failed_descendant: Arc::new(AtomicBool::new(false)),
                reporter,
            }),
        }
    }

    /// Branch off a child node labelled `label`.
    ///
    /// The child inherits the alias lineage, the severity and the current
    /// failed state. A child entered under a failed node starts failed and
    /// will never report.
    pub fn enter(&self, label: impl Into<String>) -> Chain {
        Chain {
            node: Arc::new(Node::child(&self.node, label.into())),
        }
    }

    /// Mark this node failed and report `failure`.
    ///
    /// Idempotent: a node reports at most once, and a node that was created
    /// under an already failed ancestor does not report at all.
    pub fn fail(&self, mut failure: AssertionFailure) {
        if self.node.failed.swap(true, Ordering::AcqRel) {
            return;
        }

        for ancestor in self.node.ancestors().skip(1) {
            ancestor.failed_descendant.store(true, Ordering::Release);
        }

        failure.path = self.path();
        failure.alias_path = self.alias_path();
        failure.severity = self.node.severity;

        debug!(path = %failure.path, kind = %failure.kind, "assertion chain failed");
        self.node.reporter.report(&failure);
    }

    /// `true` when this node failed, or was entered under a failed node.
    pub fn failed(&self) -> bool { self.node.failed.load(Ordering::Acquire) }

    /// `true` when some node entered below this one has failed.
    ///
    /// Diagnostic only; it never gates assertions.
    pub fn failed_descendant(&self) -> bool { self.node.failed_descendant.load(Ordering::Acquire) }

    /// Rename this node for path rendering of every node entered from now on.
    ///
    /// Nodes already entered keep the name they were created with.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.node = Arc::new(self.node.renamed(Some(alias.into()), self.node.severity));
    }

    /// Change the severity attached to failures of this node and of nodes
    /// entered from it afterwards.
    pub fn set_severity(&mut self, severity: Severity) {
        self.node = Arc::new(self.node.renamed(self.node.alias.clone(), severity));
    }

    pub fn severity(&self) -> Severity { self.node.severity }

    /// Full path from the root, segments joined with `.`.
    pub fn path(&self) -> String {
        let mut segments: Vec<&str> = self
            .node
            .ancestors()
            .map(|node| node.segment.as_str())
            .filter(|segment| !segment.is_empty())
            .collect();
        segments.reverse();
        segments.join(".")
    }

    /// Path rendered from the nearest aliased node downwards.
    ///
    /// Equals [`Chain::path`] when no node on the way up carries an alias.
    pub fn alias_path(&self) -> String {
        let mut segments = Vec::new();
        for node in self.node.ancestors() {
            if let Some(alias) = &node.alias {
                segments.push(alias.as_str());
                break;
            }
            if !node.segment.is_empty() {
                segments.push(node.segment.as_str());
            }
        }
        segments.reverse();
        segments.join(".")
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> { &self.node.reporter }
}

impl Clone for Chain {
    fn clone(&self) -> Self {
        Chain {
            node: Arc::new(Node::child(&self.node, String::new())),
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("path", &self.path())
            .field("alias_path", &self.alias_path())
            .field("failed", &self.failed())
            .field("failed_descendant", &self.failed_descendant())
            .field("severity", &self.node.severity)
            .finish()
    }
}
