//! Request counters
//!
//! One counter per document/search endpoint, exported in Prometheus text format.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Add,
    Edit,
    Remove,
    RemoveAll,
    SearchOne,
    SearchAll,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Add,
        Endpoint::Edit,
        Endpoint::Remove,
        Endpoint::RemoveAll,
        Endpoint::SearchOne,
        Endpoint::SearchAll,
    ];

    /// Route path, used as the `path` label
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Add => "/api/documents/add",
            Endpoint::Edit => "/api/documents/edit",
            Endpoint::Remove => "/api/documents/remove",
            Endpoint::RemoveAll => "/api/documents/remove_all",
            Endpoint::SearchOne => "/api/search/one",
            Endpoint::SearchAll => "/api/search/all",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub struct Metrics {
    project_name: String,
    counters: [AtomicU64; Endpoint::ALL.len()],
}

impl Metrics {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            counters: Default::default(),
        }
    }

    pub fn record(&self, endpoint: Endpoint) {
        self.counters[endpoint.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, endpoint: Endpoint) -> u64 {
        self.counters[endpoint.index()].load(Ordering::Relaxed)
    }

    /// Prometheus text exposition
    pub fn render(&self) -> String {
        let mut out = String::new();
        for endpoint in Endpoint::ALL {
            out.push_str(&format!(
                "http_request_duration_seconds_count{{path=\"{}\",project_name=\"{}\"}} {}\n",
                endpoint.path(),
                self.project_name,
                self.count(endpoint)
            ));
        }
        out.push_str(&format!("\nup{{project_name=\"{}\"}} 1\n", self.project_name));
        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new("fts")
    }
}
