//! Aggregated, non-fatal import problems.

use robostage_assets::ResourceError;

/// Outcome of an import that completed.
///
/// Geometry failures never abort an import; they are collected here, one
/// entry per failed visual, in the order the links were resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub robot: String,
    pub link_count: usize,
    pub joint_count: usize,
    pub failures: Vec<(String, ResourceError)>,
}

impl ImportReport {
    pub fn new(robot: impl Into<String>) -> Self {
        Self {
            robot: robot.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, link: impl Into<String>, error: ResourceError) {
        self.failures.push((link.into(), error));
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Links with at least one failure, in first-failure order.
    pub fn affected_links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = Vec::new();
        for (link, _) in &self.failures {
            if !links.contains(&link.as_str()) {
                links.push(link);
            }
        }
        links
    }

    /// One-line summary for logs and the command line.
    pub fn summary(&self) -> String {
        let base = format!(
            "imported {}: {} links, {} joints",
            self.robot, self.link_count, self.joint_count
        );
        if self.is_clean() {
            return base;
        }
        format!(
            "{base}; {} geometry failure(s) on {}",
            self.failure_count(),
            self.affected_links().join(", ")
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(uri: &str) -> ResourceError {
        ResourceError::NotFound {
            uri: uri.into(),
            searched: Vec::new(),
        }
    }

    #[test]
    fn clean_summary() {
        let report = ImportReport {
            robot: "arm".into(),
            link_count: 3,
            joint_count: 2,
            failures: Vec::new(),
        };
        assert!(report.is_clean());
        assert_eq!(report.summary(), "imported arm: 3 links, 2 joints");
    }

    #[test]
    fn failures_grouped_by_link() {
        let mut report = ImportReport::new("arm");
        report.link_count = 3;
        report.joint_count = 2;
        report.record("forearm", not_found("a.obj"));
        report.record("hand", not_found("b.obj"));
        report.record("forearm", not_found("c.obj"));

        assert_eq!(report.failure_count(), 3);
        assert_eq!(report.affected_links(), vec!["forearm", "hand"]);
        assert_eq!(
            report.summary(),
            "imported arm: 3 links, 2 joints; 3 geometry failure(s) on forearm, hand"
        );
    }
}
