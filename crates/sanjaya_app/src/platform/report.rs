use std::io::Write;
use std::path::PathBuf;

use sanjaya_core::synthesized_summary;
use sanjaya_engine::{Navigator, ReportArchive};
use sanjaya_logging::{sanjaya_error, sanjaya_info};
use serde_json::Value;

/// Shows the final results of a completed run and archives them.
pub struct ReportNavigator<W: Write> {
    out: W,
    archive: Option<ReportArchive>,
    query: String,
    saved: Option<PathBuf>,
}

impl<W: Write> ReportNavigator<W> {
    pub fn new(out: W, archive: Option<ReportArchive>) -> Self {
        Self {
            out,
            archive,
            query: String::new(),
            saved: None,
        }
    }

    /// The query the next results belong to; used to name the archive file.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn saved(&self) -> Option<&PathBuf> {
        self.saved.as_ref()
    }

    fn print_report(&mut self, topic: &str, results: &Value) {
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "=== {} ===", display_topic(topic));

        if let Some(summary) = synthesized_summary(results) {
            let _ = writeln!(self.out, "{summary}");
        }

        let recommendations: Vec<&str> = results
            .get("SYNTHESIZED")
            .and_then(|s| s.get("recommendations"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if !recommendations.is_empty() {
            let _ = writeln!(self.out, "\nRecommendations:");
            for item in recommendations {
                let _ = writeln!(self.out, "  - {item}");
            }
        }
        let _ = self.out.flush();
    }
}

impl<W: Write> Navigator for ReportNavigator<W> {
    fn navigate(&mut self, topic: &str, results: &Value) {
        self.print_report(topic, results);

        let Some(archive) = &self.archive else {
            return;
        };
        match archive.save(topic, &self.query, results) {
            Ok(path) => {
                sanjaya_info!("Saved results to {:?}", path);
                let _ = writeln!(self.out, "\nSaved to {}", path.display());
                self.saved = Some(path);
            }
            Err(err) => {
                sanjaya_error!("Failed to save results: {}", err);
                let _ = writeln!(self.out, "\nCould not save results: {err}");
            }
        }
    }
}

fn display_topic(topic: &str) -> &str {
    if topic.is_empty() {
        "Results"
    } else {
        topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn results() -> Value {
        json!({
            "SYNTHESIZED": {
                "summary": "Metformin shows promise in oncology.",
                "recommendations": ["Run a phase II trial", "Check patent expiry"]
            }
        })
    }

    #[test]
    fn prints_summary_and_recommendations() {
        let mut navigator = ReportNavigator::new(Vec::new(), None);
        navigator.navigate("Metformin", &results());

        let output = String::from_utf8(navigator.out).unwrap();
        assert!(output.contains("=== Metformin ==="));
        assert!(output.contains("Metformin shows promise in oncology."));
        assert!(output.contains("  - Check patent expiry"));
    }

    #[test]
    fn falls_back_to_final_summary() {
        let mut navigator = ReportNavigator::new(Vec::new(), None);
        navigator.navigate(
            "Aspirin",
            &json!({"SYNTHESIZED": {"final_summary": "Aspirin is well covered."}}),
        );
        let output = String::from_utf8(navigator.out).unwrap();
        assert!(output.contains("Aspirin is well covered."));
    }

    #[test]
    fn empty_topic_gets_a_heading() {
        let mut navigator = ReportNavigator::new(Vec::new(), None);
        navigator.navigate("", &json!({}));
        let output = String::from_utf8(navigator.out).unwrap();
        assert!(output.contains("=== Results ==="));
        assert!(!output.contains("Recommendations"));
    }

    #[test]
    fn archives_results_with_query() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = ReportArchive::new(
            temp.path().to_path_buf(),
            Arc::new(|| "2026-01-01T00:00:00Z".to_string()),
        );
        let mut navigator = ReportNavigator::new(Vec::new(), Some(archive));
        navigator.set_query("repurposing drug metformin");
        navigator.navigate("Metformin", &results());

        let path = navigator.saved().cloned().unwrap();
        assert!(path.starts_with(temp.path()));
        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["query"], "repurposing drug metformin");
        assert_eq!(saved["saved_utc"], "2026-01-01T00:00:00Z");
        assert_eq!(saved["results"], results());
    }
}
