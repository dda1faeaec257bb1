//! Completion notice composed at the end of a run. The subject and body are
//! built here; delivery is left to whatever channel the caller wires up, so
//! the default is simply printing it.

use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn completion(output_folder: &Path, elapsed_secs: f64, memory_mb: Option<f64>) -> Self {
        let folder = output_folder
            .canonicalize()
            .unwrap_or_else(|_| output_folder.to_path_buf());
        let memory_line = match memory_mb {
            Some(mb) => format!("Memory Used: {:.2} MB", mb),
            None => "Memory Used: unavailable".to_string(),
        };
        let body = format!(
            "Hi,\n\n\
             The data comparison process has been completed. \
             Please find the reports attached.\n\n\
             Report Folder: {}\n\n\
             Time Taken: {:.2} seconds\n\
             {}\n\n\
             Regards,\n\
             Data Comparison Tool",
            folder.display(),
            elapsed_secs,
            memory_line
        );
        Self {
            subject: "Data Comparison Reports".to_string(),
            body,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_completion_body_mentions_folder_and_timing() {
        let n = Notification::completion(&PathBuf::from("/tmp/mismatch"), 12.5, Some(48.2));
        assert_eq!(n.subject, "Data Comparison Reports");
        assert!(n.body.contains("/tmp/mismatch"));
        assert!(n.body.contains("Time Taken: 12.50 seconds"));
        assert!(n.body.contains("Memory Used: 48.20 MB"));
    }

    #[test]
    fn test_completion_without_memory_sample() {
        let n = Notification::completion(&PathBuf::from("/tmp/mismatch"), 1.0, None);
        assert!(n.body.contains("Memory Used: unavailable"));
    }
}
