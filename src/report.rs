//! Appends experiment results to a CSV file,
//! writing the header once when the file does not exist yet.
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Header of the single-loss methods.
pub const PLAIN_HEADER: &str = "sampling_method,distribution,p,loss\n";
/// Header of the methods reporting several labeled losses.
pub const COMPARE_HEADER: &str =
    "sampling_method,distribution,param,p,loss,loss_type\n";

/// Appends result rows to one CSV file.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// A writer appending to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf(), }
    }

    /// Append one `sampling_method,distribution,p,loss` row.
    pub fn append_plain(
        &self,
        method: &str,
        distribution: &str,
        p: f64,
        loss: f64,
    ) -> io::Result<()>
    {
        let mut file = self.open_with_header(PLAIN_HEADER)?;
        let line = format!("{method},{distribution},{p},{loss}\n");
        file.write_all(line.as_bytes())
    }

    /// Append one labeled row per entry of `rows` in the
    /// `sampling_method,distribution,param,p,loss,loss_type` schema.
    pub fn append_labeled(
        &self,
        method: &str,
        distribution: &str,
        param: &str,
        p: f64,
        rows: &[(f64, &str)],
    ) -> io::Result<()>
    {
        let mut file = self.open_with_header(COMPARE_HEADER)?;
        for (loss, loss_type) in rows {
            let line = format!(
                "{method},{distribution},{param},{p},{loss},{loss_type}\n"
            );
            file.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    // Open the file for appending;
    // write `header` first when the file does not exist yet.
    fn open_with_header(&self, header: &str) -> io::Result<File> {
        let add_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if add_header {
            file.write_all(header.as_bytes())?;
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process;

    fn temp_path(tag: &str) -> PathBuf {
        let pid = process::id();
        std::env::temp_dir().join(format!("treesample-{tag}-{pid}.csv"))
    }

    #[test]
    fn test_plain_header_written_once() {
        let path = temp_path("plain");
        let _ = fs::remove_file(&path);

        let writer = ReportWriter::new(&path);
        writer.append_plain("baseline", "exponential(1)", 1.0, 0.25)
            .unwrap();
        writer.append_plain("baseline", "exponential(1)", 1.0, 0.5)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3, "expected 1 header + 2 rows");
        assert_eq!(lines[0], PLAIN_HEADER.trim_end());
        assert_eq!(lines[1], "baseline,exponential(1),1,0.25");
        assert_eq!(lines[2], "baseline,exponential(1),1,0.5");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_labeled_rows() {
        let path = temp_path("labeled");
        let _ = fs::remove_file(&path);

        let writer = ReportWriter::new(&path);
        writer.append_labeled(
            "resample_weight_deterministic",
            "exponential",
            "(1)",
            2.0,
            &[(0.1, "Initial"), (0.05, "Retrained")],
        ).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3, "expected 1 header + 2 rows");
        assert_eq!(lines[0], COMPARE_HEADER.trim_end());
        assert_eq!(
            lines[1],
            "resample_weight_deterministic,exponential,(1),2,0.1,Initial",
        );
        assert_eq!(
            lines[2],
            "resample_weight_deterministic,exponential,(1),2,0.05,Retrained",
        );

        let _ = fs::remove_file(&path);
    }
}
