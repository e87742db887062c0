use anyhow::Context;
use candcore::interface::descriptor::CandidateDescriptor;
use std::path::Path;

/// Read and validate the candidate table.
///
/// Any malformed or invalid row aborts the whole run here, before a single
/// worker is dispatched.
pub fn load_candidate_table(path: &Path) -> anyhow::Result<Vec<CandidateDescriptor>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening candidate table {}", path.display()))?;

    let mut descriptors = Vec::new();
    for (row_no, result) in reader.deserialize::<CandidateDescriptor>().enumerate() {
        let descriptor = result.with_context(|| format!("candidate table row {row_no}"))?;
        descriptor
            .validate()
            .with_context(|| format!("candidate table row {row_no}"))?;
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(body: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"file,snr,width,dm,label,stime,kill_mask_path\n")
            .unwrap();
        temp.write_all(body.as_bytes()).unwrap();
        temp
    }

    #[test]
    fn rows_deserialize_with_nullable_mask_column() {
        let temp = table("a.fil,12.0,2,100.0,1,5.2,\nb.fil,8.5,0,40.0,0,1.1,mask.txt\n");
        let descriptors = load_candidate_table(temp.path()).unwrap();
        assert_eq!(descriptors.len(), 2);

        assert_eq!(descriptors[0].width_samples(), 4);
        assert!(descriptors[0].kill_mask_path.is_none());
        assert_eq!(descriptors[1].width_samples(), 1);
        assert_eq!(
            descriptors[1].kill_mask_path.as_deref(),
            Some(Path::new("mask.txt"))
        );
    }

    #[test]
    fn malformed_row_is_fatal_to_the_run() {
        let temp = table("a.fil,12.0,not_a_width,100.0,1,5.2,\n");
        assert!(load_candidate_table(temp.path()).is_err());
    }

    #[test]
    fn invalid_row_parameters_are_fatal_to_the_run() {
        let temp = table("a.fil,12.0,31,100.0,1,5.2,\n");
        assert!(load_candidate_table(temp.path()).is_err());
    }
}
