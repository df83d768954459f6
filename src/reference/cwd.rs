use crate::gl::glstring::HLA_PREFIX;
use crate::utils::{open_text_reader, Result};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// Version selector matching whichever database column the reference file
/// lists first.
pub const LATEST_HLADB: &str = "latest";

/// The common and well-documented allele list for one HLA database version.
///
/// The reference file carries one accession column followed by one allele
/// column per database version, versions named in the header row (dots
/// stripped, `3.25.0` -> `3250`). Alleles are stored fully qualified.
#[derive(Debug, Default)]
pub struct CwdTable {
    alleles: HashSet<String>,
}

impl CwdTable {
    pub fn from_path(path: &Path, hladb_version: &str) -> Result<Self> {
        let reader = open_text_reader(path)?;
        Self::from_reader(reader, hladb_version)
            .map_err(|e| format!("Failed to load CWD table {}: {}", path.display(), e))
    }

    pub fn from_reader(reader: impl BufRead, hladb_version: &str) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let header = match lines.next() {
            None => return Ok(CwdTable::default()),
            Some((_, line)) => line.map_err(|e| format!("error reading header: {}", e))?,
        };
        let headers: Vec<&str> = header.split('\t').collect();
        if headers.len() < 2 {
            return Err(format!("expected accession and version columns: {}", header));
        }

        let version_idx = if hladb_version == LATEST_HLADB {
            1
        } else {
            let wanted = hladb_version.replace('.', "");
            match headers.iter().position(|h| *h == wanted) {
                Some(idx) => idx,
                None => {
                    log::warn!(
                        "CWD reference file has no column for HLA database '{}'. \
                         Defaulting to the latest version in the file: {}",
                        hladb_version,
                        headers[1]
                    );
                    1
                }
            }
        };

        let mut alleles = HashSet::new();
        for (line_num, line) in lines {
            let line = line.map_err(|e| format!("error reading line {}: {}", line_num + 1, e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = trimmed.split('\t').collect();
            let Some(allele) = columns.get(version_idx) else {
                log::warn!("Skipping short CWD record at line {}", line_num + 1);
                continue;
            };
            alleles.insert(format!("{}{}", HLA_PREFIX, allele));
        }

        Ok(CwdTable { alleles })
    }

    pub fn is_common_well_documented(&self, allele: &str) -> bool {
        self.alleles.contains(allele)
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CWD_DATA: &str = "\
accession\t3250\t3200
HLA00132\tB*07:02:01\tB*07:02:01
HLA00318\tC*07:01:01\tC*07:01
HLA00664\tDRB1*03:01:01\tDRB1*03:01
";

    #[test]
    fn load_latest_version_column() {
        let table = CwdTable::from_reader(Cursor::new(CWD_DATA), LATEST_HLADB).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_common_well_documented("HLA-B*07:02:01"));
        assert!(!table.is_common_well_documented("B*07:02:01"));
    }

    #[test]
    fn load_named_version_column() {
        let table = CwdTable::from_reader(Cursor::new(CWD_DATA), "3.20.0").unwrap();
        assert!(table.is_common_well_documented("HLA-C*07:01"));
        assert!(!table.is_common_well_documented("HLA-C*07:01:01"));
    }

    #[test]
    fn unknown_version_falls_back_to_latest() {
        let table = CwdTable::from_reader(Cursor::new(CWD_DATA), "9.99.9").unwrap();
        assert!(table.is_common_well_documented("HLA-C*07:01:01"));
    }

    #[test]
    fn short_header_err() {
        assert!(CwdTable::from_reader(Cursor::new("accession\n"), LATEST_HLADB).is_err());
    }
}
