use crate::linkage::disequilibrium::DisequilibriumElement;
use crate::linkage::locus::{Linkages, Locus};
use crate::utils::{open_text_reader, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

/// Reference disequilibrium records per linkage group.
///
/// Each group is backed by one TSV file named after the group's short name
/// (`bc.tsv`, `drb_dqb.tsv`, ...); columns whose header resolves to a locus
/// hold that locus' allele, all other columns are opaque frequency metadata
/// carried through to reports.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    elements: HashMap<Linkages, Vec<DisequilibriumElement>>,
}

impl FrequencyTable {
    /// Loads the tables for the requested linkage groups from a directory.
    /// A group without a file degrades to an empty record list.
    pub fn from_dir(dir: &Path, linkages: &[Linkages]) -> Result<Self> {
        let mut table = FrequencyTable::default();

        for &linkage in linkages {
            let mut path = dir.join(format!("{}.tsv", linkage.short_name()));
            if !path.exists() {
                let gz = dir.join(format!("{}.tsv.gz", linkage.short_name()));
                if gz.exists() {
                    path = gz;
                } else {
                    log::warn!(
                        "No frequency data for linkage '{}' in {}; group will not match",
                        linkage,
                        dir.display()
                    );
                    table.elements.insert(linkage, Vec::new());
                    continue;
                }
            }

            let reader = open_text_reader(&path)?;
            let elements = Self::parse(reader)
                .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;
            log::info!(
                "Loaded {} disequilibrium records for linkage '{}'",
                elements.len(),
                linkage
            );
            table.elements.insert(linkage, elements);
        }

        Ok(table)
    }

    pub fn parse(reader: impl BufRead) -> Result<Vec<DisequilibriumElement>> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                None => return Ok(Vec::new()),
                Some((line_num, line)) => {
                    let line =
                        line.map_err(|e| format!("error reading line {}: {}", line_num + 1, e))?;
                    let trimmed = line.trim().to_string();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        break trimmed;
                    }
                }
            }
        };

        // header columns resolving to a locus carry alleles, the rest are
        // opaque frequency metadata
        let columns: Vec<Option<Locus>> = header
            .split('\t')
            .map(|name| Locus::lookup(name.trim()))
            .collect();
        if columns.iter().all(Option::is_none) {
            return Err(format!("no locus columns in header: {}", header));
        }

        let mut elements = Vec::new();
        for (line_num, line) in lines {
            let line = line.map_err(|e| format!("error reading line {}: {}", line_num + 1, e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let values: Vec<&str> = trimmed.split('\t').collect();
            if values.len() != columns.len() {
                log::warn!(
                    "Skipping record at line {}: expected {} columns, found {}",
                    line_num + 1,
                    columns.len(),
                    values.len()
                );
                continue;
            }

            let mut alleles = BTreeMap::new();
            let mut frequency_info = Vec::new();
            for (column, value) in columns.iter().zip(values) {
                match column {
                    Some(locus) => {
                        alleles.insert(*locus, value.to_string());
                    }
                    None => frequency_info.push(value.to_string()),
                }
            }

            elements.push(DisequilibriumElement::new(alleles, frequency_info));
        }

        Ok(elements)
    }

    /// Registers the records of one linkage group, replacing any loaded set.
    pub fn insert(&mut self, linkage: Linkages, elements: Vec<DisequilibriumElement>) {
        self.elements.insert(linkage, elements);
    }

    pub fn elements(&self, linkage: Linkages) -> &[DisequilibriumElement] {
        self.elements
            .get(&linkage)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const BC_DATA: &str = "\
HLA-B\tHLA-C\tfrequency\tpopulation
HLA-B*07:02\tHLA-C*07:02\t0.0610\tEUR
HLA-B*08:01\tHLA-C*07:01\t0.0523\tEUR
";

    #[test]
    fn parse_records_with_frequency_columns() {
        let elements = FrequencyTable::parse(Cursor::new(BC_DATA)).unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].allele(Locus::B), Some("HLA-B*07:02"));
        assert_eq!(elements[0].allele(Locus::C), Some("HLA-C*07:02"));
        assert_eq!(elements[0].frequency_info(), ["0.0610", "EUR"]);
    }

    #[test]
    fn parse_skips_malformed_records() {
        let data = "HLA-B\tHLA-C\nHLA-B*07:02\n";
        let elements = FrequencyTable::parse(Cursor::new(data)).unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn parse_without_locus_columns_err() {
        let data = "frequency\tpopulation\n0.0610\tEUR\n";
        assert!(FrequencyTable::parse(Cursor::new(data)).is_err());
    }

    #[test]
    fn parse_empty_input_ok() {
        let elements = FrequencyTable::parse(Cursor::new("")).unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn missing_group_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bc.tsv"), BC_DATA).unwrap();

        let table =
            FrequencyTable::from_dir(dir.path(), &[Linkages::Bc, Linkages::DrbDqb]).unwrap();

        assert_eq!(table.elements(Linkages::Bc).len(), 2);
        assert!(table.elements(Linkages::DrbDqb).is_empty());
        assert!(table.elements(Linkages::FiveLocus).is_empty());
    }
}
