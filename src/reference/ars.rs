use crate::linkage::locus::Locus;
use crate::utils::{open_text_reader, Result};
use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::Path;

/// Loci with published antigen-recognition-site equivalence groupings.
const ARS_LOCI: [Locus; 7] = [
    Locus::B,
    Locus::C,
    Locus::Drb1,
    Locus::Drb3,
    Locus::Drb4,
    Locus::Drb5,
    Locus::Dqb1,
];

/// Antigen-recognition-site equivalence groups, keyed per locus by the group
/// code used in reference frequency data. Loaded once, immutable afterwards.
#[derive(Debug, Default)]
pub struct ArsTable {
    groups: HashMap<Locus, HashMap<String, BTreeSet<String>>>,
}

impl ArsTable {
    /// Loads a table from a file of `group-code<TAB>member...` rows.
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        Self::from_reader(reader)
            .map_err(|e| format!("Failed to load ARS table {}: {}", path.display(), e))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut table = ArsTable::default();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("error reading line {}: {}", line_num + 1, e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut columns = trimmed.split('\t');
            let code = columns
                .next()
                .ok_or_else(|| format!("missing group code at line {}", line_num + 1))?;
            table.add_group(code, columns.map(|member| member.to_string()));
        }

        Ok(table)
    }

    /// Registers an equivalence group under the locus derived from the group
    /// code's gene prefix. Groups for loci without ARS data are dropped.
    pub fn add_group(&mut self, code: &str, members: impl IntoIterator<Item = String>) {
        let Some(locus) = Locus::from_allele(code) else {
            log::debug!("Skipping ARS group with unrecognized gene: {}", code);
            return;
        };
        if !ARS_LOCI.contains(&locus) {
            log::debug!("Skipping ARS group for ineligible locus {}: {}", locus, code);
            return;
        }

        self.groups
            .entry(locus)
            .or_default()
            .entry(code.to_string())
            .or_default()
            .extend(members);
    }

    pub fn groups(&self, locus: Locus) -> Option<&HashMap<String, BTreeSet<String>>> {
        self.groups.get(&locus)
    }

    pub fn group_count(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ARS_DATA: &str = "\
# code\tmembers
HLA-B*07:02\tHLA-B*07:02\tHLA-B*07:61
HLA-C*07:01\tHLA-C*07:01\tHLA-C*07:06
HLA-DRB1*03:01\tHLA-DRB1*03:01
HLA-A*01:01\tHLA-A*01:01
";

    #[test]
    fn load_groups_for_eligible_loci() {
        let table = ArsTable::from_reader(Cursor::new(ARS_DATA)).unwrap();

        let b_groups = table.groups(Locus::B).unwrap();
        assert!(b_groups["HLA-B*07:02"].contains("HLA-B*07:61"));
        assert!(table.groups(Locus::Drb1).is_some());
        assert_eq!(table.group_count(), 3);
    }

    #[test]
    fn ineligible_locus_rows_are_dropped() {
        let table = ArsTable::from_reader(Cursor::new(ARS_DATA)).unwrap();
        assert!(table.groups(Locus::A).is_none());
    }

    #[test]
    fn duplicate_codes_merge_members() {
        let data = "HLA-B*07:02\tHLA-B*07:02\nHLA-B*07:02\tHLA-B*07:61\n";
        let table = ArsTable::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.groups(Locus::B).unwrap()["HLA-B*07:02"].len(), 2);
    }
}
