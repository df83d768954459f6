use crate::linkage::locus::Linkages;
use crate::linkage::pairing::HaplotypePair;
use std::collections::BTreeSet;

/// The outcome of one genotype evaluation: which linkage groups were sought,
/// the linked haplotype pairs found, the alleles missing from the
/// common/well-documented list, and the reference database version the run
/// was tied to. Populated incrementally, returned read-only.
#[derive(Debug, Clone)]
pub struct DetectedLinkageFindings {
    sought_linkages: Vec<Linkages>,
    linked_pairs: BTreeSet<HaplotypePair>,
    non_cwd_alleles: BTreeSet<String>,
    hladb_version: String,
}

impl DetectedLinkageFindings {
    pub fn new(hladb_version: impl Into<String>) -> Self {
        Self {
            sought_linkages: Vec::new(),
            linked_pairs: BTreeSet::new(),
            non_cwd_alleles: BTreeSet::new(),
            hladb_version: hladb_version.into(),
        }
    }

    pub fn add_finding_sought(&mut self, linkage: Linkages) {
        self.sought_linkages.push(linkage);
    }

    pub fn add_linked_pairs(&mut self, pairs: impl IntoIterator<Item = HaplotypePair>) {
        self.linked_pairs.extend(pairs);
    }

    pub fn set_non_cwd_alleles(&mut self, alleles: impl IntoIterator<Item = String>) {
        self.non_cwd_alleles = alleles.into_iter().collect();
    }

    pub fn sought_linkages(&self) -> &[Linkages] {
        &self.sought_linkages
    }

    pub fn linked_pairs(&self) -> &BTreeSet<HaplotypePair> {
        &self.linked_pairs
    }

    pub fn non_cwd_alleles(&self) -> &BTreeSet<String> {
        &self.non_cwd_alleles
    }

    pub fn hladb_version(&self) -> &str {
        &self.hladb_version
    }

    pub fn has_linked_pairs(&self) -> bool {
        !self.linked_pairs.is_empty()
    }
}
