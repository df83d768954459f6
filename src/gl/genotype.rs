use crate::gl::glstring::{parse_alleles, NNNN};
use crate::gl::haplotype::{HaplotypeInstance, LocusHaplotype, MultiLocusHaplotype};
use crate::linkage::locus::Locus;
use crate::utils::Result;
use arrayvec::ArrayVec;
use itertools::Itertools;
use std::collections::BTreeMap;

/// The candidate haplotypes a genotype exposes for linkage detection.
///
/// Implemented by [`GlGenotype`]; test code may substitute stubs.
pub trait GenotypeList {
    /// All candidate single-chromosome allele assignments across the carried
    /// subset of `loci`, each locus tagged with the chromosome copy it was
    /// drawn from.
    fn possible_haplotypes(&self, loci: &[Locus]) -> Vec<MultiLocusHaplotype>;

    /// True when the genotype carries at most one distinct allele set at the
    /// locus (including the locus being absent altogether).
    fn is_homozygous(&self, locus: Locus) -> bool;

    /// Every allele token of the genotype, for common/well-documented checks.
    fn alleles(&self) -> Vec<String>;
}

/// Up to two chromosome copies per locus, each a list of ambiguous alleles.
type LocusCopies = ArrayVec<Vec<String>, 2>;

/// A subject's multi-locus genotype parsed from a GL String.
#[derive(Debug, Clone)]
pub struct GlGenotype {
    id: String,
    gl_string: String,
    copies: BTreeMap<Locus, LocusCopies>,
}

impl GlGenotype {
    /// Parses a fully qualified GL String into per-locus chromosome copies.
    ///
    /// Gene segments are separated by `^`, chromosome copies by `+`, and
    /// ambiguous alleles within a copy by `/`. DRB3/4/5 segments fold into
    /// the combined DRB345 slot; a genotype carrying none of them receives
    /// the `HLA-DRBX*NNNN` placeholder copy there (homozygous-absent).
    /// Genotype-ambiguity (`|`) and phase (`~`) operators are not supported.
    pub fn from_gl_string(id: impl Into<String>, gl_string: &str) -> Result<Self> {
        if gl_string.contains(['|', '~']) {
            return Err(format!(
                "Genotype ambiguity (|) and phase (~) operators are not supported: {}",
                gl_string
            ));
        }

        let mut copies: BTreeMap<Locus, LocusCopies> = BTreeMap::new();

        for segment in gl_string.split('^').filter(|s| !s.is_empty()) {
            for copy in segment.split('+') {
                let alleles: Vec<String> = copy
                    .split('/')
                    .filter(|a| !a.is_empty())
                    .map(|a| a.to_string())
                    .collect();

                let Some(first) = alleles.first() else {
                    continue;
                };
                let Some(locus) = Locus::from_allele(first).map(Locus::grouping) else {
                    log::debug!("Skipping segment with unrecognized gene: {}", copy);
                    continue;
                };

                for allele in &alleles {
                    if Locus::from_allele(allele).map(Locus::grouping) != Some(locus) {
                        return Err(format!(
                            "Allele '{}' does not belong to {} in segment '{}'",
                            allele, locus, copy
                        ));
                    }
                }

                copies
                    .entry(locus)
                    .or_default()
                    .try_push(alleles)
                    .map_err(|_| {
                        format!("More than two chromosome copies at {}: {}", locus, gl_string)
                    })?;
            }
        }

        if !copies.contains_key(&Locus::Drb345) {
            let mut placeholder = LocusCopies::new();
            placeholder.push(vec![NNNN.to_string()]);
            copies.insert(Locus::Drb345, placeholder);
        }

        Ok(Self {
            id: id.into(),
            gl_string: gl_string.to_string(),
            copies,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn gl_string(&self) -> &str {
        &self.gl_string
    }
}

impl GenotypeList for GlGenotype {
    fn possible_haplotypes(&self, loci: &[Locus]) -> Vec<MultiLocusHaplotype> {
        let choices_per_locus: Vec<Vec<(Locus, usize)>> = loci
            .iter()
            .filter_map(|&locus| {
                self.copies.get(&locus).map(|copies| {
                    (0..copies.len())
                        .map(|copy_idx| (locus, copy_idx))
                        .collect()
                })
            })
            .collect();

        if choices_per_locus.is_empty() {
            return Vec::new();
        }

        choices_per_locus
            .into_iter()
            .multi_cartesian_product()
            .map(|choices| {
                let assignments = choices
                    .into_iter()
                    .map(|(locus, copy_idx)| {
                        (
                            locus,
                            LocusHaplotype {
                                alleles: self.copies[&locus][copy_idx].clone(),
                                instance: HaplotypeInstance(copy_idx as u8),
                            },
                        )
                    })
                    .collect();
                MultiLocusHaplotype::new(assignments)
            })
            .collect()
    }

    fn is_homozygous(&self, locus: Locus) -> bool {
        match self.copies.get(&locus) {
            None => true,
            Some(copies) => copies
                .iter()
                .map(|alleles| {
                    let mut sorted = alleles.clone();
                    sorted.sort();
                    sorted
                })
                .all_equal(),
        }
    }

    fn alleles(&self) -> Vec<String> {
        parse_alleles(&self.gl_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BC_HET: &str = "HLA-B*07:02:01+HLA-B*08:01:01^HLA-C*07:01:01+HLA-C*07:02:01";

    #[test]
    fn heterozygous_genotype_enumerates_all_phase_combinations() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let haplotypes = genotype.possible_haplotypes(&[Locus::B, Locus::C]);

        assert_eq!(haplotypes.len(), 4);
        for haplotype in &haplotypes {
            assert_eq!(haplotype.loci().collect::<Vec<_>>(), vec![Locus::B, Locus::C]);
        }

        let instances: Vec<(u8, u8)> = haplotypes
            .iter()
            .map(|h| {
                (
                    h.instance(Locus::B).unwrap().0,
                    h.instance(Locus::C).unwrap().0,
                )
            })
            .collect();
        assert_eq!(instances, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn absent_loci_are_skipped_in_enumeration() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let haplotypes = genotype.possible_haplotypes(&[Locus::A, Locus::B, Locus::C]);

        assert_eq!(haplotypes.len(), 4);
        assert!(haplotypes.iter().all(|h| h.alleles(Locus::A).is_empty()));
    }

    #[test]
    fn homozygous_locus_detected() {
        let genotype =
            GlGenotype::from_gl_string("subject", "HLA-B*07:02:01+HLA-B*07:02:01").unwrap();
        assert!(genotype.is_homozygous(Locus::B));

        let het = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        assert!(!het.is_homozygous(Locus::B));
        assert!(!het.is_homozygous(Locus::C));
    }

    #[test]
    fn absent_locus_counts_as_homozygous() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        assert!(genotype.is_homozygous(Locus::A));
    }

    #[test]
    fn missing_drb345_gets_placeholder_copy() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        assert!(genotype.is_homozygous(Locus::Drb345));

        let haplotypes = genotype.possible_haplotypes(&[Locus::Drb345]);
        assert_eq!(haplotypes.len(), 1);
        assert_eq!(haplotypes[0].alleles(Locus::Drb345), [NNNN.to_string()]);
    }

    #[test]
    fn drb3_and_drb4_fold_into_combined_slot() {
        let genotype = GlGenotype::from_gl_string(
            "subject",
            "HLA-DRB3*01:01:02^HLA-DRB4*01:03:01",
        )
        .unwrap();

        let haplotypes = genotype.possible_haplotypes(&[Locus::Drb345]);
        assert_eq!(haplotypes.len(), 2);
        assert!(!genotype.is_homozygous(Locus::Drb345));
    }

    #[test]
    fn ambiguous_alleles_stay_within_one_copy() {
        let genotype = GlGenotype::from_gl_string(
            "subject",
            "HLA-B*07:02:01/HLA-B*07:02:02+HLA-B*08:01:01",
        )
        .unwrap();

        let haplotypes = genotype.possible_haplotypes(&[Locus::B]);
        assert_eq!(haplotypes.len(), 2);
        assert_eq!(haplotypes[0].alleles(Locus::B).len(), 2);
        assert_eq!(haplotypes[1].alleles(Locus::B).len(), 1);
    }

    #[test]
    fn genotype_ambiguity_operator_err() {
        let result = GlGenotype::from_gl_string("subject", "HLA-B*07:02+HLA-B*08:01|HLA-B*44:02");
        assert!(result.unwrap_err().contains("not supported"));
    }

    #[test]
    fn three_copies_at_one_locus_err() {
        let result =
            GlGenotype::from_gl_string("subject", "HLA-B*07:02+HLA-B*08:01+HLA-B*44:02");
        assert!(result.unwrap_err().contains("More than two"));
    }

    #[test]
    fn mixed_locus_ambiguity_err() {
        let result = GlGenotype::from_gl_string("subject", "HLA-B*07:02/HLA-C*07:01");
        assert!(result.is_err());
    }

    #[test]
    fn alleles_lists_every_token() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let alleles = genotype.alleles();
        assert_eq!(alleles.len(), 4);
        assert!(alleles.contains(&"HLA-C*07:02:01".to_string()));
    }
}
