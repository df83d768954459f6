use crate::gl::genotype::GenotypeList;
use crate::gl::glstring::{DASH, NNNN};
use crate::gl::haplotype::MultiLocusHaplotype;
use crate::linkage::allele::{
    check_antigen_recognition_site, field_level_comparison, PROTEIN_LEVEL,
};
use crate::linkage::disequilibrium::{
    DetectedDisequilibriumElement, DisequilibriumElement, LinkageHitDegree,
};
use crate::linkage::findings::DetectedLinkageFindings;
use crate::linkage::locus::{format_loci, Linkages, Locus};
use crate::linkage::pairing::assemble_pairs;
use crate::reference::ars::ArsTable;
use crate::reference::cwd::CwdTable;
use crate::reference::frequencies::FrequencyTable;

/// Upper bound on the linked haplotype count before pairing is skipped.
pub const DEFAULT_HAPLOTYPE_THRESHOLD: usize = 360;

/// A candidate haplotype annotated with the reference record it matched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkedHaplotype {
    pub haplotype: MultiLocusHaplotype,
    pub element: DetectedDisequilibriumElement,
}

/// Per-run detection settings, fixed at detector construction.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub linkages: Vec<Linkages>,
    pub haplotype_threshold: usize,
    pub hladb_version: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            linkages: Linkages::default_set(),
            haplotype_threshold: DEFAULT_HAPLOTYPE_THRESHOLD,
            hladb_version: "latest".to_string(),
        }
    }
}

/// Matches one reference record against one candidate haplotype.
///
/// Every locus the haplotype carries must be satisfied by the first
/// applicable rule: the DRB345 locus-absence special case, an exact
/// truncated-field comparison, or antigen-recognition-site equivalence.
/// The first locus with no hit rejects the haplotype outright; partial
/// matches are never surfaced.
pub fn detect_linkages<G: GenotypeList + ?Sized>(
    genotype: &G,
    element: &DisequilibriumElement,
    haplotype: &MultiLocusHaplotype,
    ars: &ArsTable,
) -> Option<LinkedHaplotype> {
    let mut found = DetectedDisequilibriumElement::new(element.clone());

    for locus in haplotype.loci() {
        let hit = match_locus(genotype, element, haplotype, locus, ars)?;
        found.set_hit_degree(locus, hit);
    }

    Some(LinkedHaplotype {
        haplotype: haplotype.clone(),
        element: found,
    })
}

fn match_locus<G: GenotypeList + ?Sized>(
    genotype: &G,
    element: &DisequilibriumElement,
    haplotype: &MultiLocusHaplotype,
    locus: Locus,
    ars: &ArsTable,
) -> Option<LinkageHitDegree> {
    let reference_allele = element.allele(locus)?;

    for allele in haplotype.alleles(locus) {
        if locus == Locus::Drb345
            && genotype.is_homozygous(Locus::Drb345)
            && (reference_allele == DASH || reference_allele == NNNN)
        {
            // locus absent on both chromosomes and the record expects none
            return Some(LinkageHitDegree::new(
                PROTEIN_LEVEL,
                PROTEIN_LEVEL,
                NNNN,
                NNNN,
            ));
        }

        if let Some(hit) = field_level_comparison(allele, reference_allele) {
            return Some(hit);
        }

        if let Some(hit) = check_antigen_recognition_site(allele, reference_allele, ars) {
            return Some(hit);
        }
    }

    None
}

/// Runs every reference record for a locus group against every candidate
/// haplotype. A haplotype appears once per record it matches; duplicates
/// across records are kept, the set-based pairing downstream collapses
/// identical values.
pub fn find_linked_haplotypes<G: GenotypeList + ?Sized>(
    elements: &[DisequilibriumElement],
    genotype: &G,
    loci: &[Locus],
    ars: &ArsTable,
) -> Vec<LinkedHaplotype> {
    let possible_haplotypes = genotype.possible_haplotypes(loci);

    let mut linked = Vec::new();
    for element in elements {
        for haplotype in &possible_haplotypes {
            if let Some(linked_haplotype) = detect_linkages(genotype, element, haplotype, ars) {
                linked.push(linked_haplotype);
            }
        }
    }

    linked
}

/// Evaluates genotypes against constructed-once reference tables.
pub struct LinkageDetector {
    frequencies: FrequencyTable,
    ars: ArsTable,
    cwd: CwdTable,
    config: DetectionConfig,
}

impl LinkageDetector {
    pub fn new(
        frequencies: FrequencyTable,
        ars: ArsTable,
        cwd: CwdTable,
        config: DetectionConfig,
    ) -> Self {
        Self {
            frequencies,
            ars,
            cwd,
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detects linkage disequilibrium across every configured locus group and
    /// flags alleles missing from the common/well-documented list. Always
    /// produces findings: an unconfigured or unmatched run yields empty sets.
    pub fn evaluate<G: GenotypeList + ?Sized>(&self, genotype: &G) -> DetectedLinkageFindings {
        let mut findings = DetectedLinkageFindings::new(&self.config.hladb_version);

        for &linkage in &self.config.linkages {
            findings.add_finding_sought(linkage);

            let loci = linkage.loci();
            let elements = self.frequencies.elements(linkage);
            let linked = find_linked_haplotypes(elements, genotype, loci, &self.ars);
            log::info!("{} linked {} haplotypes", linked.len(), format_loci(loci));

            let pairs = assemble_pairs(&linked, genotype, loci, self.config.haplotype_threshold);
            findings.add_linked_pairs(pairs);
        }

        log::info!("{} linked pairs", findings.linked_pairs().len());

        findings.set_non_cwd_alleles(
            genotype
                .alleles()
                .into_iter()
                .filter(|allele| !self.cwd.is_common_well_documented(allele)),
        );

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::GlGenotype;
    use std::collections::BTreeMap;

    const BC_HET: &str = "HLA-B*07:02:01+HLA-B*08:01:01^HLA-C*07:01:01+HLA-C*07:02:01";

    fn element(pairs: &[(Locus, &str)], freq: &[&str]) -> DisequilibriumElement {
        let alleles: BTreeMap<Locus, String> = pairs
            .iter()
            .map(|(locus, allele)| (*locus, allele.to_string()))
            .collect();
        DisequilibriumElement::new(alleles, freq.iter().map(|s| s.to_string()).collect())
    }

    fn bc_haplotypes(genotype: &GlGenotype) -> Vec<MultiLocusHaplotype> {
        genotype.possible_haplotypes(&[Locus::B, Locus::C])
    }

    #[test]
    fn full_coverage_match_annotates_every_locus() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let reference = element(
            &[(Locus::B, "HLA-B*07:02"), (Locus::C, "HLA-C*07:01")],
            &["0.0610"],
        );
        let ars = ArsTable::default();

        let linked: Vec<LinkedHaplotype> = bc_haplotypes(&genotype)
            .iter()
            .filter_map(|h| detect_linkages(&genotype, &reference, h, &ars))
            .collect();

        assert_eq!(linked.len(), 1);
        let detected = &linked[0].element;
        let haplotype_loci: Vec<Locus> = linked[0].haplotype.loci().collect();
        assert_eq!(detected.loci().collect::<Vec<_>>(), haplotype_loci);
        assert_eq!(detected.hit_degree(Locus::B).unwrap().matched_depth(), 2);
        assert_eq!(detected.hit_degree(Locus::C).unwrap().matched_depth(), 2);
    }

    #[test]
    fn one_unmatched_locus_rejects_whole_haplotype() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let reference = element(
            &[(Locus::B, "HLA-B*07:02"), (Locus::C, "HLA-C*15:02")],
            &[],
        );
        let ars = ArsTable::default();

        for haplotype in bc_haplotypes(&genotype) {
            assert!(detect_linkages(&genotype, &reference, &haplotype, &ars).is_none());
        }
    }

    #[test]
    fn ars_equivalence_satisfies_a_locus() {
        let genotype =
            GlGenotype::from_gl_string("subject", "HLA-B*07:61:01+HLA-B*08:01:01").unwrap();
        let reference = element(&[(Locus::B, "HLA-B*07:02")], &[]);
        let mut ars = ArsTable::default();
        ars.add_group("HLA-B*07:02", ["HLA-B*07:61".to_string()]);

        let linked: Vec<LinkedHaplotype> = genotype
            .possible_haplotypes(&[Locus::B])
            .iter()
            .filter_map(|h| detect_linkages(&genotype, &reference, h, &ars))
            .collect();

        assert_eq!(linked.len(), 1);
        let hit = linked[0].element.hit_degree(Locus::B).unwrap();
        assert_eq!(hit.matched_depth(), 2);
        assert_eq!(hit.matched_value(), "HLA-B*07:02");
    }

    #[test]
    fn absent_drb345_forces_hit_against_placeholder_reference() {
        let genotype = GlGenotype::from_gl_string(
            "subject",
            "HLA-DRB1*03:01:01+HLA-DRB1*04:01:01^HLA-DQB1*02:01:01+HLA-DQB1*03:02:01",
        )
        .unwrap();
        let ars = ArsTable::default();

        for placeholder in [DASH, NNNN] {
            let reference = element(
                &[
                    (Locus::Drb1, "HLA-DRB1*03:01"),
                    (Locus::Drb345, placeholder),
                    (Locus::Dqb1, "HLA-DQB1*02:01"),
                ],
                &[],
            );

            let linked: Vec<LinkedHaplotype> = genotype
                .possible_haplotypes(&[Locus::Drb1, Locus::Drb345, Locus::Dqb1])
                .iter()
                .filter_map(|h| detect_linkages(&genotype, &reference, h, &ars))
                .collect();

            assert_eq!(linked.len(), 1);
            let hit = linked[0].element.hit_degree(Locus::Drb345).unwrap();
            assert_eq!(hit.allele(), NNNN);
            assert_eq!(hit.matched_value(), NNNN);
            assert_eq!(hit.matched_depth(), hit.full_depth());
        }
    }

    #[test]
    fn carried_drb345_does_not_force_hit() {
        let genotype = GlGenotype::from_gl_string(
            "subject",
            "HLA-DRB1*03:01:01+HLA-DRB1*04:01:01^HLA-DRB3*01:01:02^HLA-DRB4*01:03:01\
             ^HLA-DQB1*02:01:01+HLA-DQB1*03:02:01",
        )
        .unwrap();
        let reference = element(
            &[
                (Locus::Drb1, "HLA-DRB1*03:01"),
                (Locus::Drb345, DASH),
                (Locus::Dqb1, "HLA-DQB1*02:01"),
            ],
            &[],
        );
        let ars = ArsTable::default();

        let linked: Vec<LinkedHaplotype> = genotype
            .possible_haplotypes(&[Locus::Drb1, Locus::Drb345, Locus::Dqb1])
            .iter()
            .filter_map(|h| detect_linkages(&genotype, &reference, h, &ars))
            .collect();

        assert!(linked.is_empty());
    }

    #[test]
    fn duplicate_reference_records_keep_duplicate_haplotypes() {
        let genotype = GlGenotype::from_gl_string("subject", BC_HET).unwrap();
        let elements = vec![
            element(
                &[(Locus::B, "HLA-B*07:02"), (Locus::C, "HLA-C*07:01")],
                &["0.0610"],
            ),
            element(
                &[(Locus::B, "HLA-B*07:02"), (Locus::C, "HLA-C*07:01")],
                &["0.0042"],
            ),
        ];
        let ars = ArsTable::default();

        let linked = find_linked_haplotypes(&elements, &genotype, &[Locus::B, Locus::C], &ars);
        assert_eq!(linked.len(), 2);
        assert_eq!(linked[0], linked[1]);
    }
}
