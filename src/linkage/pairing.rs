use crate::gl::genotype::GenotypeList;
use crate::linkage::detector::LinkedHaplotype;
use crate::linkage::locus::{format_loci, Locus};
use std::collections::BTreeSet;

/// An unordered pair of linked haplotypes standing for the two homologous
/// chromosomes of a genotype. Canonical ordering at construction makes
/// equality symmetric: `new(a, b) == new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HaplotypePair {
    first: LinkedHaplotype,
    second: LinkedHaplotype,
}

impl HaplotypePair {
    pub fn new(a: LinkedHaplotype, b: LinkedHaplotype) -> Self {
        if b < a {
            Self { first: b, second: a }
        } else {
            Self { first: a, second: b }
        }
    }

    pub fn first(&self) -> &LinkedHaplotype {
        &self.first
    }

    pub fn second(&self) -> &LinkedHaplotype {
        &self.second
    }
}

/// Assembles the linked haplotype pairs of a genotype.
///
/// A pair is accepted only when at every locus the genotype is homozygous or
/// the two haplotypes were drawn from different chromosome copies; the locus
/// scan short-circuits on the first violation. When the linked set exceeds
/// `threshold`, pairing is skipped outright with a warning to bound the
/// quadratic scan on pathologically ambiguous inputs.
pub fn assemble_pairs<G: GenotypeList + ?Sized>(
    linked_haplotypes: &[LinkedHaplotype],
    genotype: &G,
    loci: &[Locus],
    threshold: usize,
) -> BTreeSet<HaplotypePair> {
    let mut pairs = BTreeSet::new();

    if linked_haplotypes.len() > threshold {
        log::warn!(
            "Linked {} haplotype count {} exceeds configured threshold {}. Not pairing haplotypes.",
            format_loci(loci),
            linked_haplotypes.len(),
            threshold
        );
        return pairs;
    }

    for haplotype1 in linked_haplotypes {
        for haplotype2 in linked_haplotypes {
            if is_linked_pair(haplotype1, haplotype2, genotype, loci) {
                pairs.insert(HaplotypePair::new(haplotype1.clone(), haplotype2.clone()));
            }
        }
    }

    pairs
}

fn is_linked_pair<G: GenotypeList + ?Sized>(
    haplotype1: &LinkedHaplotype,
    haplotype2: &LinkedHaplotype,
    genotype: &G,
    loci: &[Locus],
) -> bool {
    for &locus in loci {
        if !genotype.is_homozygous(locus)
            && haplotype1.haplotype.instance(locus) == haplotype2.haplotype.instance(locus)
        {
            return false;
        }
    }
    true
}
