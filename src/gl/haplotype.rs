use crate::linkage::locus::Locus;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identity of a parental chromosome copy within one genotype.
///
/// Locus assignments drawn from the same copy of the same genotype carry
/// equal instances; the pair assembler uses this to reject pairings that
/// would place both haplotypes on the same chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HaplotypeInstance(pub u8);

/// One locus of a candidate haplotype: the (possibly ambiguous) allele list
/// and the chromosome copy it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocusHaplotype {
    pub alleles: Vec<String>,
    pub instance: HaplotypeInstance,
}

/// A candidate allele assignment across the loci of a linkage group, drawn
/// one chromosome copy per locus. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MultiLocusHaplotype {
    assignments: BTreeMap<Locus, LocusHaplotype>,
}

impl MultiLocusHaplotype {
    pub fn new(assignments: BTreeMap<Locus, LocusHaplotype>) -> Self {
        Self { assignments }
    }

    pub fn loci(&self) -> impl Iterator<Item = Locus> + '_ {
        self.assignments.keys().copied()
    }

    pub fn alleles(&self, locus: Locus) -> &[String] {
        self.assignments
            .get(&locus)
            .map(|assignment| assignment.alleles.as_slice())
            .unwrap_or_default()
    }

    pub fn instance(&self, locus: Locus) -> Option<HaplotypeInstance> {
        self.assignments
            .get(&locus)
            .map(|assignment| assignment.instance)
    }
}

impl fmt::Display for MultiLocusHaplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for assignment in self.assignments.values() {
            if !first {
                f.write_str("~")?;
            }
            f.write_str(&assignment.alleles.join("/"))?;
            first = false;
        }
        Ok(())
    }
}
