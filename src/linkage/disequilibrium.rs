use crate::linkage::locus::Locus;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Match quality for a single locus: the field depth at which an observed
/// allele matched a reference value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkageHitDegree {
    matched_depth: usize,
    full_depth: usize,
    allele: String,
    matched_value: String,
}

impl LinkageHitDegree {
    pub fn new(
        matched_depth: usize,
        full_depth: usize,
        allele: impl Into<String>,
        matched_value: impl Into<String>,
    ) -> Self {
        Self {
            matched_depth,
            full_depth,
            allele: allele.into(),
            matched_value: matched_value.into(),
        }
    }

    pub fn matched_depth(&self) -> usize {
        self.matched_depth
    }

    pub fn full_depth(&self) -> usize {
        self.full_depth
    }

    pub fn allele(&self) -> &str {
        &self.allele
    }

    pub fn matched_value(&self) -> &str {
        &self.matched_value
    }
}

impl fmt::Display for LinkageHitDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} fields, matched {}",
            self.matched_depth, self.full_depth, self.matched_value
        )
    }
}

/// A reference linkage record: one allele per locus of a linkage group plus
/// frequency metadata carried through to reports without interpretation.
///
/// Equality, ordering, and hashing consider only the locus-to-allele content;
/// two records that differ solely in frequency columns compare equal.
#[derive(Debug, Clone)]
pub struct DisequilibriumElement {
    alleles: BTreeMap<Locus, String>,
    frequency_info: Vec<String>,
}

impl DisequilibriumElement {
    pub fn new(alleles: BTreeMap<Locus, String>, frequency_info: Vec<String>) -> Self {
        Self {
            alleles,
            frequency_info,
        }
    }

    pub fn allele(&self, locus: Locus) -> Option<&str> {
        self.alleles.get(&locus).map(String::as_str)
    }

    pub fn loci(&self) -> impl Iterator<Item = Locus> + '_ {
        self.alleles.keys().copied()
    }

    pub fn frequency_info(&self) -> &[String] {
        &self.frequency_info
    }
}

impl PartialEq for DisequilibriumElement {
    fn eq(&self, other: &Self) -> bool {
        self.alleles == other.alleles
    }
}

impl Eq for DisequilibriumElement {}

impl PartialOrd for DisequilibriumElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DisequilibriumElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.alleles.cmp(&other.alleles)
    }
}

impl Hash for DisequilibriumElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alleles.hash(state);
    }
}

/// A reference record found in a genotype, annotated with the hit degree at
/// every matched locus. Built one locus at a time during detection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DetectedDisequilibriumElement {
    element: DisequilibriumElement,
    hit_degrees: BTreeMap<Locus, LinkageHitDegree>,
}

impl DetectedDisequilibriumElement {
    pub fn new(element: DisequilibriumElement) -> Self {
        Self {
            element,
            hit_degrees: BTreeMap::new(),
        }
    }

    pub fn element(&self) -> &DisequilibriumElement {
        &self.element
    }

    pub fn set_hit_degree(&mut self, locus: Locus, hit_degree: LinkageHitDegree) {
        self.hit_degrees.insert(locus, hit_degree);
    }

    pub fn hit_degree(&self, locus: Locus) -> Option<&LinkageHitDegree> {
        self.hit_degrees.get(&locus)
    }

    pub fn loci(&self) -> impl Iterator<Item = Locus> + '_ {
        self.hit_degrees.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc_element(b: &str, c: &str, freq: &[&str]) -> DisequilibriumElement {
        let mut alleles = BTreeMap::new();
        alleles.insert(Locus::B, b.to_string());
        alleles.insert(Locus::C, c.to_string());
        DisequilibriumElement::new(alleles, freq.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn elements_compare_by_allele_content_only() {
        let first = bc_element("HLA-B*07:02", "HLA-C*07:02", &["0.0610"]);
        let second = bc_element("HLA-B*07:02", "HLA-C*07:02", &["0.0042"]);
        let third = bc_element("HLA-B*08:01", "HLA-C*07:01", &["0.0610"]);

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(first.cmp(&second), Ordering::Equal);
    }

    #[test]
    fn element_allele_lookup() {
        let element = bc_element("HLA-B*07:02", "HLA-C*07:02", &[]);
        assert_eq!(element.allele(Locus::B), Some("HLA-B*07:02"));
        assert_eq!(element.allele(Locus::Drb1), None);
        assert_eq!(element.loci().collect::<Vec<_>>(), vec![Locus::B, Locus::C]);
    }

    #[test]
    fn detected_element_accumulates_hit_degrees() {
        let mut detected = DetectedDisequilibriumElement::new(bc_element(
            "HLA-B*07:02",
            "HLA-C*07:02",
            &["0.0610"],
        ));
        assert_eq!(detected.loci().count(), 0);

        detected.set_hit_degree(
            Locus::B,
            LinkageHitDegree::new(2, 3, "HLA-B*07:02:01", "HLA-B*07:02"),
        );
        assert_eq!(detected.loci().collect::<Vec<_>>(), vec![Locus::B]);
        assert_eq!(detected.hit_degree(Locus::B).unwrap().matched_depth(), 2);
        assert_eq!(detected.hit_degree(Locus::C), None);
    }

    #[test]
    fn hit_degree_display_format() {
        let hit = LinkageHitDegree::new(2, 3, "HLA-B*07:02:01", "HLA-B*07:02");
        assert_eq!(hit.to_string(), "2/3 fields, matched HLA-B*07:02");
    }
}
