pub mod genotype;
pub mod glstring;
pub mod haplotype;

pub use genotype::{GenotypeList, GlGenotype};
pub use haplotype::{HaplotypeInstance, LocusHaplotype, MultiLocusHaplotype};
