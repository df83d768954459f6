pub mod allele;
pub mod detector;
pub mod disequilibrium;
pub mod findings;
pub mod locus;
pub mod pairing;

pub use detector::{
    DetectionConfig, LinkageDetector, LinkedHaplotype, DEFAULT_HAPLOTYPE_THRESHOLD,
};
pub use disequilibrium::{DetectedDisequilibriumElement, DisequilibriumElement, LinkageHitDegree};
pub use findings::DetectedLinkageFindings;
pub use locus::{Linkages, Locus};
pub use pairing::HaplotypePair;
