//! Linkage disequilibrium validation for HLA GL String genotypes.
//!
//! Detects known linked-allele combinations within a subject's multi-locus
//! genotype, assembles the haplotype pairs they imply on the two homologous
//! chromosomes, and flags alleles missing from the common and
//! well-documented reference list.

pub mod cli;
pub mod commands;
pub mod gl;
pub mod linkage;
pub mod reference;
pub mod report;
pub mod utils;
