use crate::gl::glstring::FIELD_SEPARATOR;
use crate::linkage::disequilibrium::LinkageHitDegree;
use crate::linkage::locus::Locus;
use crate::reference::ars::ArsTable;

/// Field depth of a protein-level (two-field) allele designation.
pub const PROTEIN_LEVEL: usize = 2;

/// Variant-expression suffixes recognized on an allele's final field.
const VARIANT_LETTERS: [char; 4] = ['S', 'N', 'L', 'Q'];

/// Compares an observed allele against a reference value after truncating
/// both to the shorter field count. A hit records the truncation depth and
/// the observed allele's full field count; ties between candidate alleles
/// are broken by the caller taking the first hit.
pub fn field_level_comparison(allele: &str, reference_allele: &str) -> Option<LinkageHitDegree> {
    let allele_parts: Vec<&str> = allele.split(FIELD_SEPARATOR).collect();
    let reference_parts: Vec<&str> = reference_allele.split(FIELD_SEPARATOR).collect();
    let depth = allele_parts.len().min(reference_parts.len());

    let truncated_allele = allele_parts[..depth].join(":");
    let truncated_reference = reference_parts[..depth].join(":");

    if truncated_allele != truncated_reference {
        return None;
    }

    Some(LinkageHitDegree::new(
        depth,
        allele_parts.len(),
        allele,
        truncated_allele,
    ))
}

/// Reduces an allele to its two-field protein-level form, preserving a
/// trailing variant-expression letter carried by a deeper designation
/// (`HLA-B*44:02:01:02S` becomes `HLA-B*44:02S`). Alleles with fewer than
/// two fields are malformed and convert to `None`.
pub fn convert_to_protein_level(allele: &str) -> Option<String> {
    let parts: Vec<&str> = allele.split(FIELD_SEPARATOR).collect();
    if parts.len() < PROTEIN_LEVEL {
        log::warn!("Unexpected allele: {}", allele);
        return None;
    }

    let variant = allele
        .chars()
        .last()
        .filter(|c| VARIANT_LETTERS.contains(c));

    match variant {
        Some(letter) if parts.len() > PROTEIN_LEVEL => {
            Some(format!("{}:{}{}", parts[0], parts[1], letter))
        }
        _ => Some(format!("{}:{}", parts[0], parts[1])),
    }
}

/// Tests whether an observed allele falls into the antigen-recognition-site
/// equivalence group keyed by `reference_allele`. Only loci with published
/// ARS groupings can hit; everything else fails the check.
pub fn check_antigen_recognition_site(
    allele: &str,
    reference_allele: &str,
    ars: &ArsTable,
) -> Option<LinkageHitDegree> {
    let converted = convert_to_protein_level(allele)?;
    let locus = Locus::from_allele(allele)?;
    let groups = ars.groups(locus)?;

    let members = groups.get(reference_allele)?;
    if !members.contains(&converted) {
        return None;
    }

    let full_depth = allele.split(FIELD_SEPARATOR).count();
    Some(LinkageHitDegree::new(
        PROTEIN_LEVEL,
        full_depth,
        allele,
        reference_allele,
    ))
}
