use crate::utils::{open_text_reader, Result};
use std::io::BufRead;
use std::path::Path;

/// Gene qualifier prefixing every allele in a fully qualified GL String.
pub const HLA_PREFIX: &str = "HLA-";

/// Placeholder allele inserted at the combined DRB345 slot when a genotype
/// carries none of the DRB3, DRB4, and DRB5 genes.
pub const NNNN: &str = "HLA-DRBX*NNNN";

/// Reference-table marker for an absent DRB345 locus.
pub const DASH: &str = "-";

/// GL String delimiters: gene (`^`), genotype ambiguity (`|`), chromosome
/// copy (`+`), phase (`~`), and allele ambiguity (`/`).
pub const GL_DELIMITERS: [char; 5] = ['^', '|', '+', '~', '/'];

pub const FIELD_SEPARATOR: char = ':';

const FILE_DELIMITERS: [char; 2] = ['\t', ','];

/// Every allele token of a GL String, in order of appearance.
pub fn parse_alleles(gl_string: &str) -> Vec<String> {
    gl_string
        .split(GL_DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

/// Checks that every allele of a GL String is qualified with the `HLA-`
/// prefix and carries at least two colon-separated fields.
pub fn validate_format(gl_string: &str) -> Result<()> {
    for token in gl_string.split(GL_DELIMITERS).filter(|t| !t.is_empty()) {
        if !token.starts_with(HLA_PREFIX) {
            return Err(format!(
                "Locus not qualified with {} for segment '{}' in GL String: {}",
                HLA_PREFIX, token, gl_string
            ));
        }
        if token.split(FIELD_SEPARATOR).count() < 2 {
            return Err(format!(
                "Unexpected allele '{}' in GL String: {}",
                token, gl_string
            ));
        }
    }
    Ok(())
}

/// Expands a shorthand GL String into its fully qualified form: alleles gain
/// the `HLA-` prefix and bare field segments re-apply the current `gene*`
/// prefix (`HLA-B*07:02:01+08:01:01` becomes
/// `HLA-B*07:02:01+HLA-B*08:01:01`).
pub fn fully_qualify(shorthand: &str) -> Result<String> {
    let mut qualified = String::with_capacity(shorthand.len());
    let mut gene: Option<String> = None;

    for part in tokenize(shorthand) {
        if part.len() == 1 && part.starts_with(GL_DELIMITERS) {
            qualified.push_str(part);
            continue;
        }

        if part.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let segment = if part.starts_with(HLA_PREFIX) {
                part.to_string()
            } else {
                format!("{}{}", HLA_PREFIX, part)
            };
            gene = segment.split('*').next().map(|g| g.to_string());
            qualified.push_str(&segment);
        } else {
            let gene = gene
                .as_deref()
                .ok_or_else(|| format!("No gene qualifies segment '{}' in: {}", part, shorthand))?;
            qualified.push_str(gene);
            qualified.push('*');
            qualified.push_str(part);
        }
    }

    Ok(qualified)
}

/// Splits a GL String into alternating allele segments and single-character
/// delimiters, both preserved.
fn tokenize(gl_string: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut segment_start = 0;
    for (idx, c) in gl_string.char_indices() {
        if GL_DELIMITERS.contains(&c) {
            if segment_start < idx {
                tokens.push(&gl_string[segment_start..idx]);
            }
            tokens.push(&gl_string[idx..idx + c.len_utf8()]);
            segment_start = idx + c.len_utf8();
        }
    }
    if segment_start < gl_string.len() {
        tokens.push(&gl_string[segment_start..]);
    }
    tokens
}

/// Reads a GL String file: each line is either `id<TAB>glstring` (comma also
/// accepted) or a bare GL String, for which an id is synthesized from the
/// file name and line number. Empty and `#`-comment lines are skipped.
pub fn read_gl_string_file(path: &Path) -> Result<Vec<(String, String)>> {
    let reader = open_text_reader(path)?;
    let file_tag = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut gl_strings = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_num + 1, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(FILE_DELIMITERS).collect();
        match parts.as_slice() {
            [gl_string] => {
                gl_strings.push((format!("{}-{}", file_tag, line_num + 1), gl_string.to_string()))
            }
            [id, gl_string] => gl_strings.push((id.to_string(), gl_string.to_string())),
            _ => log::warn!(
                "Unexpected line format at line {} of {}",
                line_num + 1,
                path.display()
            ),
        }
    }

    Ok(gl_strings)
}
