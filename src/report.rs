use crate::gl::GlGenotype;
use crate::linkage::findings::DetectedLinkageFindings;
use crate::linkage::locus::format_loci;
use crate::utils::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes per-subject findings reports as plain text.
pub struct FindingsWriter {
    out: Box<dyn Write>,
}

impl FindingsWriter {
    pub fn to_path(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| format!("Failed to create report file {}: {}", path.display(), e))?;
        Self::new(Box::new(BufWriter::new(file)))
    }

    pub fn to_stdout() -> Result<Self> {
        Self::new(Box::new(io::stdout().lock()))
    }

    fn new(mut out: Box<dyn Write>) -> Result<Self> {
        writeln!(
            out,
            "# {} {} findings - {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )
        .map_err(|e| format!("Failed to write report header: {}", e))?;
        Ok(Self { out })
    }

    pub fn write(
        &mut self,
        genotype: &GlGenotype,
        findings: &DetectedLinkageFindings,
    ) -> Result<()> {
        self.write_inner(genotype, findings)
            .map_err(|e| format!("Failed to write report for {}: {}", genotype.id(), e))
    }

    fn write_inner(
        &mut self,
        genotype: &GlGenotype,
        findings: &DetectedLinkageFindings,
    ) -> io::Result<()> {
        let out = &mut self.out;

        writeln!(out)?;
        writeln!(out, "Subject: {}", genotype.id())?;
        writeln!(out, "GL String: {}", genotype.gl_string())?;

        let sought: Vec<&str> = findings
            .sought_linkages()
            .iter()
            .map(|linkage| linkage.short_name())
            .collect();
        writeln!(
            out,
            "Sought linkages: {}",
            if sought.is_empty() {
                "none".to_string()
            } else {
                sought.join(", ")
            }
        )?;

        for (idx, pair) in findings.linked_pairs().iter().enumerate() {
            writeln!(out, "Linked pair {}:", idx + 1)?;
            for (slot, linked) in [pair.first(), pair.second()].iter().enumerate() {
                writeln!(out, "  Haplotype {}: {}", slot + 1, linked.haplotype)?;
                for locus in linked.element.loci() {
                    let reference = linked.element.element().allele(locus).unwrap_or("-");
                    match linked.element.hit_degree(locus) {
                        Some(hit) => {
                            writeln!(out, "    {} locus: {} ({})", locus, reference, hit)?
                        }
                        None => writeln!(out, "    {} locus: {}", locus, reference)?,
                    }
                }
                let frequency_info = linked.element.element().frequency_info();
                if !frequency_info.is_empty() {
                    writeln!(out, "    Frequency: {}", frequency_info.join(" "))?;
                }
            }
        }
        if !findings.has_linked_pairs() {
            let sought_loci: Vec<String> = findings
                .sought_linkages()
                .iter()
                .map(|linkage| format_loci(linkage.loci()))
                .collect();
            if sought_loci.is_empty() {
                writeln!(out, "No linked pairs found")?;
            } else {
                writeln!(out, "No linked pairs found ({})", sought_loci.join("; "))?;
            }
        }

        if findings.non_cwd_alleles().is_empty() {
            writeln!(out, "Non-CWD alleles: none")?;
        } else {
            writeln!(
                out,
                "Non-CWD alleles: {}",
                findings
                    .non_cwd_alleles()
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
        }
        writeln!(out, "HLA database: {}", findings.hladb_version())?;

        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.out
            .flush()
            .map_err(|e| format!("Failed to flush report: {}", e))
    }
}
