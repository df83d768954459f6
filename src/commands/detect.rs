use crate::cli::DetectArgs;
use crate::gl::glstring::{fully_qualify, read_gl_string_file, validate_format};
use crate::gl::GlGenotype;
use crate::linkage::findings::DetectedLinkageFindings;
use crate::linkage::locus::Linkages;
use crate::linkage::{DetectionConfig, LinkageDetector};
use crate::reference::{ArsTable, CwdTable, FrequencyTable};
use crate::report::FindingsWriter;
use crate::utils::Result;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;

pub fn detect(args: DetectArgs) -> Result<()> {
    let linkages = match &args.linkages {
        Some(short_names) => Linkages::lookup(short_names),
        None => Linkages::default_set(),
    };

    let frequencies = FrequencyTable::from_dir(&args.frequencies_dir, &linkages)?;
    let ars = ArsTable::from_path(&args.ars_path)?;
    log::info!("Loaded {} antigen recognition site groups", ars.group_count());
    let cwd = CwdTable::from_path(&args.cwd_path, &args.hladb_version)?;
    log::info!("Loaded {} common/well-documented alleles", cwd.len());

    let detector = LinkageDetector::new(
        frequencies,
        ars,
        cwd,
        DetectionConfig {
            linkages,
            haplotype_threshold: args.haplotype_threshold,
            hladb_version: args.hladb_version.clone(),
        },
    );

    let gl_strings = read_gl_string_file(&args.gl_strings_path)?;
    log::info!(
        "Read {} GL Strings from {}",
        gl_strings.len(),
        args.gl_strings_path.display()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .thread_name(|i| format!("ldval-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))?;

    // reference tables are immutable after load; subjects evaluate independently
    let results: Vec<(GlGenotype, DetectedLinkageFindings)> = pool.install(|| {
        gl_strings
            .par_iter()
            .filter_map(|(id, gl_string)| match prepare_genotype(id, gl_string) {
                Ok(genotype) => {
                    let findings = detector.evaluate(&genotype);
                    Some((genotype, findings))
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", id, e);
                    None
                }
            })
            .collect()
    });

    let mut writer = match &args.output_path {
        Some(path) => FindingsWriter::to_path(path)?,
        None => FindingsWriter::to_stdout()?,
    };
    for (genotype, findings) in &results {
        writer.write(genotype, findings)?;
    }
    writer.finish()?;

    log::info!(
        "Evaluated {} of {} genotypes",
        results.len(),
        gl_strings.len()
    );

    Ok(())
}

fn prepare_genotype(id: &str, gl_string: &str) -> Result<GlGenotype> {
    let qualified = fully_qualify(gl_string)?;
    validate_format(&qualified)?;
    GlGenotype::from_gl_string(id, &qualified)
}
