use std::fmt;

/// HLA loci recognized by the detector.
///
/// `Drb345` is the combined slot holding alleles from any of the DRB3, DRB4,
/// and DRB5 genes, which occupy the same chromosomal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Locus {
    A,
    B,
    C,
    Drb1,
    Drb3,
    Drb4,
    Drb5,
    Drb345,
    Dqb1,
}

impl Locus {
    pub fn name(&self) -> &'static str {
        match self {
            Locus::A => "HLA-A",
            Locus::B => "HLA-B",
            Locus::C => "HLA-C",
            Locus::Drb1 => "HLA-DRB1",
            Locus::Drb3 => "HLA-DRB3",
            Locus::Drb4 => "HLA-DRB4",
            Locus::Drb5 => "HLA-DRB5",
            Locus::Drb345 => "HLA-DRB345",
            Locus::Dqb1 => "HLA-DQB1",
        }
    }

    /// Resolves a locus from its qualified (`HLA-B`) or bare (`B`) name.
    /// The `HLA-DRBX` placeholder gene resolves to the combined DRB345 slot.
    pub fn lookup(name: &str) -> Option<Locus> {
        let bare = name.strip_prefix("HLA-").unwrap_or(name);
        match bare {
            "A" => Some(Locus::A),
            "B" => Some(Locus::B),
            "C" => Some(Locus::C),
            "DRB1" => Some(Locus::Drb1),
            "DRB3" => Some(Locus::Drb3),
            "DRB4" => Some(Locus::Drb4),
            "DRB5" => Some(Locus::Drb5),
            "DRB345" | "DRBX" => Some(Locus::Drb345),
            "DQB1" => Some(Locus::Dqb1),
            _ => None,
        }
    }

    /// Resolves the locus of an allele from its gene prefix (`HLA-B*07:02`).
    pub fn from_allele(allele: &str) -> Option<Locus> {
        let gene = allele.split('*').next()?;
        Locus::lookup(gene)
    }

    /// The slot a locus occupies in a multi-locus haplotype: DRB3/4/5 fold
    /// into the combined DRB345 slot, all other loci map to themselves.
    pub fn grouping(self) -> Locus {
        match self {
            Locus::Drb3 | Locus::Drb4 | Locus::Drb5 => Locus::Drb345,
            locus => locus,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ABC_LOCI: [Locus; 3] = [Locus::A, Locus::B, Locus::C];
const BC_LOCI: [Locus; 2] = [Locus::B, Locus::C];
const DRB_DQB_LOCI: [Locus; 3] = [Locus::Drb1, Locus::Drb345, Locus::Dqb1];
const FIVE_LOCUS_LOCI: [Locus; 5] = [Locus::A, Locus::B, Locus::C, Locus::Drb1, Locus::Dqb1];

/// Locus groups with established linkage disequilibrium associations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Linkages {
    Abc,
    Bc,
    DrbDqb,
    FiveLocus,
}

impl Linkages {
    pub const ALL: [Linkages; 4] = [
        Linkages::Abc,
        Linkages::Bc,
        Linkages::DrbDqb,
        Linkages::FiveLocus,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Linkages::Abc => "abc",
            Linkages::Bc => "bc",
            Linkages::DrbDqb => "drb_dqb",
            Linkages::FiveLocus => "five_loc",
        }
    }

    pub fn loci(&self) -> &'static [Locus] {
        match self {
            Linkages::Abc => &ABC_LOCI,
            Linkages::Bc => &BC_LOCI,
            Linkages::DrbDqb => &DRB_DQB_LOCI,
            Linkages::FiveLocus => &FIVE_LOCUS_LOCI,
        }
    }

    pub fn default_set() -> Vec<Linkages> {
        vec![Linkages::Bc, Linkages::DrbDqb]
    }

    /// Resolves linkage groups from their short names. Falls back to the
    /// default set when none of the names are recognized.
    pub fn lookup(short_names: &[String]) -> Vec<Linkages> {
        let selected: Vec<Linkages> = Linkages::ALL
            .iter()
            .copied()
            .filter(|linkage| short_names.iter().any(|name| name == linkage.short_name()))
            .collect();

        if selected.is_empty() {
            log::warn!(
                "None of the specified linkages {:?} are supported. Defaulting to: {:?}",
                short_names,
                Linkages::default_set()
            );
            return Linkages::default_set();
        }

        selected
    }
}

impl fmt::Display for Linkages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Renders a locus group for log messages (`HLA-B~HLA-C`).
pub fn format_loci(loci: &[Locus]) -> String {
    loci.iter()
        .map(Locus::name)
        .collect::<Vec<_>>()
        .join("~")
}
