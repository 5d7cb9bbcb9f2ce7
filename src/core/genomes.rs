use log::{info, warn};

use std::path::Path;

/// Genome descriptor columns, in manifest order.
pub const IDENTITY_COLUMNS: &[&str] = &["species", "build", "release", "origin"];

/// Resource path columns, in manifest order.
///
/// Every genome row carries all of them; unavailable resources are
/// written as empty fields so downstream pipelines can test for them.
pub const RESOURCE_COLUMNS: &[&str] = &[
    // DNA sequences
    "dna_fasta",
    "dna_fai",
    "dna_dict",
    // cDNA sequences
    "cdna_fasta",
    "cdna_fai",
    "cdna_dict",
    // Transcript sequences
    "transcripts_fasta",
    "transcripts_fai",
    "transcripts_dict",
    // Known variants
    "af_only",
    "af_only_tbi",
    "dbsnp",
    "dbsnp_tbi",
    // Gene annotations
    "gtf",
    "gff3",
    // Reformatting
    "id_to_gene",
    "t2g",
    "genepred",
    "genepred_bed",
    // Known blacklists
    "blacklist",
    // Bowtie2 indexes
    "bowtie2_dna_index",
    "bowtie2_transcripts_index",
    "bowtie2_cdna_index",
    // Salmon index
    "salmon_index",
    // Variant databases
    "CancerGeneCensus",
    "clinvar",
    "clinvar_tbi",
    "cosmic",
    "cosmic_tbi",
    "dbnsfp",
    "dbnsfp_tbi",
    "dbvar",
    "dbvar_tbi",
    "exac",
    "exac_tbi",
    "kaviar",
    "kaviar_tbi",
    "oncokb",
    // Pathways and gene sets
    "CORUM",
    "msigdb_c1",
    "msigdb_c2",
    "msigdb_c3",
    "msigdb_c4",
    "msigdb_c5",
    "msigdb_c6",
    "msigdb_c7",
    "msigdb_c8",
    "msigdb_h",
    "gwascatalog",
    "wikipathway",
];

/// One genome release with its known resource paths.
#[derive(Debug, Clone)]
pub struct GenomeRecord {
    pub species: String,
    pub build: String,
    pub release: String,
    pub origin: String,
    /// Aligned with [`RESOURCE_COLUMNS`].
    resources: Vec<String>,
}

impl GenomeRecord {
    /// Build a record from the known (non-empty) resources only, the
    /// rest of the columns default to empty fields.
    pub fn new(
        species: &str,
        build: &str,
        release: &str,
        origin: &str,
        known: &[(&str, &str)],
    ) -> Self {
        let resources = RESOURCE_COLUMNS
            .iter()
            .map(|column| {
                known
                    .iter()
                    .find(|(key, _)| key == column)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_default()
            })
            .collect();

        Self {
            species: species.to_string(),
            build: build.to_string(),
            release: release.to_string(),
            origin: origin.to_string(),
            resources,
        }
    }

    /// Look a resource path up by its column name.
    pub fn resource(&self, key: &str) -> Option<&str> {
        RESOURCE_COLUMNS
            .iter()
            .position(|column| *column == key)
            .map(|idx| self.resources[idx].as_str())
    }

    fn row(&self, empty: bool) -> Vec<&str> {
        let mut row = vec![
            self.species.as_str(),
            self.build.as_str(),
            self.release.as_str(),
        ];

        if !empty {
            row.push(self.origin.as_str());
            row.extend(self.resources.iter().map(|r| r.as_str()));
        }

        row
    }
}

const INDEX_DB: &str = "/mnt/beegfs/database/bioinfo/Index_DB";

/// Genome releases known to the cluster, most recent human build first.
pub fn catalog() -> Vec<GenomeRecord> {
    let grch38_fasta = format!("{INDEX_DB}/Fasta/Ensembl/GRCh38.109");
    let grch38_gtf = format!("{INDEX_DB}/GTF/Ensembl/GRCh38.109");
    let grcm38_fasta = format!("{INDEX_DB}/Fasta/Ensembl/GRCm38.99");
    let grcm38_gtf = format!("{INDEX_DB}/GTF/Ensembl/GRCm38.99");
    let msigdb = format!("{INDEX_DB}/MSigDB/homo_sapiens/v2023.1/entrez");

    let homo_sapiens_grch38_109 = GenomeRecord::new(
        "homo_sapiens",
        "GRCh38",
        "109",
        "Ensembl",
        &[
            ("dna_fasta", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.dna.fasta")),
            ("dna_fai", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.dna.fasta.fai")),
            ("dna_dict", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.dna.dict")),
            ("cdna_fasta", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.cdna.fasta")),
            ("cdna_fai", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.cdna.fasta.fai")),
            ("cdna_dict", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.cdna.dict")),
            ("transcripts_fasta", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.transcripts.fasta")),
            ("transcripts_fai", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.transcripts.fasta.fai")),
            ("transcripts_dict", &format!("{grch38_fasta}/homo_sapiens.GRCh38.109.transcripts.dict")),
            ("af_only", &format!("{INDEX_DB}/GATK/mutect2_gnomad_af_only/hg38/somatic-hg38_af-only-gnomad.hg38.nochr.vcf.gz")),
            ("af_only_tbi", &format!("{INDEX_DB}/GATK/mutect2_gnomad_af_only/hg38/somatic-hg38_af-only-gnomad.hg38.nochr.vcf.gz.tbi")),
            ("dbsnp", &format!("{INDEX_DB}/dbSNP/homo_sapiens_GRCh38.109/homo_sapiens.GRCh38.109.all.vcf.gz")),
            ("dbsnp_tbi", &format!("{INDEX_DB}/dbSNP/homo_sapiens_GRCh38.109/homo_sapiens.GRCh38.109.all.vcf.gz.tbi")),
            ("gtf", &format!("{grch38_gtf}/homo_sapiens.GRCh38.109.gtf")),
            ("gff3", &format!("{grch38_gtf}/homo_sapiens.GRCh38.109.gff3")),
            ("id_to_gene", &format!("{grch38_gtf}/homo_sapiens.GRCh38.109.id_to_gene.tsv")),
            ("t2g", &format!("{grch38_gtf}/homo_sapiens.GRCh38.109.t2g.tsv")),
            ("genepred", &format!("{grch38_gtf}/homo_sapiens.GRCh38.109.genePred")),
            ("bowtie2_dna_index", &format!("{INDEX_DB}/Bowtie/2.5.4/homo_sapiens.GRCh38.105")),
            ("CancerGeneCensus", &format!("{INDEX_DB}/CancerGeneCensus/Census_allTue_Aug_31_15_11_39_2021.tsv")),
            ("clinvar", &format!("{INDEX_DB}/ClinVar/GRCh38/clinvar_20210404.GLeaves.vcf.gz")),
            ("clinvar_tbi", &format!("{INDEX_DB}/ClinVar/GRCh38/clinvar_20210404.GLeaves.vcf.gz.tbi")),
            ("cosmic", &format!("{INDEX_DB}/Cosmic/GRCh38/v98/CosmicCodingMuts_v98_GRCh38.vcf.gz")),
            ("cosmic_tbi", &format!("{INDEX_DB}/Cosmic/GRCh38/v98/CosmicCodingMuts_v98_GRCh38.vcf.gz.tbi")),
            ("dbnsfp", &format!("{INDEX_DB}/dbNSFP/4.1/GRCh38/dbNSFP4.1a.txt.gz")),
            ("dbnsfp_tbi", &format!("{INDEX_DB}/dbNSFP/4.1/GRCh38/dbNSFP4.1a.txt.gz.tbi")),
            ("dbvar", &format!("{INDEX_DB}/dbVar/GRCh38.variant_call.all.vcf.gz")),
            ("dbvar_tbi", &format!("{INDEX_DB}/dbVar/GRCh38.variant_call.all.vcf.gz.tbi")),
            ("exac", &format!("{INDEX_DB}/Exac/release1/ExAC.r1.sites.vep.fixed.vcf.gz")),
            ("exac_tbi", &format!("{INDEX_DB}/Exac/release1/ExAC.r1.sites.vep.fixed.vcf.gz.tbi")),
            ("kaviar", &format!("{INDEX_DB}/Kaviar/HG38/Kaviar-160204-Public/vcfs/Kaviar-160204-Public-hg38-trim.vcf.gz")),
            ("kaviar_tbi", &format!("{INDEX_DB}/Kaviar/HG38/Kaviar-160204-Public/vcfs/Kaviar-160204-Public-hg38-trim.vcf.gz.tbi")),
            ("oncokb", &format!("{INDEX_DB}/OncoKB/OncoKB.csv")),
            ("CORUM", &format!("{INDEX_DB}/CORUM/HomoSapiens/hsapiens.CORUM.ENSG.gmt")),
            ("msigdb_c1", &format!("{msigdb}/c1.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c2", &format!("{msigdb}/c2.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c3", &format!("{msigdb}/c3.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c4", &format!("{msigdb}/c4.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c5", &format!("{msigdb}/c5.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c6", &format!("{msigdb}/c6.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c7", &format!("{msigdb}/c7.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_c8", &format!("{msigdb}/c8.all.v2023.1.Hs.entrez.gmt")),
            ("msigdb_h", &format!("{msigdb}/h.all.v2023.1.Hs.entrez.gmt")),
            ("gwascatalog", &format!("{INDEX_DB}/GWASCatalog/gwas_catalog_v1.0.2-studies_r2020-05-03.tsv")),
            ("wikipathway", &format!("{INDEX_DB}/WikiPathway/HomoSapiens/hsapiens.WP.ENSG.gmt")),
        ],
    );

    let mus_musculus_grcm39_109 =
        GenomeRecord::new("mus_musculus", "GRCm39", "109", "Ensembl", &[]);

    let mus_musculus_grcm38_99 = GenomeRecord::new(
        "mus_musculus",
        "GRCm38",
        "99",
        "Ensembl",
        &[
            ("dna_fasta", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.dna.fasta")),
            ("dna_fai", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.dna.fasta.fai")),
            ("dna_dict", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.dna.dict")),
            ("cdna_fasta", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.cdna.fasta")),
            ("cdna_fai", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.cdna.fasta.fai")),
            ("cdna_dict", &format!("{grcm38_fasta}/GRCm38.99.mus_musculus.cdna.dict")),
            ("transcripts_fasta", &format!("{grcm38_fasta}/mus_musculus.GRCm38.99.transcripts.fasta")),
            ("transcripts_fai", &format!("{grcm38_fasta}/mus_musculus.GRCm38.99.transcripts.fasta.fai")),
            ("transcripts_dict", &format!("{grcm38_fasta}/mus_musculus.GRCm38.99.transcripts.dict")),
            ("dbsnp", &format!("{INDEX_DB}/VCF/Ensembl/GRCm38.99/mus_musculus.GRCm38.99.all.vcf.gz")),
            ("dbsnp_tbi", &format!("{INDEX_DB}/VCF/Ensembl/GRCm38.99/mus_musculus.GRCm38.99.all.vcf.gz.tbi")),
            ("gtf", &format!("{grcm38_gtf}/mus_musculus.GRCm38.99.gtf")),
            ("gff3", &format!("{grcm38_gtf}/mus_musculus.GRCm38.99.gff3")),
            ("id_to_gene", &format!("{grcm38_gtf}/mus_musculus.GRCm38.99.id_to_gene.tsv")),
            ("t2g", &format!("{grcm38_gtf}/mus_musculus.GRCm38.99.t2g.tsv")),
            ("genepred", &format!("{grcm38_gtf}/mus_musculus.GRCm38.99.genePred")),
            ("CancerGeneCensus", &format!("{INDEX_DB}/CancerGeneCensus/Census_allTue_Aug_31_15_11_39_2021.tsv")),
        ],
    );

    let homo_sapiens_grch37_75 =
        GenomeRecord::new("homo_sapiens", "GRCh37", "75", "Ensembl", &[]);

    let homo_sapiens_grch38_105 =
        GenomeRecord::new("homo_sapiens", "GRCh38", "105", "Ensembl", &[]);

    vec![
        homo_sapiens_grch38_109,
        mus_musculus_grcm39_109,
        mus_musculus_grcm38_99,
        homo_sapiens_grch37_75,
        homo_sapiens_grch38_105,
    ]
}

/// Verify that every non-empty resource path exists on this host.
pub fn check_resources(genomes: &[GenomeRecord]) -> Result<(), Box<dyn std::error::Error>> {
    for genome in genomes {
        for (column, path) in RESOURCE_COLUMNS.iter().zip(&genome.resources) {
            if path.is_empty() {
                continue;
            }

            if !Path::new(path).exists() {
                return Err(format!(
                    "ERROR: Missing resource {} for {} {}.{}: {}",
                    column, genome.species, genome.build, genome.release, path
                )
                .into());
            }
        }
    }

    Ok(())
}

/// Write the genome manifest.
///
/// With `empty`, only the species/build/release identity columns are
/// written and users fill the paths in themselves.
pub fn write_manifest(
    genomes: &[GenomeRecord],
    output: &Path,
    empty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(output)?;

    if empty {
        warn!("WARNING: Writing an empty genome manifest, fill the resource paths in yourself");
        writer.write_record(&IDENTITY_COLUMNS[..3])?;
    } else {
        let header: Vec<&str> = IDENTITY_COLUMNS
            .iter()
            .chain(RESOURCE_COLUMNS.iter())
            .copied()
            .collect();
        writer.write_record(&header)?;
    }

    for genome in genomes {
        writer.write_record(genome.row(empty))?;
    }

    writer.flush()?;
    info!("INFO: Genome manifest available at {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_align_with_columns() {
        for genome in catalog() {
            assert_eq!(genome.resources.len(), RESOURCE_COLUMNS.len());
        }
    }

    #[test]
    fn resource_lookup_by_column_name() {
        let genomes = catalog();
        let human = &genomes[0];

        assert_eq!(human.species, "homo_sapiens");
        assert!(human.resource("dna_fasta").unwrap().ends_with(".dna.fasta"));
        assert_eq!(human.resource("salmon_index"), Some(""));
        assert_eq!(human.resource("no_such_column"), None);
    }

    #[test]
    fn manifest_has_one_row_per_genome() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("genomes.csv");

        write_manifest(&catalog(), &output, false).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + 5);
        assert!(lines[0].starts_with("species,build,release,origin,dna_fasta"));
        assert!(lines[1].starts_with("homo_sapiens,GRCh38,109,Ensembl"));
    }

    #[test]
    fn empty_manifest_keeps_identity_columns_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("genomes.csv");

        write_manifest(&catalog(), &output, true).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "species,build,release");
        assert_eq!(lines[3], "mus_musculus,GRCm38,99");
    }

    #[test]
    fn missing_resources_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("genome.fasta");
        std::fs::write(&present, ">chr1\nACGT\n").unwrap();

        let ok = GenomeRecord::new(
            "homo_sapiens",
            "GRCh38",
            "109",
            "Ensembl",
            &[("dna_fasta", present.to_str().unwrap())],
        );
        assert!(check_resources(&[ok]).is_ok());

        let missing = GenomeRecord::new(
            "homo_sapiens",
            "GRCh38",
            "109",
            "Ensembl",
            &[("dna_fasta", "/nonexistent/genome.fasta")],
        );
        let err = check_resources(&[missing]).unwrap_err();
        assert!(err.to_string().contains("dna_fasta"));
    }
}
