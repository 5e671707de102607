//! The fixed gene → genomic region table used to count gene hits during
//! theory execution. Expanded beyond the three genes in the original
//! implementation to the full set spec.md §4.6 names.

struct Region {
    gene: &'static str,
    chrom: &'static str,
    start: u64,
    end: u64,
}

const GENE_REGIONS: &[Region] = &[
    Region { gene: "SHANK3", chrom: "22", start: 51_135_000, end: 51_180_000 },
    Region { gene: "NRXN1", chrom: "2", start: 50_100_000, end: 50_400_000 },
    Region { gene: "SYNGAP1", chrom: "6", start: 33_400_000, end: 33_500_000 },
    Region { gene: "BRCA1", chrom: "17", start: 43_044_295, end: 43_125_483 },
    Region { gene: "BRCA2", chrom: "13", start: 32_315_474, end: 32_400_266 },
    Region { gene: "CHD8", chrom: "14", start: 21_852_877, end: 21_930_151 },
    Region { gene: "SCN2A", chrom: "2", start: 165_984_642, end: 166_149_214 },
    Region { gene: "TP53", chrom: "17", start: 7_661_779, end: 7_687_550 },
    Region { gene: "PTEN", chrom: "10", start: 87_863_625, end: 87_971_930 },
    Region { gene: "MLH1", chrom: "3", start: 36_993_332, end: 37_050_845 },
    Region { gene: "APOE", chrom: "19", start: 44_905_791, end: 44_909_393 },
];

fn region_for(gene: &str) -> Option<&'static Region> {
    GENE_REGIONS.iter().find(|r| r.gene == gene)
}

/// Counts variants that fall inside any region named by `target_genes`. A
/// variant is counted at most once even if it matches more than one gene.
pub fn count_gene_hits(target_genes: &[String], variants: &[genomic_storage::VcfVariant]) -> usize {
    let mut hits = 0;
    for variant in variants {
        for gene in target_genes {
            if let Some(region) = region_for(gene) {
                if variant.chromosome == region.chrom
                    && variant.position >= region.start
                    && variant.position <= region.end
                {
                    hits += 1;
                    break;
                }
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use genomic_storage::VcfVariant;

    fn variant(chrom: &str, pos: u64) -> VcfVariant {
        VcfVariant {
            chromosome: chrom.to_string(),
            position: pos,
            reference_allele: "A".to_string(),
            alternate_allele: "T".to_string(),
            quality_score: 0.9,
        }
    }

    #[test]
    fn counts_variant_inside_brca1_region() {
        let variants = vec![variant("17", 43_100_000)];
        assert_eq!(count_gene_hits(&["BRCA1".to_string()], &variants), 1);
    }

    #[test]
    fn ignores_variant_outside_any_region() {
        let variants = vec![variant("1", 1)];
        assert_eq!(count_gene_hits(&["BRCA1".to_string()], &variants), 0);
    }

    #[test]
    fn unknown_gene_contributes_no_hits() {
        let variants = vec![variant("17", 43_100_000)];
        assert_eq!(count_gene_hits(&["MADEUPGENE".to_string()], &variants), 0);
    }
}
