//! VCF parsing.
//!
//! Tab-separated lines; `#`-prefixed and blank lines are skipped. Fields
//! used: chromosome, position, ref, alt, qual. A missing or unparseable
//! qual defaults to 0.9, matching the anchor+diff store (not the
//! inconsistent 0.0 default used elsewhere in the original implementation).

use crate::model::VcfVariant;

const DEFAULT_QUALITY: f64 = 0.9;

pub fn parse_vcf(text: &str) -> Vec<VcfVariant> {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<VcfVariant> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 {
        return None;
    }
    let chromosome = fields[0].to_string();
    let position: u64 = fields[1].parse().ok()?;
    let reference_allele = fields[3].to_string();
    let alternate_allele = fields[4].to_string();
    let quality_score = fields
        .get(5)
        .and_then(|q| q.parse::<f64>().ok())
        .unwrap_or(DEFAULT_QUALITY);

    Some(VcfVariant {
        chromosome,
        position,
        reference_allele,
        alternate_allele,
        quality_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_data_lines_and_skips_header() {
        let vcf = "#V\n1\t3\t.\tA\tT\t60\tPASS\n1\t5\t.\tG\tC\t55\tPASS";
        let variants = parse_vcf(vcf);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].position, 3);
        assert_eq!(variants[0].reference_allele, "A");
        assert_eq!(variants[0].alternate_allele, "T");
        assert_eq!(variants[1].position, 5);
    }

    #[test]
    fn missing_qual_defaults_to_0_9() {
        let vcf = "1\t10\t.\tA\tT";
        let variants = parse_vcf(vcf);
        assert_eq!(variants[0].quality_score, 0.9);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let vcf = "\n1\t10\t.\tA\tT\t99\n\n";
        assert_eq!(parse_vcf(vcf).len(), 1);
    }
}
