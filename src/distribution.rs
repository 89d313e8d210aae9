use crate::prelude::*;

/// A phenotype's share of the offspring probability mass.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PhenotypeShare {
    pub phenotype: Phenotype,
    pub probability: f64,
}

pub trait PhenotypeDistribution {
    fn phenotype_distribution(&self) -> Vec<PhenotypeShare>;
}

impl PhenotypeDistribution for [FrequencyRow] {
    /// Sums genotype probabilities within each phenotype group.
    ///
    /// Groups appear in first-occurrence order of the underlying
    /// frequency table; shares sum to 100.
    fn phenotype_distribution(&self) -> Vec<PhenotypeShare> {
        let mut shares: Vec<PhenotypeShare> = Vec::new();
        for row in self {
            match shares.iter_mut().find(|s| s.phenotype == row.phenotype) {
                Some(share) => share.probability += row.probability,
                None => shares.push(PhenotypeShare {
                    phenotype: row.phenotype,
                    probability: row.probability,
                }),
            }
        }
        shares
    }
}
