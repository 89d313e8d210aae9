pub use crate::distribution::{PhenotypeDistribution, PhenotypeShare};
pub use crate::survey::{run_survey, write_survey, CrossRequest, Survey, SurveyBuilder, SurveyRow};
pub use crate::{
    cross, Allele, CrossError, CrossOutcome, FrequencyRow, FrequencyTable, Gamete, Genotype,
    Phenotype, PunnettGrid,
};
