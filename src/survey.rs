use crate::prelude::*;
use csv;
use std::error::Error;
use std::io::{Read, Write};
use tracing::debug;

/// One cross request read from a survey file.
///
/// Parent strings are kept raw; canonicalization happens inside
/// `cross()` so the `Input` label of the results reflects what the
/// survey actually said.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossRequest {
    pub parent1: String,
    pub parent2: String,
}

/// Produces `CrossRequest`s from delimited data
///
/// `Survey` implements Iterator so it can be passed
/// directly to `run_survey()`.
pub struct Survey {
    records: std::iter::Enumerate<csv::StringRecordsIntoIter<Box<dyn Read>>>,
    parent1_index: usize,
    parent2_index: usize,
}

impl Survey {
    fn new(
        records: csv::StringRecordsIntoIter<Box<dyn Read>>,
        parent1_index: usize,
        parent2_index: usize,
    ) -> Self {
        Self {
            records: records.into_iter().enumerate(),
            parent1_index,
            parent2_index,
        }
    }
}

impl Iterator for Survey {
    type Item = Result<CrossRequest, Box<dyn Error>>;

    fn next(&mut self) -> Option<Result<CrossRequest, Box<dyn Error>>> {
        match self.records.next() {
            None => None,
            Some((_, Err(e))) => Some(Err(e.into())),
            Some((idx, Ok(row))) => {
                match (row.get(self.parent1_index), row.get(self.parent2_index)) {
                    (Some(p1), Some(p2)) => Some(Ok(CrossRequest {
                        parent1: p1.to_string(),
                        parent2: p2.to_string(),
                    })),
                    _ => Some(Err(
                        format!("row {} is missing a parent genotype", idx).into()
                    )),
                }
            }
        }
    }
}

pub struct SurveyBuilder {
    headers: bool,
    delimiter: u8,
    parent1_field: String,
    parent2_field: String,
}

impl SurveyBuilder {
    /// Construct a new Survey builder
    pub fn new() -> Self {
        Self {
            headers: true,
            delimiter: b',',
            parent1_field: "Parent1".to_owned(),
            parent2_field: "Parent2".to_owned(),
        }
    }

    pub fn headers(&mut self, headers: bool) -> &mut Self {
        self.headers = headers;
        self
    }

    pub fn delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn parent1_field(&mut self, parent1_field: &str) -> &mut Self {
        self.parent1_field = parent1_field.to_owned();
        self
    }

    pub fn parent2_field(&mut self, parent2_field: &str) -> &mut Self {
        self.parent2_field = parent2_field.to_owned();
        self
    }

    /// Builds a `Survey` over the reader.
    ///
    /// With headers enabled the parent columns are located by name and
    /// a missing column fails here, before any row is read. Without
    /// headers the first two columns are used.
    pub fn from_reader(&self, reader: Box<dyn Read>) -> Result<Survey, Box<dyn Error>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.headers)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let (parent1_index, parent2_index) = if self.headers {
            let headers = rdr.headers()?;
            let find = |field: &str| {
                headers
                    .iter()
                    .position(|h| h == field)
                    .ok_or_else(|| format!("missing column {:?}", field))
            };
            (find(&self.parent1_field)?, find(&self.parent2_field)?)
        } else {
            (0, 1)
        };

        Ok(Survey::new(rdr.into_records(), parent1_index, parent2_index))
    }
}

/// One row of the concatenated survey results: a frequency table row
/// tagged with the cross it came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SurveyRow {
    #[serde(rename = "Genotype")]
    pub genotype: Genotype,
    #[serde(rename = "Count")]
    pub count: u32,
    #[serde(rename = "Probability (%)")]
    pub probability: f64,
    #[serde(rename = "Phenotype")]
    pub phenotype: Phenotype,
    #[serde(rename = "Input")]
    pub input: String,
}

/// Runs every cross request in sequence and concatenates the
/// frequency tables, tagging each row with `"<Parent1> x <Parent2>"`.
///
/// The first failing request aborts the whole survey; no partial
/// results are returned.
pub fn run_survey<I>(requests: I) -> Result<Vec<SurveyRow>, Box<dyn Error>>
where
    I: Iterator<Item = Result<CrossRequest, Box<dyn Error>>>,
{
    let mut rows = vec![];
    for request in requests {
        let request = request?;
        let input = format!("{} x {}", request.parent1, request.parent2);
        debug!(%input, "running cross");
        let outcome = cross(&request.parent1, &request.parent2)?;
        for row in outcome.table {
            rows.push(SurveyRow {
                genotype: row.genotype,
                count: row.count,
                probability: row.probability,
                phenotype: row.phenotype,
                input: input.clone(),
            });
        }
    }
    Ok(rows)
}

/// Writes survey results as delimited data with a header row.
pub fn write_survey<W: Write>(rows: &[SurveyRow], writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_survey_reads_parent_columns_by_header() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .from_reader(Box::new("Parent1,Parent2\nCc,Cc\nCC,cc".as_bytes()))?;
        let requests = survey.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(
            requests,
            vec![
                CrossRequest {
                    parent1: "Cc".to_string(),
                    parent2: "Cc".to_string(),
                },
                CrossRequest {
                    parent1: "CC".to_string(),
                    parent2: "cc".to_string(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_survey_finds_parent_columns_among_others() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .from_reader(Box::new("Family,Parent2,Parent1\nf1,cc,Cc".as_bytes()))?;
        let requests = survey.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(requests[0].parent1, "Cc");
        assert_eq!(requests[0].parent2, "cc");
        Ok(())
    }

    #[test]
    fn test_survey_without_headers_uses_first_two_columns() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .headers(false)
            .from_reader(Box::new("Cc,cc".as_bytes()))?;
        let requests = survey.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(requests[0].parent1, "Cc");
        assert_eq!(requests[0].parent2, "cc");
        Ok(())
    }

    #[test]
    fn test_survey_fails_on_missing_column() {
        let result = SurveyBuilder::new().from_reader(Box::new("Parent1\nCc".as_bytes()));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_survey_tags_rows_with_raw_input() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .from_reader(Box::new("Parent1,Parent2\nCc,Cc\nCC,cc".as_bytes()))?;
        let rows = run_survey(survey)?;

        assert_eq!(rows.len(), 4);
        assert!(rows[..3].iter().all(|r| r.input == "Cc x Cc"));
        assert_eq!(rows[3].input, "CC x cc");
        assert_eq!(rows[3].genotype, Genotype::parse("Cc")?);
        assert_eq!(rows[3].count, 4);
        assert_eq!(rows[3].probability, 100.0);
        assert_eq!(rows[3].phenotype, Phenotype::Carrier);
        Ok(())
    }

    #[test]
    fn test_run_survey_aborts_on_first_malformed_genotype() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .from_reader(Box::new("Parent1,Parent2\nCc,Cc\nC,Cc\ncc,cc".as_bytes()))?;
        assert!(run_survey(survey).is_err());
        Ok(())
    }

    #[test]
    fn test_write_survey_emits_header_and_rows() -> Result<(), Box<dyn Error>> {
        let survey = SurveyBuilder::new()
            .from_reader(Box::new("Parent1,Parent2\ncc,cc".as_bytes()))?;
        let rows = run_survey(survey)?;

        let mut out = vec![];
        write_survey(&rows, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "Genotype,Count,Probability (%),Phenotype,Input\ncc,4,100.0,Affected,cc x cc\n"
        );
        Ok(())
    }
}
