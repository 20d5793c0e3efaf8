//! Row-to-graph translation for the two record shapes.
//!
//! Both shapes carry `root; serial; code; label; code; label`. FP rows pair a
//! function with a failure, AC rows pair an article with a cause. Ingesting
//! a typed row always succeeds; shape checks happen when the row is built
//! from raw fields.

use serde::Serialize;

use crate::env::Environment;
use crate::error::RowShapeError;
use crate::types::{CodeLabel, Entity};

/// Number of fields every record must carry.
pub const ROW_WIDTH: usize = 6;

/// Which of the two data sources a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// Function / failure records.
    Fp,
    /// Article / cause records.
    Ac,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Fp => "fp",
            RowKind::Ac => "ac",
        }
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One function/failure observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpRow {
    pub root: String,
    pub serial: String,
    pub function: CodeLabel,
    pub failure: CodeLabel,
}

/// One article/cause observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcRow {
    pub root: String,
    pub serial: String,
    pub article: CodeLabel,
    pub cause: CodeLabel,
}

/// Split the six fields of a record, rejecting any other width.
fn split_fields<S: AsRef<str>>(
    kind: RowKind,
    fields: &[S],
) -> Result<[String; ROW_WIDTH], RowShapeError> {
    if fields.len() != ROW_WIDTH {
        return Err(RowShapeError {
            kind,
            expected: ROW_WIDTH,
            found: fields.len(),
        });
    }
    Ok(std::array::from_fn(|i| fields[i].as_ref().to_string()))
}

impl FpRow {
    /// Build a row from `[root, serial, functionCode, functionLabel,
    /// failureCode, failureLabel]`.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowShapeError> {
        let [root, serial, fn_code, fn_label, fl_code, fl_label] =
            split_fields(RowKind::Fp, fields)?;
        Ok(Self {
            root,
            serial,
            function: CodeLabel::new(fn_code, fn_label),
            failure: CodeLabel::new(fl_code, fl_label),
        })
    }
}

impl AcRow {
    /// Build a row from `[root, serial, articleCode, articleLabel,
    /// causeCode, causeLabel]`.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, RowShapeError> {
        let [root, serial, art_code, art_label, cause_code, cause_label] =
            split_fields(RowKind::Ac, fields)?;
        Ok(Self {
            root,
            serial,
            article: CodeLabel::new(art_code, art_label),
            cause: CodeLabel::new(cause_code, cause_label),
        })
    }
}

impl Environment {
    /// Fold one function/failure row into the graph.
    pub fn ingest_fp(&mut self, row: &FpRow) {
        let function = self
            .functions
            .get_or_create(&row.function.code, &row.function.label);
        let failure = self
            .failures
            .get_or_create(&row.failure.code, &row.failure.label);

        let serial =
            Environment::root_entry(&mut self.roots, &row.root).get_or_create_serial(&row.serial);
        serial.add_function(function, self.functions[function].code());
        serial.add_failure(failure, self.failures[failure].code());

        self.link_function_failure(function, failure);
    }

    /// Fold one article/cause row into the graph.
    pub fn ingest_ac(&mut self, row: &AcRow) {
        let article = self
            .articles
            .get_or_create(&row.article.code, &row.article.label);
        let cause = self.causes.get_or_create(&row.cause.code, &row.cause.label);

        let serial =
            Environment::root_entry(&mut self.roots, &row.root).get_or_create_serial(&row.serial);
        serial.add_article(article, self.articles[article].code());
        serial.add_cause(cause, self.causes[cause].code());

        self.link_article_cause(article, cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CodeIndex;
    use crate::registry::Handle;

    fn fp(fields: [&str; 6]) -> FpRow {
        FpRow::from_fields(&fields[..]).unwrap()
    }

    fn ac(fields: [&str; 6]) -> AcRow {
        AcRow::from_fields(&fields[..]).unwrap()
    }

    fn codes<H: Handle>(index: &CodeIndex<H>) -> Vec<&str> {
        index.codes().collect()
    }

    #[test]
    fn test_scenario_shared_failure() {
        let mut env = Environment::new();
        env.ingest_fp(&fp(["R1", "S1", "FN1", "FuncOne", "FL1", "FailOne"]));
        env.ingest_fp(&fp(["R1", "S1", "FN2", "FuncTwo", "FL1", "FailOne"]));

        assert_eq!(env.roots().count(), 1);
        let root = env.root("R1").unwrap();
        assert_eq!(root.serial_count(), 1);

        let serial = root.serial("S1").unwrap();
        assert_eq!(codes(serial.functions()), vec!["FN1", "FN2"]);
        assert_eq!(codes(serial.failures()), vec!["FL1"]);

        let fl1 = env.failures().by_code("FL1").unwrap();
        assert_eq!(codes(fl1.functions()), vec!["FN1", "FN2"]);
        assert_eq!(codes(env.functions().by_code("FN1").unwrap().failures()), vec!["FL1"]);
        assert_eq!(codes(env.functions().by_code("FN2").unwrap().failures()), vec!["FL1"]);
    }

    #[test]
    fn test_scenario_second_serial_from_ac() {
        let mut env = Environment::new();
        env.ingest_fp(&fp(["R1", "S1", "FN1", "FuncOne", "FL1", "FailOne"]));
        env.ingest_fp(&fp(["R1", "S1", "FN2", "FuncTwo", "FL1", "FailOne"]));
        env.ingest_ac(&ac(["R1", "S2", "ART1", "ArtOne", "C1", "CauseOne"]));

        let root = env.root("R1").unwrap();
        let serial_names: Vec<_> = root.serials().map(|s| s.name()).collect();
        assert_eq!(serial_names, vec!["S1", "S2"]);

        let s2 = root.serial("S2").unwrap();
        assert_eq!(codes(s2.articles()), vec!["ART1"]);
        assert_eq!(codes(s2.causes()), vec!["C1"]);
        assert!(s2.functions().is_empty());

        assert_eq!(codes(env.articles().by_code("ART1").unwrap().causes()), vec!["C1"]);
        assert_eq!(codes(env.causes().by_code("C1").unwrap().articles()), vec!["ART1"]);
        assert_eq!(env.articles().len(), 1);
        assert_eq!(env.causes().len(), 1);
    }

    #[test]
    fn test_fp_only_never_touches_articles_or_causes() {
        let mut env = Environment::new();
        env.ingest_fp(&fp(["R1", "S1", "FN1", "a", "FL1", "b"]));
        env.ingest_fp(&fp(["R2", "S9", "FN3", "c", "FL2", "d"]));

        assert!(env.articles().is_empty());
        assert!(env.causes().is_empty());
    }

    #[test]
    fn test_ac_only_never_touches_functions_or_failures() {
        let mut env = Environment::new();
        env.ingest_ac(&ac(["R1", "S1", "ART1", "a", "C1", "b"]));

        assert!(env.functions().is_empty());
        assert!(env.failures().is_empty());
    }

    #[test]
    fn test_relabel_keeps_first_label() {
        let mut env = Environment::new();
        env.ingest_fp(&fp(["R1", "S1", "FN1", "Original", "FL1", "x"]));
        env.ingest_fp(&fp(["R1", "S2", "FN1", "Renamed", "FL1", "y"]));

        assert_eq!(env.functions().len(), 1);
        assert_eq!(env.functions().by_code("FN1").unwrap().label(), "Original");
        assert_eq!(env.failures().by_code("FL1").unwrap().label(), "x");
    }

    #[test]
    fn test_reingesting_same_row_changes_nothing() {
        let mut env = Environment::new();
        let row = fp(["R1", "S1", "FN1", "a", "FL1", "b"]);
        env.ingest_fp(&row);
        let before = env.stats();
        env.ingest_fp(&row);

        assert_eq!(env.stats(), before);
    }

    #[test]
    fn test_serials_share_canonical_entities() {
        let mut env = Environment::new();
        env.ingest_ac(&ac(["R1", "S1", "ART1", "Valve", "C1", "Wear"]));
        env.ingest_ac(&ac(["R2", "S7", "ART1", "Valve", "C2", "Heat"]));

        let s1 = env.root("R1").unwrap().serial("S1").unwrap();
        let s7 = env.root("R2").unwrap().serial("S7").unwrap();
        assert_eq!(s1.articles().get("ART1"), s7.articles().get("ART1"));
        assert!(!s1.causes().contains("C2"));
        assert_eq!(codes(env.articles().by_code("ART1").unwrap().causes()), vec!["C1", "C2"]);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = FpRow::from_fields(&["R1", "S1", "FN1"][..]).unwrap_err();
        assert_eq!(err.kind, RowKind::Fp);
        assert_eq!(err.expected, 6);
        assert_eq!(err.found, 3);
    }

    #[test]
    fn test_extra_fields_are_rejected() {
        let err = AcRow::from_fields(&["R", "S", "A", "al", "C", "cl", "extra"][..]).unwrap_err();
        assert_eq!(err.kind, RowKind::Ac);
        assert_eq!(err.found, 7);
        assert_eq!(err.to_string(), "ac row has 7 fields, expected 6");
    }

    #[test]
    fn test_exact_width_row_keeps_fields() {
        let row = AcRow::from_fields(&["R", "S", "A", "al", "C", "cl"][..]).unwrap();
        assert_eq!(row.article, CodeLabel::new("A", "al"));
        assert_eq!(row.cause, CodeLabel::new("C", "cl"));
    }

    #[test]
    fn test_ingest_links_both_directions() {
        let mut env = Environment::new();
        env.ingest_fp(&fp(["R1", "S1", "FN1", "a", "FL1", "b"]));

        let fn1 = env.functions().find("FN1").unwrap();
        let fl1 = env.failures().find("FL1").unwrap();
        assert_eq!(env.functions()[fn1].failures().get("FL1"), Some(fl1));
        assert_eq!(env.failures()[fl1].functions().get("FN1"), Some(fn1));

        let serial = env.root("R1").unwrap().serial("S1").unwrap();
        assert_eq!(serial.functions().get("FN1"), Some(fn1));
        assert_eq!(serial.failures().get("FL1"), Some(fl1));
    }
}
