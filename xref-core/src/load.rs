//! Drivers feeding a record stream into an [`Environment`].
//!
//! End of input is a normal stop. Anything else that goes wrong with a
//! record is a *malformed row* and is handled according to
//! [`MalformedPolicy`].

use std::io::BufRead;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::env::Environment;
use crate::error::{LoadError, ReadError, Result, RowShapeError};
use crate::ingest::{AcRow, FpRow, RowKind};
use crate::reader::RowReader;

/// What to do when a record cannot be read or has the wrong shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop reading the source and keep what was loaded so far.
    #[default]
    Stop,
    /// Count the record and carry on with the next one.
    Skip,
    /// Abort the load with an error.
    Fail,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(MalformedPolicy::Stop),
            "skip" => Ok(MalformedPolicy::Skip),
            "fail" => Ok(MalformedPolicy::Fail),
            _ => Err(format!("Unknown malformed-row policy: '{}'", s)),
        }
    }
}

/// Where and why a source stopped before its end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopPoint {
    /// Line of the offending record, when known.
    pub line: Option<usize>,
    pub reason: String,
}

/// Outcome of loading one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub kind: RowKind,
    pub rows_ingested: usize,
    pub rows_skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<StopPoint>,
}

impl LoadReport {
    fn new(kind: RowKind) -> Self {
        Self {
            kind,
            rows_ingested: 0,
            rows_skipped: 0,
            stopped_at: None,
        }
    }

    /// `true` when the whole source was consumed.
    pub fn completed(&self) -> bool {
        self.stopped_at.is_none()
    }
}

impl Environment {
    /// Load function/failure records until the source is exhausted.
    pub fn load_fp<R: BufRead>(
        &mut self,
        reader: RowReader<R>,
        policy: MalformedPolicy,
    ) -> Result<LoadReport> {
        self.load_rows(RowKind::Fp, reader, policy, |env, fields| {
            let row = FpRow::from_fields(fields)?;
            env.ingest_fp(&row);
            Ok(())
        })
    }

    /// Load article/cause records until the source is exhausted.
    pub fn load_ac<R: BufRead>(
        &mut self,
        reader: RowReader<R>,
        policy: MalformedPolicy,
    ) -> Result<LoadReport> {
        self.load_rows(RowKind::Ac, reader, policy, |env, fields| {
            let row = AcRow::from_fields(fields)?;
            env.ingest_ac(&row);
            Ok(())
        })
    }

    fn load_rows<R, F>(
        &mut self,
        kind: RowKind,
        reader: RowReader<R>,
        policy: MalformedPolicy,
        mut ingest: F,
    ) -> Result<LoadReport>
    where
        R: BufRead,
        F: FnMut(&mut Environment, &[String]) -> std::result::Result<(), RowShapeError>,
    {
        let mut report = LoadReport::new(kind);

        for item in reader {
            let (line, reason) = match item {
                Ok(record) => match ingest(self, &record.fields) {
                    Ok(()) => {
                        report.rows_ingested += 1;
                        continue;
                    }
                    Err(e) => (record.line, e.to_string()),
                },
                Err(ReadError::Io(source)) => {
                    // The reader is finished after an IO error.
                    if policy == MalformedPolicy::Fail {
                        return Err(LoadError::Io { kind, source });
                    }
                    warn!(%kind, error = %source, "Stopped reading source");
                    report.stopped_at = Some(StopPoint {
                        line: None,
                        reason: source.to_string(),
                    });
                    break;
                }
                Err(e) => (e.line().unwrap_or_default(), e.to_string()),
            };

            match policy {
                MalformedPolicy::Fail => {
                    return Err(LoadError::Malformed { kind, line, reason });
                }
                MalformedPolicy::Skip => {
                    warn!(%kind, line, %reason, "Skipping malformed record");
                    report.rows_skipped += 1;
                }
                MalformedPolicy::Stop => {
                    warn!(%kind, line, %reason, "Stopping at malformed record");
                    report.stopped_at = Some(StopPoint {
                        line: Some(line),
                        reason,
                    });
                    break;
                }
            }
        }

        info!(
            %kind,
            ingested = report.rows_ingested,
            skipped = report.rows_skipped,
            "Loaded source"
        );
        debug!(stats = ?self.stats(), "Graph after load");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> RowReader<&[u8]> {
        RowReader::new(input.as_bytes())
    }

    const FP_DATA: &str = "R1;S1;FN1;FuncOne;FL1;FailOne\n\
                           R1;S1;FN2;FuncTwo;FL1;FailOne\n";

    const WITH_SHORT_ROW: &str = "R1;S1;FN1;a;FL1;b\n\
                                  R1;S1;FN2\n\
                                  R1;S2;FN3;c;FL2;d\n";

    #[test]
    fn test_load_fp_counts_rows() {
        let mut env = Environment::new();
        let report = env.load_fp(reader(FP_DATA), MalformedPolicy::Stop).unwrap();

        assert_eq!(report.kind, RowKind::Fp);
        assert_eq!(report.rows_ingested, 2);
        assert!(report.completed());
        assert_eq!(env.functions().len(), 2);
        assert_eq!(env.failures().len(), 1);
    }

    #[test]
    fn test_fp_then_ac_share_environment() {
        let mut env = Environment::new();
        env.load_fp(reader(FP_DATA), MalformedPolicy::Stop).unwrap();
        env.load_ac(
            reader("R1;S2;ART1;ArtOne;C1;CauseOne\n"),
            MalformedPolicy::Stop,
        )
        .unwrap();

        let stats = env.stats();
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.serials, 2);
        assert_eq!(stats.articles, 1);
        assert_eq!(stats.causes, 1);
        assert_eq!(stats.article_cause_links, 1);
        assert_eq!(stats.function_failure_links, 2);
    }

    #[test]
    fn test_stop_policy_keeps_earlier_rows() {
        let mut env = Environment::new();
        let report = env
            .load_fp(reader(WITH_SHORT_ROW), MalformedPolicy::Stop)
            .unwrap();

        assert_eq!(report.rows_ingested, 1);
        let stop = report.stopped_at.unwrap();
        assert_eq!(stop.line, Some(2));
        assert!(stop.reason.contains("3 fields"));
        assert!(env.functions().find("FN3").is_none());
    }

    #[test]
    fn test_skip_policy_continues() {
        let mut env = Environment::new();
        let report = env
            .load_fp(reader(WITH_SHORT_ROW), MalformedPolicy::Skip)
            .unwrap();

        assert_eq!(report.rows_ingested, 2);
        assert_eq!(report.rows_skipped, 1);
        assert!(report.completed());
        assert!(env.functions().find("FN3").is_some());
    }

    #[test]
    fn test_wide_row_is_malformed_under_every_policy() {
        const WITH_WIDE_ROW: &str = "R1;S1;FN1;a;FL1;b\n\
                                     R1;S1;FN2;c;FL2;d;EXTRA\n\
                                     R1;S1;FN3;e;FL3;f\n";

        let mut env = Environment::new();
        let report = env
            .load_fp(reader(WITH_WIDE_ROW), MalformedPolicy::Stop)
            .unwrap();
        assert_eq!(report.rows_ingested, 1);
        let stop = report.stopped_at.unwrap();
        assert_eq!(stop.line, Some(2));
        assert!(stop.reason.contains("7 fields, expected 6"));
        assert!(env.functions().find("FN2").is_none());

        let mut env = Environment::new();
        let report = env
            .load_fp(reader(WITH_WIDE_ROW), MalformedPolicy::Skip)
            .unwrap();
        assert_eq!(report.rows_ingested, 2);
        assert_eq!(report.rows_skipped, 1);
        assert!(env.functions().find("FN2").is_none());
        assert!(env.functions().find("FN3").is_some());

        let mut env = Environment::new();
        let err = env
            .load_fp(reader(WITH_WIDE_ROW), MalformedPolicy::Fail)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_fail_policy_returns_error() {
        let mut env = Environment::new();
        let err = env
            .load_ac(reader("R1;S1;A\"RT;x;C1;y\n"), MalformedPolicy::Fail)
            .unwrap_err();

        match err {
            LoadError::Malformed { kind, line, .. } => {
                assert_eq!(kind, RowKind::Ac);
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_source_is_complete() {
        let mut env = Environment::new();
        let report = env.load_ac(reader(""), MalformedPolicy::Fail).unwrap();

        assert_eq!(report.rows_ingested, 0);
        assert!(report.completed());
        assert_eq!(env.stats(), Default::default());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse(), Ok(MalformedPolicy::Skip));
        assert_eq!("FAIL".parse(), Ok(MalformedPolicy::Fail));
        assert!("ignore".parse::<MalformedPolicy>().is_err());
    }
}
