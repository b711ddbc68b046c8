// Import runner - runs the three statements in order
use std::io::Write;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::BossImportMode;
use crate::errors::LoaderError;
use crate::import::ImportKind;
use crate::models::{ImportCounters, ImportReport};

/// Something that can run one import statement and report its counters.
///
/// Implemented by [`crate::neo4j::Neo4jSession`] for real runs and by
/// [`crate::preview::GraphModel`] for dry runs.
#[async_trait]
pub trait StatementRunner: Send + Sync {
    async fn run_statement(
        &self,
        kind: ImportKind,
        statement: &str,
    ) -> Result<ImportCounters, LoaderError>;
}

/// Runs every import against one [`StatementRunner`], stopping at the first
/// failure.
pub struct ImportRunner<'a, R: StatementRunner> {
    runner: &'a R,
    boss_mode: BossImportMode,
}

impl<'a, R: StatementRunner> ImportRunner<'a, R> {
    pub fn new(runner: &'a R, boss_mode: BossImportMode) -> Self {
        Self { runner, boss_mode }
    }

    /// Run all imports, printing status lines to stdout
    pub async fn execute(&self) -> Result<Vec<ImportReport>, LoaderError> {
        self.execute_with_output(&mut std::io::stdout()).await
    }

    /// Run all imports, writing status lines to `out`.
    ///
    /// Each import prints its loading message before the statement runs and
    /// its counters once the summary is in. Later imports do not run after a
    /// failure.
    pub async fn execute_with_output<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<Vec<ImportReport>, LoaderError> {
        let start_time = Instant::now();
        let mut reports = Vec::with_capacity(ImportKind::ALL.len());

        if self.boss_mode == BossImportMode::Merge {
            info!("Boss import runs in merge mode");
        }

        for kind in ImportKind::ALL {
            let counters = self.run_one(kind, out).await?;
            reports.push(ImportReport { kind, counters });
        }

        let totals = reports
            .iter()
            .fold(ImportCounters::default(), |acc, report| ImportCounters {
                nodes_created: acc.nodes_created + report.counters.nodes_created,
                relationships_created: acc.relationships_created
                    + report.counters.relationships_created,
            });

        info!("=== Import Complete ===");
        info!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
        info!("Nodes: {}", totals.nodes_created);
        info!("Relationships: {}", totals.relationships_created);

        Ok(reports)
    }

    async fn run_one<W: Write>(
        &self,
        kind: ImportKind,
        out: &mut W,
    ) -> Result<ImportCounters, LoaderError> {
        write!(out, "{}", kind.loading_message())?;
        out.flush()?;

        let statement = kind.statement(self.boss_mode);
        let counters = match self.runner.run_statement(kind, &statement).await {
            Ok(counters) => counters,
            Err(e) => {
                writeln!(out)?;
                error!("{} import failed", kind);
                return Err(e);
            }
        };

        writeln!(out, "{}", counters)?;
        info!("✓ Loaded {} from {}", kind, kind.csv_file());

        Ok(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock runner recording the statements it was given
    struct MockRunner {
        statements: Mutex<Vec<(ImportKind, String)>>,
        counters: HashMap<ImportKind, ImportCounters>,
        fail_on: Option<ImportKind>,
    }

    impl MockRunner {
        fn new() -> Self {
            Self {
                statements: Mutex::new(Vec::new()),
                counters: HashMap::from([
                    (ImportKind::Boss, ImportCounters::new(10, 8)),
                    (ImportKind::Friends, ImportCounters::new(2, 15)),
                    (ImportKind::Skills, ImportCounters::new(6, 20)),
                ]),
                fail_on: None,
            }
        }

        fn failing_on(kind: ImportKind) -> Self {
            Self {
                fail_on: Some(kind),
                ..Self::new()
            }
        }

        fn kinds(&self) -> Vec<ImportKind> {
            self.statements
                .lock()
                .unwrap()
                .iter()
                .map(|(kind, _)| *kind)
                .collect()
        }
    }

    #[async_trait]
    impl StatementRunner for MockRunner {
        async fn run_statement(
            &self,
            kind: ImportKind,
            statement: &str,
        ) -> Result<ImportCounters, LoaderError> {
            self.statements
                .lock()
                .unwrap()
                .push((kind, statement.to_string()));
            if self.fail_on == Some(kind) {
                return Err(LoaderError::Statement {
                    import: kind,
                    source: neo4rs::Error::UnexpectedMessage("mock failure".to_string()),
                });
            }
            Ok(self.counters[&kind])
        }
    }

    #[tokio::test]
    async fn test_runs_imports_in_order() {
        let mock = MockRunner::new();
        let runner = ImportRunner::new(&mock, BossImportMode::Create);
        let mut out = Vec::<u8>::new();

        let reports = runner.execute_with_output(&mut out).await.unwrap();

        assert_eq!(mock.kinds(), ImportKind::ALL.to_vec());
        assert_eq!(
            reports.iter().map(|r| r.kind).collect::<Vec<_>>(),
            ImportKind::ALL.to_vec()
        );
        assert_eq!(reports[1].counters, ImportCounters::new(2, 15));
    }

    #[tokio::test]
    async fn test_prints_status_lines() {
        let mock = MockRunner::new();
        let runner = ImportRunner::new(&mock, BossImportMode::Create);
        let mut out = Vec::new();

        runner.execute_with_output(&mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            "Loading employees and their boss...Nodes created: 10, Relationships created: 8\n\
             Loading employees and their friends...Nodes created: 2, Relationships created: 15\n\
             Loading employees and their skills...Nodes created: 6, Relationships created: 20\n"
        );
    }

    #[tokio::test]
    async fn test_failure_stops_later_imports() {
        let mock = MockRunner::failing_on(ImportKind::Boss);
        let runner = ImportRunner::new(&mock, BossImportMode::Create);
        let mut out = Vec::new();

        let err = runner.execute_with_output(&mut out).await.unwrap_err();

        assert!(matches!(
            err,
            LoaderError::Statement {
                import: ImportKind::Boss,
                ..
            }
        ));
        assert_eq!(mock.kinds(), vec![ImportKind::Boss]);
        let printed = String::from_utf8(out).unwrap();
        assert!(!printed.contains("Nodes created"));
    }

    #[tokio::test]
    async fn test_failure_in_middle_keeps_earlier_output() {
        let mock = MockRunner::failing_on(ImportKind::Friends);
        let runner = ImportRunner::new(&mock, BossImportMode::Create);
        let mut out = Vec::new();

        assert!(runner.execute_with_output(&mut out).await.is_err());

        assert_eq!(mock.kinds(), vec![ImportKind::Boss, ImportKind::Friends]);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Nodes created").count(), 1);
    }

    #[tokio::test]
    async fn test_boss_mode_reaches_statement() {
        let mock = MockRunner::new();
        let runner = ImportRunner::new(&mock, BossImportMode::Merge);

        runner.execute_with_output(&mut std::io::sink()).await.unwrap();

        let statements = mock.statements.lock().unwrap();
        let (_, boss_statement) = &statements[0];
        assert!(boss_statement.contains("MERGE (employee:Employee"));
    }
}
