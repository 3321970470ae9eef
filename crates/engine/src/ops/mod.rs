use sea_orm::DatabaseConnection;

use crate::{EngineError, FieldErrors, PriceCatalog, ResultEngine};

mod access;
mod expenses;
mod reports;
mod sales;

pub use sales::{DeleteOutcome, SaleScope};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The record-keeping engine: owns the database handle and the injected,
/// immutable price catalog.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    catalog: PriceCatalog,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The injected price catalog.
    pub fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }
}

fn normalize_required_text(
    value: &str,
    field: &'static str,
    errors: &mut FieldErrors,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "must not be empty");
    }
    trimmed.to_string()
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    catalog: Option<PriceCatalog>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Inject the price catalog (defaults to [`PriceCatalog::standard`]).
    pub fn catalog(mut self, catalog: PriceCatalog) -> EngineBuilder {
        self.catalog = Some(catalog);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let catalog = self.catalog.unwrap_or_else(PriceCatalog::standard);
        if catalog.is_empty() {
            return Err(EngineError::Config(
                "price catalog must not be empty".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            catalog,
        })
    }
}
