use std::fs;
use std::path::Path;

use isr_core::{TaxConfig, TaxConfigError};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading a replacement tax table.
#[derive(Debug, Error)]
pub enum TaxTableError {
    #[error("cannot read tax table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("tax table is invalid: {0}")]
    Invalid(#[from] TaxConfigError),
}

impl From<toml::de::Error> for TaxTableError {
    fn from(err: toml::de::Error) -> Self {
        TaxTableError::Toml(err.to_string())
    }
}

/// Loader for [`TaxConfig`] values stored as TOML.
///
/// The table may sit at the top level of the document or under a `[tax]`
/// section. Keys use the [`TaxConfig`] field names; any key left out keeps
/// its DGII 2016 default, so a regulatory update only needs to list what
/// changed:
///
/// ```toml
/// [tax]
/// salario_minimo_cotizable = 21000.00
/// descuento_por_dependiente = 1715.46
/// ```
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parses and validates a tax table from TOML text.
    pub fn parse(text: &str) -> Result<TaxConfig, TaxTableError> {
        let mut document: toml::Table = toml::from_str(text)?;

        let table = match document.remove("tax") {
            Some(toml::Value::Table(section)) => section,
            Some(other) => {
                return Err(TaxTableError::Toml(format!(
                    "`tax` must be a table, found {}",
                    other.type_str()
                )));
            }
            None => document,
        };

        let config: TaxConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;

        Ok(config)
    }

    /// Reads, parses and validates a tax table file.
    pub fn load(path: &Path) -> Result<TaxConfig, TaxTableError> {
        let text = fs::read_to_string(path).map_err(|source| TaxTableError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::parse(&text)?;
        info!(path = %path.display(), "loaded tax table");

        Ok(config)
    }

    /// Loads `path` when given, the built-in table otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<TaxConfig, TaxTableError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(TaxConfig::default()),
        }
    }

    /// Renders a tax table as TOML under a `[tax]` section.
    pub fn to_toml(config: &TaxConfig) -> Result<String, TaxTableError> {
        #[derive(serde::Serialize)]
        struct Document<'a> {
            tax: &'a TaxConfig,
        }

        toml::to_string(&Document { tax: config })
            .map_err(|e| TaxTableError::Toml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_is_default_table() {
        assert_eq!(TaxTableLoader::parse("").unwrap(), TaxConfig::default());
    }

    #[test]
    fn flat_keys_override_defaults() {
        let config = TaxTableLoader::parse("salario_minimo_cotizable = 21000.00\n").unwrap();

        assert_eq!(config.salario_minimo_cotizable, dec!(21000));
        assert_eq!(config.afp_porciento, dec!(2.87));
    }

    #[test]
    fn tax_section_overrides_defaults() {
        let text = "[tax]\nescala1_hasta = 450000\nescala2_porciento = \"0.15\"\n";

        let config = TaxTableLoader::parse(text).unwrap();

        assert_eq!(config.escala1_hasta, dec!(450000));
        assert_eq!(config.escala2_porciento, dec!(0.15));
        assert_eq!(config.escala2_hasta, dec!(624329.00));
    }

    #[test]
    fn invalid_table_is_rejected() {
        let result = TaxTableLoader::parse("[tax]\nafp_porciento = 150\n");

        assert!(matches!(
            result,
            Err(TaxTableError::Invalid(TaxConfigError::InvalidPorcentaje { .. }))
        ));
    }

    #[test]
    fn non_table_tax_key_is_rejected() {
        let result = TaxTableLoader::parse("tax = 3\n");

        assert!(matches!(result, Err(TaxTableError::Toml(_))));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            TaxTableLoader::parse("[tax\n"),
            Err(TaxTableError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = TaxTableLoader::load(Path::new("/nonexistent/escalas.toml"));

        match result {
            Err(TaxTableError::Io { path, .. }) => assert_eq!(path, "/nonexistent/escalas.toml"),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_or_default_without_path_is_default() {
        assert_eq!(
            TaxTableLoader::load_or_default(None).unwrap(),
            TaxConfig::default()
        );
    }

    #[test]
    fn rendered_table_parses_back() {
        let config = TaxConfig::default();

        let text = TaxTableLoader::to_toml(&config).unwrap();

        assert!(text.starts_with("[tax]"));
        assert_eq!(TaxTableLoader::parse(&text).unwrap(), config);
    }
}
