//! CSV catalog loading
//!
//! The header must name every feature-space attribute plus the identity,
//! overall and cluster-label columns. Value and wage cells may be empty.

use super::{Catalog, Entity};
use crate::error::LoadError;
use crate::features::{FeatureSpace, FeatureVector, GroupLabel};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Column names for the non-feature fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumns {
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default = "default_market_value")]
    pub market_value: String,
    #[serde(default = "default_wage")]
    pub wage: String,
    #[serde(default = "default_overall")]
    pub overall: String,
    #[serde(default = "default_group_label")]
    pub group_label: String,
}

fn default_identity() -> String {
    "short_name".to_string()
}

fn default_market_value() -> String {
    "value_eur".to_string()
}

fn default_wage() -> String {
    "wage_eur".to_string()
}

fn default_overall() -> String {
    "overall".to_string()
}

fn default_group_label() -> String {
    "cluster".to_string()
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            market_value: default_market_value(),
            wage: default_wage(),
            overall: default_overall(),
            group_label: default_group_label(),
        }
    }
}

/// Header positions resolved once per file
struct ColumnIndex {
    identity: usize,
    market_value: Option<usize>,
    wage: Option<usize>,
    overall: usize,
    group_label: usize,
    features: Vec<(String, usize)>,
}

impl ColumnIndex {
    fn resolve(
        headers: &csv::StringRecord,
        columns: &CatalogColumns,
        space: &FeatureSpace,
    ) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

        let features = space
            .names()
            .iter()
            .map(|name| require(name).map(|idx| (name.clone(), idx)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            identity: require(&columns.identity)?,
            market_value: find(&columns.market_value),
            wage: find(&columns.wage),
            overall: require(&columns.overall)?,
            group_label: require(&columns.group_label)?,
            features,
        })
    }
}

fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn parse_number(record: &csv::StringRecord, idx: usize, field: &str, row: usize) -> Result<f64, LoadError> {
    let raw = cell(record, idx);
    let value = raw.parse::<f64>().map_err(|_| LoadError::InvalidRecord {
        row,
        reason: format!("{} = '{}' is not a number", field, raw),
    })?;
    // f64 parsing accepts "NaN" and "inf"; neither can be ranked
    if !value.is_finite() {
        return Err(LoadError::InvalidRecord {
            row,
            reason: format!("{} = '{}' is not a finite number", field, raw),
        });
    }
    Ok(value)
}

fn parse_optional(record: &csv::StringRecord, idx: Option<usize>, field: &str, row: usize) -> Result<Option<f64>, LoadError> {
    match idx {
        Some(idx) if !cell(record, idx).is_empty() => parse_number(record, idx, field, row).map(Some),
        _ => Ok(None),
    }
}

fn parse_label(raw: &str, row: usize) -> Result<GroupLabel, LoadError> {
    let invalid = || LoadError::InvalidRecord {
        row,
        reason: format!("cluster label '{}' is not a non-negative integer", raw),
    };
    // pandas writes integer columns as "2" but float columns as "2.0"
    if let Ok(label) = raw.parse::<GroupLabel>() {
        return Ok(label);
    }
    let value = raw.parse::<f64>().map_err(|_| invalid())?;
    if value >= 0.0 && value.fract() == 0.0 && value <= GroupLabel::MAX as f64 {
        Ok(value as GroupLabel)
    } else {
        Err(invalid())
    }
}

/// Read a catalog from any CSV source
pub fn read_catalog<R: Read>(
    reader: R,
    columns: &CatalogColumns,
    space: &FeatureSpace,
) -> Result<Catalog, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns, space)?;

    let mut entities = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Row 1 is the header
        let row = i + 2;

        let name = cell(&record, index.identity);
        if name.is_empty() {
            return Err(LoadError::InvalidRecord {
                row,
                reason: format!("empty {}", columns.identity),
            });
        }

        let features = index
            .features
            .iter()
            .map(|(field, idx)| parse_number(&record, *idx, field, row))
            .collect::<Result<Vec<_>, _>>()?;

        entities.push(Entity {
            name: name.to_string(),
            features: FeatureVector::new(features),
            market_value: parse_optional(&record, index.market_value, &columns.market_value, row)?,
            wage: parse_optional(&record, index.wage, &columns.wage, row)?,
            overall: parse_number(&record, index.overall, &columns.overall, row)?,
            group_label: parse_label(cell(&record, index.group_label), row)?,
        });
    }

    Ok(Catalog::new(entities))
}

/// Read a catalog CSV from disk
pub fn load_catalog<P: AsRef<Path>>(
    path: P,
    columns: &CatalogColumns,
    space: &FeatureSpace,
) -> Result<Catalog, LoadError> {
    let file = std::fs::File::open(path.as_ref())?;
    let catalog = read_catalog(file, columns, space)?;
    tracing::info!("Loaded {} entities from {:?}", catalog.len(), path.as_ref());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> FeatureSpace {
        FeatureSpace::new(["pace", "defending"])
    }

    #[test]
    fn test_read_catalog() {
        let csv = "\
short_name,overall,pace,value_eur,wage_eur,defending,cluster
L. Messi,93,85,78000000,320000,34,2
Unknown,60,70,,,40,4.0
";
        let catalog = read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).unwrap();
        assert_eq!(catalog.len(), 2);

        let messi = catalog.find("L. Messi").unwrap();
        assert_eq!(messi.features.values(), &[85.0, 34.0]);
        assert_eq!(messi.market_value, Some(78_000_000.0));
        assert_eq!(messi.wage, Some(320_000.0));
        assert_eq!(messi.group_label, 2);

        let unknown = catalog.find("Unknown").unwrap();
        assert_eq!(unknown.market_value, None);
        assert_eq!(unknown.wage, None);
        assert_eq!(unknown.group_label, 4);
    }

    #[test]
    fn test_missing_feature_column() {
        let csv = "short_name,overall,pace,cluster\nA,60,70,1\n";
        let err = read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "defending"));
    }

    #[test]
    fn test_bad_number_reports_row() {
        let csv = "short_name,overall,pace,defending,cluster\nA,60,70,40,1\nB,61,fast,40,1\n";
        let err = read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { row: 3, .. }));
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        for bad in ["NaN", "nan", "inf", "-infinity"] {
            let csv = format!(
                "short_name,overall,pace,defending,cluster\nA,60,70,40,1\nB,{},70,40,1\n",
                bad
            );
            let err = read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).unwrap_err();
            assert!(
                matches!(&err, LoadError::InvalidRecord { row: 3, reason } if reason.contains("finite")),
                "{}: {:?}",
                bad,
                err
            );
        }

        let csv = "short_name,overall,pace,value_eur,defending,cluster\nA,60,inf,10,40,1\n";
        assert!(read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).is_err());

        let csv = "short_name,overall,pace,value_eur,defending,cluster\nA,60,70,NaN,40,1\n";
        assert!(read_catalog(csv.as_bytes(), &CatalogColumns::default(), &space()).is_err());
    }

    #[test]
    fn test_bad_label() {
        assert!(parse_label("-1", 2).is_err());
        assert!(parse_label("1.5", 2).is_err());
        assert_eq!(parse_label("3", 2).unwrap(), 3);
    }
}
