//! Tabular display of model classes, instances and records
//!
//! Used by the command line interface. Tables are rendered with `tabled`.

use std::fmt::{self, Display};

use tabled::{builder::Builder, settings::Style};

use crate::data::freq::FrequencySeriesRecord;
use crate::data::time::TimeSeriesRecord;
use crate::model::class::ModelClass;
use crate::model::instance::ModelInstance;
use crate::model::modulus::Modulus;
use crate::precision::Real;

/// Something that can be shown as a row of a table
trait TableRecord {
    fn columns() -> Vec<String>;

    fn to_record(&self) -> Vec<String>;
}

impl TableRecord for ModelClass {
    fn columns() -> Vec<String> {
        vec![
            "Name".to_string(),
            "Parameters".to_string(),
            "Moduli".to_string(),
            "Constraint".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        let moduli: Vec<&str> = Modulus::ALL
            .into_iter()
            .filter(|m| self.provides(*m))
            .map(|m| m.symbol())
            .collect();

        vec![
            self.name().to_string(),
            self.parameters().join(", "),
            moduli.join(", "),
            self.constraint().to_string(),
        ]
    }
}

fn to_table<'a, T: TableRecord + 'a>(records: impl IntoIterator<Item = &'a T>) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Overview table of model classes
pub fn class_table(classes: &[ModelClass]) -> String {
    to_table(classes)
}

/// Detailed view of a single class: its moduli and provenance
pub fn class_details(class: &ModelClass) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["Model".to_string(), class.name().to_string()]);
    builder.push_record(vec!["Parameters".to_string(), class.parameters().join(", ")]);

    for modulus in Modulus::ALL {
        let expression = class
            .expression(modulus)
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        builder.push_record(vec![format!("{}({})", modulus.symbol(), modulus.variable()), expression]);
    }

    builder.push_record(vec!["Constraint".to_string(), class.constraint().to_string()]);
    if !class.description().is_empty() {
        builder.push_record(vec!["Description".to_string(), class.description().to_string()]);
    }
    for record in class.lineage() {
        builder.push_record(vec![
            "Frozen from".to_string(),
            format!("{} [{}]", record.parent, record.frozen),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

/// Values of every available modulus of `instance` at the given points.
///
/// Time-domain moduli are evaluated at the points as times, frequency-domain
/// moduli at the same points as angular frequencies. Unavailable moduli are
/// left out.
pub fn evaluation_table(instance: &ModelInstance, points: &[Real]) -> String {
    let available: Vec<(Modulus, Vec<Real>)> = Modulus::ALL
        .into_iter()
        .filter_map(|m| instance.evaluate_many(m, points).map(|values| (m, values)))
        .collect();

    let mut builder = Builder::default();
    let mut header = vec!["x".to_string()];
    header.extend(
        available
            .iter()
            .map(|(m, _)| format!("{}({})", m.symbol(), m.variable())),
    );
    builder.push_record(header);

    for (i, x) in points.iter().enumerate() {
        let mut row = vec![format_value(*x)];
        row.extend(available.iter().map(|(_, values)| format_value(values[i])));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn format_value(value: Real) -> String {
    if value == 0.0 || (1e-3..1e5).contains(&value.abs()) {
        format!("{:.6}", value)
    } else {
        format!("{:.6e}", value)
    }
}

fn columns_table(header: Vec<String>, columns: Vec<&[Real]>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);

    let rows = columns.first().map_or(0, |c| c.len());
    for i in 0..rows {
        builder.push_record(columns.iter().map(|c| format_value(c[i])).collect::<Vec<_>>());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

impl Display for TimeSeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec!["time".to_string()];
        let mut columns = vec![self.time()];
        if let Some(stress) = self.stress() {
            header.push("stress".to_string());
            columns.push(stress);
        }
        if let Some(strain) = self.strain() {
            header.push("strain".to_string());
            columns.push(strain);
        }

        writeln!(f, "{}", columns_table(header, columns))?;
        write!(f, "Log: {}", self.log())
    }
}

impl Display for FrequencySeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec!["frequency".to_string()];
        let mut columns = vec![self.frequency()];
        if let (Some(storage), Some(loss)) = (self.storage_modulus(), self.loss_modulus()) {
            header.push("storage".to_string());
            header.push("loss".to_string());
            columns.push(storage);
            columns.push(loss);
        }

        writeln!(f, "{}", columns_table(header, columns))?;
        write!(f, "Log: {}", self.log())
    }
}
