//! Productivity KPIs over loaded operation records.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use heck::ToTitleCase;
use itertools::Itertools;
use serde::Serialize;

use crate::{data::format_number, fields::CanonicalField, models::OperationRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_quantity: i64,
    pub total_hours: f64,
    pub throughput: f64,
    pub employees: usize,
    pub processes: usize,
    pub machines: usize,
    pub process_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityPerformance {
    pub entity: String,
    pub total_quantity: i64,
    pub total_hours: f64,
    pub throughput: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub total_quantity: i64,
    pub total_hours: f64,
    pub throughput: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    quantity: i64,
    hours: f64,
}

impl Bucket {
    fn add(&mut self, record: &OperationRecord) {
        self.quantity += record.quantity;
        self.hours += record.hours();
    }

    fn throughput(&self) -> f64 {
        throughput(self.quantity, self.hours)
    }
}

fn throughput(quantity: i64, hours: f64) -> f64 {
    if hours > 0.0 {
        quantity as f64 / hours
    } else {
        0.0
    }
}

pub fn summarize_operations(records: &[OperationRecord]) -> Summary {
    let total_quantity = records.iter().map(|record| record.quantity).sum();
    let total_hours = records.iter().map(OperationRecord::hours).sum();
    let distinct = |values: Vec<&str>| values.into_iter().collect::<HashSet<_>>().len();
    Summary {
        total_quantity,
        total_hours,
        throughput: throughput(total_quantity, total_hours),
        employees: distinct(records.iter().map(|r| r.employee.as_str()).collect()),
        processes: distinct(records.iter().map(|r| r.process.as_str()).collect()),
        machines: distinct(records.iter().filter_map(|r| r.machine.as_deref()).collect()),
        process_types: distinct(
            records
                .iter()
                .filter_map(|r| r.process_type.as_deref())
                .collect(),
        ),
    }
}

/// Per-employee KPIs, most productive first.
pub fn group_by_employee(records: &[OperationRecord]) -> Vec<EntityPerformance> {
    by_throughput(aggregate_in_order(records, |record| record.employee.clone()))
}

/// Per-process KPIs, most productive first.
pub fn group_by_process(records: &[OperationRecord]) -> Vec<EntityPerformance> {
    by_throughput(aggregate_in_order(records, |record| record.process.clone()))
}

/// KPIs for every combination of the given attributes, largest output first.
///
/// Entities are labelled `"Label: value • Label: value"`; labels come from
/// `display_names` or default to the title-cased field name.
pub fn group_by_attributes(
    records: &[OperationRecord],
    attributes: &[CanonicalField],
    display_names: &BTreeMap<CanonicalField, String>,
) -> Result<Vec<EntityPerformance>> {
    ensure!(
        !attributes.is_empty(),
        "At least one attribute is required for grouping"
    );

    let groups = aggregate_in_order(records, |record| {
        attributes
            .iter()
            .map(|attribute| {
                let label = display_names
                    .get(attribute)
                    .cloned()
                    .unwrap_or_else(|| attribute.as_str().to_title_case());
                let value = attribute_value(record, *attribute)
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| "-".to_string());
                format!("{label}: {value}")
            })
            .join(" • ")
    });

    let mut performance = into_performance(groups);
    performance.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    Ok(performance)
}

/// Daily totals in chronological order.
pub fn daily_trend(records: &[OperationRecord]) -> Vec<DailyTotals> {
    let mut days: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for record in records {
        days.entry(record.date).or_default().add(record);
    }
    days.into_iter()
        .map(|(date, bucket)| DailyTotals {
            date,
            total_quantity: bucket.quantity,
            total_hours: bucket.hours,
            throughput: bucket.throughput(),
        })
        .collect()
}

pub fn attribute_value(record: &OperationRecord, field: CanonicalField) -> Option<String> {
    match field {
        CanonicalField::Date => Some(record.date.format("%Y-%m-%d").to_string()),
        CanonicalField::Employee => Some(record.employee.clone()),
        CanonicalField::Process => Some(record.process.clone()),
        CanonicalField::Quantity => Some(record.quantity.to_string()),
        CanonicalField::DurationMinutes => Some(format_number(record.duration_minutes)),
        CanonicalField::Machine => record.machine.clone(),
        CanonicalField::ProcessType => record.process_type.clone(),
    }
}

fn aggregate_in_order<F>(records: &[OperationRecord], key: F) -> Vec<(String, Bucket)>
where
    F: Fn(&OperationRecord) -> String,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Bucket)> = Vec::new();
    for record in records {
        let entity = key(record);
        let idx = *positions.entry(entity.clone()).or_insert_with(|| {
            groups.push((entity, Bucket::default()));
            groups.len() - 1
        });
        groups[idx].1.add(record);
    }
    groups
}

fn into_performance(groups: Vec<(String, Bucket)>) -> Vec<EntityPerformance> {
    groups
        .into_iter()
        .map(|(entity, bucket)| EntityPerformance {
            entity,
            total_quantity: bucket.quantity,
            total_hours: bucket.hours,
            throughput: bucket.throughput(),
        })
        .collect()
}

fn by_throughput(groups: Vec<(String, Bucket)>) -> Vec<EntityPerformance> {
    let mut performance = into_performance(groups);
    performance.sort_by(|a, b| b.throughput.total_cmp(&a.throughput));
    performance
}
