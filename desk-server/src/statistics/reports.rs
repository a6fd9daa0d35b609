//! Per-record-type statistics
//!
//! Binds each domain record to its date field and classifiers, then runs the
//! bucketing and cross-tabulation passes.

use chrono::{DateTime, NaiveDate, Utc};
use shared::models::{
    Appointment, AppointmentStatus, Customer, CustomerStatus, CustomerType, RequestStatus,
    RequestType, ServiceRequest,
};

use super::aggregator::bucket_by_period;
use super::enrich::{Classifier, ClassifierGroup, EnrichedStat, enrich_with_cross_tab};
use super::period::Granularity;
use crate::utils::time::{millis_to_datetime, parse_datetime};

pub const CONVERTED: &str = "converted";
pub const CONVERSION_RATE: &str = "conversionRate";
pub const WITH_CUSTOMER: &str = "withCustomer";

pub fn customer_date(c: &Customer) -> Option<DateTime<Utc>> {
    millis_to_datetime(c.created_at)
}

pub fn request_date(r: &ServiceRequest) -> Option<DateTime<Utc>> {
    millis_to_datetime(r.created_at)
}

pub fn appointment_date(a: &Appointment) -> Option<DateTime<Utc>> {
    parse_datetime(&a.appointment_date)
}

/// Active/inactive and individual/business per period
pub fn customer_stats(
    records: &[Customer],
    granularity: Granularity,
    lookback: i64,
    today: NaiveDate,
) -> Vec<EnrichedStat> {
    let mut classifiers: Vec<Classifier<'_, Customer>> = CustomerStatus::ALL
        .into_iter()
        .map(|s| Classifier::status(s.as_str(), move |c: &Customer| c.status == s))
        .collect();
    classifiers.extend(CustomerType::ALL.into_iter().map(|t| {
        Classifier::kind(t.as_str(), move |c: &Customer| c.customer_type == Some(t))
    }));

    let buckets = bucket_by_period(records, customer_date, lookback, granularity, today);
    enrich_with_cross_tab(buckets, records, customer_date, &classifiers)
}

/// Status and type breakdown, converted count and conversion rate per period
///
/// A request counts as converted once it references a customer.
pub fn request_stats(
    records: &[ServiceRequest],
    granularity: Granularity,
    lookback: i64,
    today: NaiveDate,
) -> Vec<EnrichedStat> {
    let mut classifiers: Vec<Classifier<'_, ServiceRequest>> = RequestStatus::ALL
        .into_iter()
        .map(|s| Classifier::status(s.as_str(), move |r: &ServiceRequest| r.status == s))
        .collect();
    classifiers.extend(RequestType::ALL.into_iter().map(|t| {
        Classifier::kind(t.as_str(), move |r: &ServiceRequest| r.request_type == Some(t))
    }));
    classifiers.push(Classifier::flag(CONVERTED, ServiceRequest::is_converted));

    let buckets = bucket_by_period(records, request_date, lookback, granularity, today);
    enrich_with_cross_tab(buckets, records, request_date, &classifiers)
        .into_iter()
        .map(|stat| {
            let converted = stat.count_of(ClassifierGroup::Flag, CONVERTED);
            stat.with_rate(CONVERSION_RATE, converted)
        })
        .collect()
}

/// Status breakdown and customer-linked count per period, bucketed by appointment date
pub fn appointment_stats(
    records: &[Appointment],
    granularity: Granularity,
    lookback: i64,
    today: NaiveDate,
) -> Vec<EnrichedStat> {
    let mut classifiers: Vec<Classifier<'_, Appointment>> = AppointmentStatus::ALL
        .into_iter()
        .map(|s| Classifier::status(s.as_str(), move |a: &Appointment| a.status == s))
        .collect();
    classifiers.push(Classifier::flag(WITH_CUSTOMER, |a: &Appointment| {
        a.customer_id.is_some()
    }));

    let buckets = bucket_by_period(records, appointment_date, lookback, granularity, today);
    enrich_with_cross_tab(buckets, records, appointment_date, &classifiers)
}
