//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use refine::{ParamEnum, Refinable};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ParamEnum)]
pub enum Stage {
    first,
    second,
    third,
    fourth,
    fifth,
}

#[derive(Debug, Clone, PartialEq, Refinable)]
pub struct Sample {
    pub id: i32,
    pub name: String,
    pub time: DateTime<Utc>,
    pub dec_value: f64,
    pub sing_value: f64,
    #[refine(Enum)]
    pub enum_prop: Stage,
}

/// 2017-11-07T13:00:00Z, the anchor every fixture time is relative to.
pub fn ref_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 11, 7, 13, 0, 0).unwrap()
}

fn sample(
    id: i32,
    name: &str,
    time: DateTime<Utc>,
    dec_value: f64,
    sing_value: f64,
    enum_prop: Stage,
) -> Sample {
    Sample {
        id,
        name: name.to_string(),
        time,
        dec_value,
        sing_value,
        enum_prop,
    }
}

/// The seven-record fixture.
pub fn samples() -> Vec<Sample> {
    let t = ref_time();
    let midnight = t.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
    vec![
        sample(1, "One", t - Duration::minutes(1), 1.1, 3.34, Stage::first),
        sample(2, "Two", t - Duration::hours(40), -1.1, -3.34, Stage::second),
        sample(3, "Three", t + Duration::minutes(200), 200.0, 3.0, Stage::third),
        sample(4, "Four", t + Months::new(24), -0.1, 1500.0, Stage::fourth),
        sample(5, "Five", t - Months::new(1666 * 12), 1.0, -1500.0, Stage::fifth),
        sample(6, "Six", t + Duration::milliseconds(1), 1.0, 0.0001, Stage::first),
        sample(7, "Seven", midnight, 0.4, 0.0001, Stage::second),
    ]
}

/// `count` records with ids `1..=count`, each a minute older than the last.
pub fn numbered(count: i32) -> Vec<Sample> {
    let t = ref_time();
    (1..=count)
        .map(|i| {
            sample(
                i,
                &i.to_string(),
                t - Duration::minutes(i64::from(i)),
                0.0,
                0.0,
                Stage::first,
            )
        })
        .collect()
}

pub fn ids(records: &[Sample]) -> Vec<i32> {
    records.iter().map(|s| s.id).collect()
}

/// Builds params from a query-string-like `a=1&b=2` list.
pub fn query(raw: &str) -> refine::Params {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .collect()
}
