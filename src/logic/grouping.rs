use crate::models::IntervalSample;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::collections::HashMap;

/// Samples that fall on one calendar day
#[derive(Debug, Clone)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub samples: Vec<&'a IntervalSample>,
}

/// Buckets samples by calendar day under a fixed UTC offset.
///
/// Buckets come out in the order their date first appears in the input. Dates are
/// never sorted, so chronological output needs chronological input.
#[derive(Debug, Clone, Copy)]
pub struct DailyGrouper {
    offset: FixedOffset,
}

impl DailyGrouper {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn date_of(&self, sample: &IntervalSample) -> NaiveDate {
        sample.timestamp.with_timezone(&self.offset).date_naive()
    }

    pub fn group<'a>(&self, samples: &'a [IntervalSample]) -> Vec<DayBucket<'a>> {
        let mut buckets: Vec<DayBucket<'a>> = Vec::new();
        let mut index_by_date: HashMap<NaiveDate, usize> = HashMap::new();

        for sample in samples {
            let date = self.date_of(sample);
            let index = *index_by_date.entry(date).or_insert_with(|| {
                buckets.push(DayBucket {
                    date,
                    samples: Vec::new(),
                });
                buckets.len() - 1
            });
            buckets[index].samples.push(sample);
        }

        buckets
    }
}

impl Default for DailyGrouper {
    fn default() -> Self {
        Self::utc()
    }
}
