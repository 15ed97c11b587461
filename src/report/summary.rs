use serde::Serialize;
use std::fmt;

use crate::models::{DamageReport, Severity};

/// More than this many moderate marks (and no severe ones) rates the pencil "Fair".
pub const FAIR_MODERATE_THRESHOLD: usize = 2;
/// More than this many marks in total recommends replacement.
pub const REPLACEMENT_TOTAL_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub light: usize,
    pub moderate: usize,
    pub severe: usize,
}

impl SeverityCounts {
    pub fn from_severities<I: IntoIterator<Item = Severity>>(severities: I) -> Self {
        let mut counts = Self::default();
        for severity in severities {
            match severity {
                Severity::Light => counts.light += 1,
                Severity::Moderate => counts.moderate += 1,
                Severity::Severe => counts.severe += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Light => self.light,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }

    pub fn total(&self) -> usize {
        self.light + self.moderate + self.severe
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Condition {
    Good,
    Fair,
    Poor,
}

impl Condition {
    /// Severe marks dominate regardless of how many moderate marks exist.
    pub fn from_counts(counts: &SeverityCounts) -> Self {
        if counts.severe > 0 {
            Condition::Poor
        } else if counts.moderate > FAIR_MODERATE_THRESHOLD {
            Condition::Fair
        } else {
            Condition::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn replacement_recommended(counts: &SeverityCounts) -> bool {
    counts.severe > 0 || counts.total() > REPLACEMENT_TOTAL_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTally {
    pub region: String,
    pub count: usize,
}

/// Derived statistics. Recomputed from the report on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub counts: SeverityCounts,
    pub total_damage: usize,
    pub condition: Condition,
    pub replacement_recommended: bool,
    /// Marks per selected region, in selection order.
    pub per_region: Vec<RegionTally>,
}

impl Summary {
    pub fn has_damage(&self) -> bool {
        self.total_damage > 0
    }
}

pub fn summarize(report: &DamageReport) -> Summary {
    let counts =
        SeverityCounts::from_severities(report.annotations().iter().map(|a| a.severity()));

    let per_region = report
        .selected_regions()
        .iter()
        .map(|region| RegionTally {
            region: region.to_string(),
            count: report
                .annotations()
                .iter()
                .filter(|a| a.region() == region)
                .count(),
        })
        .collect();

    Summary {
        total_damage: counts.total(),
        condition: Condition::from_counts(&counts),
        replacement_recommended: replacement_recommended(&counts),
        counts,
        per_region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationPoint, SelectedRegionSet};
    use crate::report::builder::build;

    fn report_with(marks: &[(Severity, &str)]) -> DamageReport {
        let selected: SelectedRegionSet = ["eraser", "tip"].into_iter().collect();
        let annotations = marks
            .iter()
            .map(|(severity, region)| {
                AnnotationPoint::new(0.5, 0.5, *severity, region, &selected).unwrap()
            })
            .collect();
        build(Vec::new(), selected, annotations).unwrap()
    }

    fn repeat(severity: Severity, n: usize) -> Vec<(Severity, &'static str)> {
        (0..n).map(|_| (severity, "tip")).collect()
    }

    #[test]
    fn three_light_marks_are_good_without_replacement() {
        let summary = summarize(&report_with(&repeat(Severity::Light, 3)));
        assert_eq!(summary.condition, Condition::Good);
        assert!(!summary.replacement_recommended);
        assert_eq!(summary.total_damage, 3);
    }

    #[test]
    fn three_moderate_marks_are_fair() {
        let summary = summarize(&report_with(&repeat(Severity::Moderate, 3)));
        assert_eq!(summary.condition, Condition::Fair);
        assert_eq!(summary.total_damage, 3);
        assert!(!summary.replacement_recommended);
    }

    #[test]
    fn two_moderate_marks_stay_good() {
        let summary = summarize(&report_with(&repeat(Severity::Moderate, 2)));
        assert_eq!(summary.condition, Condition::Good);
    }

    #[test]
    fn one_severe_mark_is_poor_and_recommends_replacement() {
        let summary = summarize(&report_with(&repeat(Severity::Severe, 1)));
        assert_eq!(summary.condition, Condition::Poor);
        assert!(summary.replacement_recommended);
    }

    #[test]
    fn severe_dominates_many_moderate_marks() {
        let mut marks = repeat(Severity::Moderate, 4);
        marks.push((Severity::Severe, "eraser"));
        assert_eq!(summarize(&report_with(&marks)).condition, Condition::Poor);
    }

    #[test]
    fn six_light_marks_recommend_replacement_while_good() {
        let summary = summarize(&report_with(&repeat(Severity::Light, 6)));
        assert_eq!(summary.condition, Condition::Good);
        assert_eq!(summary.total_damage, 6);
        assert!(summary.replacement_recommended);

        let five = summarize(&report_with(&repeat(Severity::Light, 5)));
        assert!(!five.replacement_recommended);
    }

    #[test]
    fn verdict_ignores_order_and_region_distribution() {
        let a = summarize(&report_with(&[
            (Severity::Moderate, "tip"),
            (Severity::Light, "eraser"),
            (Severity::Moderate, "tip"),
            (Severity::Moderate, "eraser"),
        ]));
        let b = summarize(&report_with(&[
            (Severity::Light, "tip"),
            (Severity::Moderate, "eraser"),
            (Severity::Moderate, "eraser"),
            (Severity::Moderate, "eraser"),
        ]));
        assert_eq!(a.counts, b.counts);
        assert_eq!(a.condition, b.condition);
        assert_eq!(a.replacement_recommended, b.replacement_recommended);
        assert_ne!(a.per_region, b.per_region);
    }

    #[test]
    fn empty_report_has_no_damage() {
        let summary = summarize(&report_with(&[]));
        assert!(!summary.has_damage());
        assert_eq!(summary.condition, Condition::Good);
        assert_eq!(
            summary.per_region,
            vec![
                RegionTally { region: "eraser".into(), count: 0 },
                RegionTally { region: "tip".into(), count: 0 },
            ]
        );
    }
}
