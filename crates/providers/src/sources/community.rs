//! Community shortage reports
//!
//! Stands in for local government and NGO feeds until one is available: two
//! fixed report templates scattered within the community window.

use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_poi::{scatter, PointOfInterest, Severity, ShortageDetails};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct ReportTemplate {
    name: &'static str,
    description: &'static str,
    severity: Severity,
    people_affected: u32,
    source: &'static str,
    category: &'static str,
}

const REPORTS: [ReportTemplate; 2] = [
    ReportTemplate {
        name: "Local Community Center",
        description: "Food shortage affecting 50+ families",
        severity: Severity::High,
        people_affected: 50,
        source: "Community Report",
        category: "Community Shortage",
    },
    ReportTemplate {
        name: "Senior Care Facility",
        description: "Running low on nutritious food supplies",
        severity: Severity::Medium,
        people_affected: 25,
        source: "Facility Report",
        category: "Care Facility",
    },
];

/// Mock community report provider
#[derive(Debug, Clone)]
pub struct CommunityReports {
    window_deg: f64,
    seed: Option<u64>,
}

impl CommunityReports {
    pub fn new(window_deg: f64) -> Self {
        Self {
            window_deg,
            seed: None,
        }
    }

    /// Fix the scatter so every call returns the same positions.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The reports around `query.location`, drawing offsets from `rng`.
    pub fn reports<R: Rng + ?Sized>(&self, query: &SearchQuery, rng: &mut R) -> Vec<PointOfInterest> {
        let now = Utc::now();

        REPORTS
            .iter()
            .enumerate()
            .map(|(index, report)| {
                PointOfInterest::shortage(
                    format!("report-{}", index + 1),
                    scatter(query.location, self.window_deg, rng),
                    ShortageDetails {
                        severity: Some(report.severity),
                        people_affected: Some(report.people_affected),
                    },
                )
                .named(report.name)
                .described(report.description)
                .from_source(report.source)
                .in_category(report.category)
                .updated_at(now)
            })
            .collect()
    }
}

#[async_trait]
impl Fetcher for CommunityReports {
    fn name(&self) -> &'static str {
        "community-reports"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(self.reports(query, &mut rng))
    }
}
