//! IPO listing service
//!
//! Owns record creation (sector labelling and gain prediction on the way in)
//! and the read views: upcoming issues with a countdown, past listings, and
//! listing years.

use crate::application::ml::{GainPredictor, PredictionPath};
use crate::application::sector_classifier::SectorClassifier;
use crate::domain::ipo::{HistoricalIpo, IpoRecord, IpoStatus};
use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::PredictionResult;
use crate::domain::repositories::{HistoricalIpoRepository, IpoRepository, SyncSummary};
use crate::infrastructure::observability::Metrics;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// An upcoming issue with the number of days until it opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingIpo {
    pub record: IpoRecord,
    pub days_remaining: Option<i64>,
}

pub struct IpoListingService {
    ipos: Arc<dyn IpoRepository>,
    historical: Arc<dyn HistoricalIpoRepository>,
    classifier: SectorClassifier,
    predictor: GainPredictor,
    metrics: Metrics,
}

impl IpoListingService {
    pub fn new(
        ipos: Arc<dyn IpoRepository>,
        historical: Arc<dyn HistoricalIpoRepository>,
        classifier: SectorClassifier,
        predictor: GainPredictor,
        metrics: Metrics,
    ) -> Self {
        metrics
            .model_loaded
            .set(if predictor.has_model() { 1.0 } else { 0.0 });
        Self {
            ipos,
            historical,
            classifier,
            predictor,
            metrics,
        }
    }

    pub fn classifier(&self) -> &SectorClassifier {
        &self.classifier
    }

    pub fn predictor(&self) -> &GainPredictor {
        &self.predictor
    }

    /// Sector label for a company description, counted in metrics.
    pub fn classify(&self, description: Option<&str>) -> String {
        let sector = self.classifier.classify(description);
        self.metrics.inc_classifications(&sector);
        sector
    }

    pub fn predict(&self, features: &FeatureVector) -> PredictionResult {
        let (result, path) = self.predictor.predict_with_path(features);
        self.metrics.inc_predictions(path.as_str());
        result
    }

    pub fn predict_payload(&self, payload: &Map<String, Value>) -> PredictionResult {
        let (result, path) = self.predictor.predict_payload_with_path(payload);
        self.metrics.inc_predictions(path.as_str());
        result
    }

    /// Store a new or updated record.
    ///
    /// A record without a sector gets one from `description`. A record with
    /// non-zero QIB subscription gets a gain prediction attached; a failed
    /// prediction is stored as 0% at 0 confidence, never an error.
    pub async fn create_ipo(
        &self,
        mut record: IpoRecord,
        description: Option<&str>,
    ) -> Result<IpoRecord> {
        if record.sector.is_none() && description.is_some() {
            record.sector = Some(self.classify(description));
        }

        if !record.qib_subscription.is_zero() {
            let (prediction, path) = self.predictor.predict_with_path(&record.features());
            self.metrics.inc_predictions(path.as_str());
            if path != PredictionPath::Failed {
                debug!(
                    "{}: predicted gain {}% ({})",
                    record.company_name,
                    prediction.predicted_gain,
                    path.as_str()
                );
            }
            record.apply_prediction(&prediction);
        }

        let outcome = self
            .ipos
            .upsert(record.clone())
            .await
            .with_context(|| format!("Failed to save IPO {}", record.company_name))?;
        debug!("{} {:?}", record.company_name, outcome);

        Ok(record)
    }

    /// Records with upcoming status, each with its days-to-open countdown.
    pub async fn upcoming(&self, today: NaiveDate) -> Result<Vec<UpcomingIpo>> {
        let records = self.ipos.find_by_status(IpoStatus::Upcoming).await?;
        Ok(records
            .into_iter()
            .map(|record| UpcomingIpo {
                days_remaining: record.days_remaining(today),
                record,
            })
            .collect())
    }

    /// Records opening on or after `today`, whatever their status.
    pub async fn upcoming_from(&self, today: NaiveDate) -> Result<Vec<IpoRecord>> {
        Ok(self
            .ipos
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.open_date.is_some_and(|d| d >= today))
            .collect())
    }

    /// The stored record for `company_id`. No peer listings are attached.
    pub async fn detail(&self, company_id: &str) -> Result<Option<IpoRecord>> {
        self.ipos.find_by_company_id(company_id).await
    }

    pub async fn past_ipos(&self) -> Result<Vec<HistoricalIpo>> {
        self.historical.get_all().await
    }

    pub async fn listing_years(&self) -> Result<Vec<i32>> {
        self.historical.listing_years().await
    }

    /// Copy listed issues into the IPO table as closed records.
    ///
    /// `years` limits the copy to listings within an inclusive year range.
    pub async fn promote_closed(&self, years: Option<(i32, i32)>) -> Result<SyncSummary> {
        let listings = match years {
            Some((from, to)) => self.historical.find_by_listing_years(from, to).await?,
            None => self.historical.get_all().await?,
        };

        let mut summary = SyncSummary::default();
        for listing in &listings {
            let outcome = self.ipos.upsert(IpoRecord::from_historical(listing)).await?;
            summary.record(outcome);
        }

        info!("Promoted historical IPOs to closed: {}", summary);
        self.refresh_gauges().await?;
        Ok(summary)
    }

    /// Update the per-status record gauges plus the `all` total, which is
    /// returned.
    pub async fn refresh_gauges(&self) -> Result<usize> {
        for status in [
            IpoStatus::Upcoming,
            IpoStatus::Open,
            IpoStatus::Closed,
            IpoStatus::Listed,
        ] {
            let count = self.ipos.find_by_status(status).await?.len();
            self.metrics.set_ipos_tracked(&status.to_string(), count);
        }

        let total = self.ipos.count().await?;
        self.metrics.set_ipos_tracked("all", total);
        debug!("Tracking {} IPO records", total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::TrainedModel;
    use crate::infrastructure::repositories::in_memory::{
        InMemoryHistoricalIpoRepository, InMemoryIpoRepository,
    };
    use rust_decimal_macros::dec;

    struct FailingModel;

    impl TrainedModel for FailingModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, String> {
            Err("model exploded".to_string())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_with(predictor: GainPredictor) -> (IpoListingService, Metrics) {
        let metrics = Metrics::new().unwrap();
        let service = IpoListingService::new(
            Arc::new(InMemoryIpoRepository::new()),
            Arc::new(InMemoryHistoricalIpoRepository::new()),
            SectorClassifier::default(),
            predictor,
            metrics.clone(),
        );
        (service, metrics)
    }

    fn service() -> IpoListingService {
        service_with(GainPredictor::fallback_only()).0
    }

    fn listing(name: &str, listed: NaiveDate) -> HistoricalIpo {
        HistoricalIpo {
            company_id: format!("{}-id", name),
            company_name: name.to_string(),
            listing_date: Some(listed),
            issue_size: dec!(500),
            issue_price: dec!(100),
            listing_price: dec!(120),
            qib_subscription: dec!(40),
            listing_gains_rs: dec!(20),
            listing_gains_percent: dec!(20),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_ipo_classifies_and_predicts() {
        let svc = service();
        let mut record = IpoRecord::new("Sunrise Power");
        record.company_id = "sun-1".to_string();
        record.qib_subscription = dec!(50);
        record.nii_subscription = dec!(30);
        record.retail_subscription = dec!(10);
        record.grey_market_premium = Some(dec!(20));

        let saved = svc
            .create_ipo(
                record,
                Some("We manufacture solar panels and provide renewable power solutions"),
            )
            .await
            .unwrap();

        assert_eq!(saved.sector.as_deref(), Some("Energy"));
        assert_eq!(saved.predicted_gain, Some(dec!(75)));
        assert_eq!(saved.prediction_confidence, Some(dec!(60)));

        let stored = svc.detail("sun-1").await.unwrap().unwrap();
        assert_eq!(stored, saved);
    }

    #[tokio::test]
    async fn test_create_ipo_keeps_existing_sector() {
        let svc = service();
        let mut record = IpoRecord::new("Acme Steel");
        record.sector = Some("Manufacturing".to_string());

        let saved = svc
            .create_ipo(record, Some("software cloud platform"))
            .await
            .unwrap();
        assert_eq!(saved.sector.as_deref(), Some("Manufacturing"));
    }

    #[tokio::test]
    async fn test_create_ipo_without_subscription_skips_prediction() {
        let svc = service();
        let saved = svc.create_ipo(IpoRecord::new("Quiet Co"), None).await.unwrap();
        assert_eq!(saved.sector, None);
        assert_eq!(saved.predicted_gain, None);
        assert_eq!(saved.prediction_confidence, None);
    }

    #[tokio::test]
    async fn test_failed_model_stores_zero_prediction() {
        let (svc, metrics) =
            service_with(GainPredictor::new(Some(Arc::new(FailingModel))));
        let mut record = IpoRecord::new("Broken Model Ltd");
        record.qib_subscription = dec!(10);

        let saved = svc.create_ipo(record, None).await.unwrap();
        assert_eq!(saved.predicted_gain, Some(dec!(0)));
        assert_eq!(saved.prediction_confidence, Some(dec!(0)));
        assert!(
            metrics
                .render()
                .contains("ipotrack_predictions_total{path=\"failed\"} 1")
        );
    }

    #[tokio::test]
    async fn test_upcoming_views() {
        let svc = service();
        let today = date(2025, 3, 10);

        let mut soon = IpoRecord::new("Soon Ltd");
        soon.open_date = Some(date(2025, 3, 15));
        let mut past = IpoRecord::new("Past Ltd");
        past.open_date = Some(date(2025, 3, 1));
        let mut open = IpoRecord::new("Open Ltd");
        open.open_date = Some(date(2025, 3, 12));
        open.status = IpoStatus::Open;

        for record in [soon, past, open] {
            svc.create_ipo(record, None).await.unwrap();
        }

        let upcoming = svc.upcoming(today).await.unwrap();
        assert_eq!(upcoming.len(), 2);
        let soon_entry = upcoming
            .iter()
            .find(|u| u.record.company_name == "Soon Ltd")
            .unwrap();
        assert_eq!(soon_entry.days_remaining, Some(5));

        let from_today: Vec<String> = svc
            .upcoming_from(today)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.company_name)
            .collect();
        assert_eq!(from_today, vec!["Open Ltd", "Soon Ltd"]);
    }

    #[tokio::test]
    async fn test_promote_closed_respects_year_range() {
        let historical = Arc::new(InMemoryHistoricalIpoRepository::new());
        historical.upsert(listing("Old Co", date(2023, 6, 1))).await.unwrap();
        historical.upsert(listing("New Co", date(2024, 8, 1))).await.unwrap();

        let ipos = Arc::new(InMemoryIpoRepository::new());
        let svc = IpoListingService::new(
            ipos.clone(),
            historical,
            SectorClassifier::default(),
            GainPredictor::fallback_only(),
            Metrics::new().unwrap(),
        );

        let summary = svc.promote_closed(Some((2024, 2025))).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 0);

        let closed = ipos.find_by_status(IpoStatus::Closed).await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].company_name, "New Co");

        let summary = svc.promote_closed(None).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(svc.listing_years().await.unwrap(), vec![2024, 2023]);
        assert_eq!(svc.past_ipos().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_detail_is_the_stored_record() {
        let svc = service();
        let mut record = IpoRecord::new("Detail Ltd");
        record.company_id = "det-7".to_string();
        let saved = svc.create_ipo(record, Some("software services")).await.unwrap();

        assert_eq!(svc.detail("det-7").await.unwrap(), Some(saved));
        assert_eq!(svc.detail("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_gauges_reports_total() {
        let (svc, metrics) = service_with(GainPredictor::fallback_only());
        let mut open = IpoRecord::new("Open Ltd");
        open.status = IpoStatus::Open;
        for record in [IpoRecord::new("First Ltd"), IpoRecord::new("Second Ltd"), open] {
            svc.create_ipo(record, None).await.unwrap();
        }

        assert_eq!(svc.refresh_gauges().await.unwrap(), 3);
        let output = metrics.render();
        assert!(output.contains("ipotrack_ipos_tracked{status=\"all\"} 3"));
        assert!(output.contains("ipotrack_ipos_tracked{status=\"upcoming\"} 2"));
        assert!(output.contains("ipotrack_ipos_tracked{status=\"open\"} 1"));
    }

    #[test]
    fn test_payload_prediction_counts_path() {
        let (svc, metrics) = service_with(GainPredictor::fallback_only());
        let payload = serde_json::json!({
            "qib_subscription": 50,
            "hni_subscription": 30,
            "retail_subscription": 10,
            "grey_market_premium": 20
        });
        let result = svc.predict_payload(payload.as_object().unwrap());
        assert_eq!(result.predicted_gain, 75.0);
        assert!(
            metrics
                .render()
                .contains("ipotrack_predictions_total{path=\"fallback\"} 1")
        );
    }
}
