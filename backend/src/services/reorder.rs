//! Reorder service: triggers replenishment records for low-stock matches

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use shared::{
    format_order_id, recommended_order_quantity, ReorderCreated, ReorderRecord, ReorderRequest,
    ReorderStatus, DELIVERY_LEAD_DAYS,
};

use crate::error::AppResult;
use crate::store::{InventoryStore, NewReorder};

/// Reorder service for the append-only replenishment log
#[derive(Clone)]
pub struct ReorderService {
    store: Arc<dyn InventoryStore>,
}

impl ReorderService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Create a reorder for every record matching the drug-name substring
    /// whose quantity is below the threshold. A threshold at or below zero
    /// never matches since quantities are non-negative.
    ///
    /// The recorded drug name is the requested search term, not the
    /// matched record's full name.
    pub async fn trigger(
        &self,
        request: &ReorderRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ReorderCreated>> {
        let matches = self
            .store
            .search_by_drug_name(&request.drug_name, request.location.as_deref())
            .await?;

        let expected_delivery = now.date_naive() + Duration::days(DELIVERY_LEAD_DAYS);
        let order_quantity = recommended_order_quantity(request.threshold);

        let mut created = Vec::new();
        for record in matches {
            if record.quantity >= request.threshold {
                continue;
            }

            let reorder = self
                .store
                .insert_reorder(NewReorder {
                    drug_name: request.drug_name.clone(),
                    quantity: order_quantity,
                    location: record.location.clone(),
                    status: ReorderStatus::Pending,
                    order_date: now,
                    expected_delivery,
                    supplier: record.manufacturer.clone(),
                })
                .await?;

            tracing::info!(
                location = %record.location,
                drug = %request.drug_name,
                quantity = order_quantity,
                "Reorder created"
            );

            created.push(ReorderCreated {
                location: record.location,
                current_stock: record.quantity,
                order_quantity,
                supplier: record.manufacturer,
                expected_delivery,
                order_id: format_order_id(now, reorder.id),
            });
        }

        Ok(created)
    }

    /// All recorded reorders, newest first.
    pub async fn list(&self) -> AppResult<Vec<ReorderRecord>> {
        self.store.list_reorders().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use chrono::NaiveDate;

    fn service() -> ReorderService {
        ReorderService::new(Arc::new(MemStore::with_sample_data()))
    }

    // 2024-12-01T00:00:00Z
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_733_011_200, 0).unwrap()
    }

    fn request(drug: &str, threshold: i64, location: Option<&str>) -> ReorderRequest {
        ReorderRequest {
            drug_name: drug.to_string(),
            threshold,
            location: location.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn triggers_for_each_match_below_threshold() {
        let service = service();
        let created = service
            .trigger(&request("Aspirin", 50, None), now())
            .await
            .unwrap();

        // Rural Clinic A at 25 and City Pharmacy at 8.
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|c| c.order_quantity == 500));
        assert!(created
            .iter()
            .all(|c| c.expected_delivery == NaiveDate::from_ymd_opt(2024, 12, 6).unwrap()));
    }

    #[tokio::test]
    async fn city_pharmacy_aspirin_example() {
        let service = service();
        let created = service
            .trigger(&request("Aspirin", 50, Some("City Pharmacy")), now())
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        let reorder = &created[0];
        assert_eq!(reorder.location, "City Pharmacy");
        assert_eq!(reorder.current_stock, 8);
        assert_eq!(reorder.order_quantity, 500);
        assert_eq!(reorder.supplier.as_deref(), Some("Global Pharma"));
        assert_eq!(
            reorder.expected_delivery,
            NaiveDate::from_ymd_opt(2024, 12, 6).unwrap()
        );
        assert!(reorder.order_id.starts_with("MED-20241201-"));
    }

    #[tokio::test]
    async fn large_thresholds_scale_the_order_quantity() {
        let service = service();
        let created = service
            .trigger(&request("Aspirin", 1000, Some("City Pharmacy")), now())
            .await
            .unwrap();

        assert_eq!(created[0].order_quantity, 2000);
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_result() {
        let service = service();
        let created = service
            .trigger(&request("Insulin", 50, None), now())
            .await
            .unwrap();

        assert!(created.is_empty());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn well_stocked_matches_do_not_trigger() {
        let service = service();
        let created = service
            .trigger(&request("Paracetamol", 100, None), now())
            .await
            .unwrap();

        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn nonpositive_threshold_is_a_no_op() {
        let service = service();

        for threshold in [0, -5] {
            let created = service
                .trigger(&request("Aspirin", threshold, None), now())
                .await
                .unwrap();
            assert!(created.is_empty());
        }
    }

    #[tokio::test]
    async fn recorded_drug_name_is_the_search_term() {
        let service = service();
        service
            .trigger(&request("Aspirin", 50, Some("City Pharmacy")), now())
            .await
            .unwrap();

        let reorders = service.list().await.unwrap();
        assert_eq!(reorders.len(), 1);
        assert_eq!(reorders[0].drug_name, "Aspirin");
        assert_eq!(reorders[0].status, ReorderStatus::Pending);
        assert_eq!(reorders[0].order_date, now());
    }

    #[tokio::test]
    async fn repeated_triggers_append_new_records() {
        let service = service();
        let req = request("Aspirin", 50, Some("City Pharmacy"));

        let first = service.trigger(&req, now()).await.unwrap();
        let second = service.trigger(&req, now()).await.unwrap();

        assert_ne!(first[0].order_id, second[0].order_id);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
