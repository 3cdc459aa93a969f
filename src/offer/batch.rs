//! Batch pricing of offers.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::OfferComputation;

use super::calculator::OfferCalculator;
use super::request::OfferRequest;

/// Prices every request in order.
///
/// Processing stops at the first failing row, which is reported as
/// [`EngineError::InvalidRow`] with its 1-based row number.
pub fn calculate_batch(
    calculator: &OfferCalculator<'_>,
    requests: &[OfferRequest],
) -> EngineResult<Vec<OfferComputation>> {
    if requests.is_empty() {
        return Err(EngineError::invalid_request("requests", "batch is empty"));
    }

    let results = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            calculator
                .calculate(request)
                .map_err(|source| EngineError::InvalidRow {
                    row: index + 1,
                    source: Box::new(source),
                })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    info!(offers = results.len(), "Batch calculated");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::offer::PfChoice;
    use rust_decimal::Decimal;

    fn offer(id: &str, state: &str, net: i64) -> OfferRequest {
        let mut request = OfferRequest::new(id, state, Decimal::from(net));
        request.month = Some(1);
        request
    }

    #[test]
    fn test_batch_prices_rows_in_order() {
        let loader = ConfigLoader::embedded().unwrap();
        let calculator = OfferCalculator::new(loader.tables());
        let requests = vec![
            offer("OFF-1", "Haryana", 12975),
            offer("OFF-2", "Maharashtra", 50000),
            offer("OFF-3", "West Bengal", 80000),
        ];

        let results = calculate_batch(&calculator, &requests).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.offer_id.as_str()).collect();
        assert_eq!(ids, vec!["OFF-1", "OFF-2", "OFF-3"]);
    }

    #[test]
    fn test_batch_reports_failing_row() {
        let loader = ConfigLoader::embedded().unwrap();
        let calculator = OfferCalculator::new(loader.tables());
        let mut declined = offer("OFF-2", "Delhi", 15000);
        declined.pf = PfChoice::No;
        let requests = vec![offer("OFF-1", "Delhi", 40000), declined, offer("OFF-3", "Delhi", 40000)];

        let err = calculate_batch(&calculator, &requests).unwrap_err();
        match err {
            EngineError::InvalidRow { row, source } => {
                assert_eq!(row, 2);
                assert!(matches!(*source, EngineError::PfMandatory { .. }));
            }
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let loader = ConfigLoader::embedded().unwrap();
        let calculator = OfferCalculator::new(loader.tables());

        let err = calculate_batch(&calculator, &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest { .. }));
    }
}
